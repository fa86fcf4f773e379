use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

fn unique_temp_dir(prefix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time")
        .as_nanos();
    let dir = std::env::temp_dir().join(format!(
        "region-demand-{prefix}-{}-{nanos}",
        std::process::id()
    ));
    fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dirs");
    }
    fs::write(path, content).expect("write test file");
}

/// Runs the binary inside `root` with a private HOME so no user config leaks in.
fn run_region_demand(
    root: &Path,
    args: &[&str],
    envs: &[(&str, &str)],
) -> (bool, Vec<u8>, Vec<u8>) {
    let bin = std::env::var("CARGO_BIN_EXE_region-demand").unwrap_or_else(|_| {
        let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
        path.push("target");
        path.push("debug");
        if cfg!(windows) {
            path.push("region-demand.exe");
        } else {
            path.push("region-demand");
        }
        path.to_string_lossy().into_owned()
    });
    let home = root.join("home");
    fs::create_dir_all(&home).expect("create home");

    let mut cmd = Command::new(bin);
    cmd.current_dir(root)
        .args(args)
        .env("HOME", &home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env("NO_COLOR", "1")
        .env_remove("YOUTUBE_API_KEY")
        .env_remove("YOUTUBE_SLACK_WEBHOOK_URL")
        .env_remove("RUST_LOG");
    for (k, v) in envs {
        cmd.env(k, v);
    }
    let output = cmd.output().expect("run region-demand");
    (output.status.success(), output.stdout, output.stderr)
}

fn seed_inputs(root: &Path) {
    write_file(&root.join("concepts.txt"), "matcha\nramen\n");
    write_file(
        &root.join("query_words.json"),
        r#"{"matcha": ["matcha", "抹茶"], "ramen": ["ramen"]}"#,
    );
    write_file(&root.join("regions code.txt"), "jp\nUS\n");
}

#[test]
fn status_json_reports_schedule() {
    let root = unique_temp_dir("status");
    seed_inputs(&root);
    // legacy timestamp format from older record files
    write_file(
        &root.join("state").join("last_fetch.json"),
        r#"{"matcha": "2026-03-05T10:00:00Z"}"#,
    );

    let (ok, stdout, stderr) = run_region_demand(
        &root,
        &[
            "status",
            "-j",
            "--as-of",
            "2026-03-09",
            "--refresh-days",
            "7",
            "--state-dir",
            "state",
        ],
        &[],
    );
    assert!(ok, "stderr: {}", String::from_utf8_lossy(&stderr));

    let json: Value = serde_json::from_slice(&stdout).expect("json");
    assert_eq!(json["as_of"].as_str(), Some("2026-03-09"));
    assert_eq!(json["refresh_interval_days"].as_u64(), Some(7));
    assert_eq!(json["due"].as_u64(), Some(1));

    let concepts = json["concepts"].as_array().expect("concepts array");
    assert_eq!(concepts.len(), 2);
    assert_eq!(concepts[0]["concept"].as_str(), Some("matcha"));
    assert_eq!(concepts[0]["last_fetch"].as_str(), Some("2026-03-05"));
    assert_eq!(concepts[0]["next_due"].as_str(), Some("2026-03-12"));
    assert_eq!(concepts[0]["due"].as_bool(), Some(false));
    assert_eq!(concepts[0]["queries"].as_u64(), Some(2));
    assert_eq!(concepts[0]["regions"].as_u64(), Some(2));
    assert_eq!(concepts[1]["concept"].as_str(), Some("ramen"));
    assert!(concepts[1]["last_fetch"].is_null());
    assert_eq!(concepts[1]["due"].as_bool(), Some(true));

    let _ = fs::remove_dir_all(root);
}

#[test]
fn status_with_sqlite_store_starts_empty() {
    let root = unique_temp_dir("sqlite");
    seed_inputs(&root);

    let (ok, stdout, stderr) = run_region_demand(
        &root,
        &["status", "-j", "--store", "sqlite", "--state-dir", "state"],
        &[],
    );
    assert!(ok, "stderr: {}", String::from_utf8_lossy(&stderr));

    let json: Value = serde_json::from_slice(&stdout).expect("json");
    assert_eq!(json["due"].as_u64(), Some(2));

    let _ = fs::remove_dir_all(root);
}

#[test]
fn run_with_zero_budget_issues_no_requests() {
    let root = unique_temp_dir("zero-budget");
    seed_inputs(&root);

    let (ok, stdout, stderr) = run_region_demand(
        &root,
        &[
            "run",
            "-j",
            "--as-of",
            "2026-03-09",
            "--quota-ceiling",
            "0",
            "--state-dir",
            "state",
            "--output-dir",
            "out",
        ],
        &[("YOUTUBE_API_KEY", "dummy")],
    );
    assert!(ok, "stderr: {}", String::from_utf8_lossy(&stderr));

    let report: Value = serde_json::from_slice(&stdout).expect("json");
    assert_eq!(report["units_charged"].as_u64(), Some(0));
    assert_eq!(report["phase"].as_str(), Some("exhausted"));
    assert_eq!(report["processed"].as_array().map(Vec::len), Some(0));
    let left: Vec<&str> = report["left_due"]
        .as_array()
        .expect("left_due")
        .iter()
        .filter_map(Value::as_str)
        .collect();
    assert_eq!(left, vec!["matcha", "ramen"]);

    // The record is still persisted, just empty
    let record: Value = serde_json::from_str(
        &fs::read_to_string(root.join("state").join("last_fetch.json")).expect("record file"),
    )
    .expect("record json");
    assert_eq!(record.as_object().map(|o| o.len()), Some(0));
    assert!(!root.join("out").exists());
    assert!(!root.join("state").join("quota_usage.json").exists());

    let _ = fs::remove_dir_all(root);
}

#[test]
fn run_without_api_key_fails() {
    let root = unique_temp_dir("no-key");
    seed_inputs(&root);

    let (ok, _stdout, stderr) = run_region_demand(&root, &["run", "--state-dir", "state"], &[]);
    assert!(!ok);
    assert!(String::from_utf8_lossy(&stderr).contains("YOUTUBE_API_KEY"));
    assert!(!root.join("state").exists());

    let _ = fs::remove_dir_all(root);
}

#[test]
fn invalid_as_of_is_rejected() {
    let root = unique_temp_dir("bad-date");
    seed_inputs(&root);

    let (ok, _stdout, stderr) =
        run_region_demand(&root, &["status", "--as-of", "2026-13-40"], &[]);
    assert!(!ok);
    assert!(String::from_utf8_lossy(&stderr).contains("Invalid date"));

    let _ = fs::remove_dir_all(root);
}

#[test]
fn corrupt_fetch_record_is_fatal() {
    let root = unique_temp_dir("corrupt");
    seed_inputs(&root);
    write_file(&root.join("state").join("last_fetch.json"), "{not json");

    let (ok, _stdout, stderr) = run_region_demand(
        &root,
        &["run", "--state-dir", "state", "--quota-ceiling", "0"],
        &[("YOUTUBE_API_KEY", "dummy")],
    );
    assert!(!ok);
    assert!(String::from_utf8_lossy(&stderr).contains("last_fetch.json"));

    let _ = fs::remove_dir_all(root);
}

#[test]
fn missing_concepts_file_fails() {
    let root = unique_temp_dir("no-concepts");

    let (ok, _stdout, stderr) = run_region_demand(&root, &["status"], &[]);
    assert!(!ok);
    assert!(String::from_utf8_lossy(&stderr).contains("concepts.txt"));

    let _ = fs::remove_dir_all(root);
}

#[test]
fn quota_json_reads_ledger() {
    let root = unique_temp_dir("quota");
    write_file(
        &root.join("state").join("quota_usage.json"),
        r#"{"2026-03-08": 9800, "2026-03-09": 303}"#,
    );

    let (ok, stdout, stderr) = run_region_demand(
        &root,
        &["quota", "-j", "--state-dir", "state", "--quota-ceiling", "10000"],
        &[],
    );
    assert!(ok, "stderr: {}", String::from_utf8_lossy(&stderr));

    let json: Value = serde_json::from_slice(&stdout).expect("json");
    let rows = json.as_array().expect("array output");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["day"].as_str(), Some("2026-03-08"));
    assert_eq!(rows[0]["remaining"].as_u64(), Some(200));
    assert_eq!(rows[1]["units"].as_u64(), Some(303));

    let _ = fs::remove_dir_all(root);
}

#[test]
fn explicit_config_supplies_paths() {
    let root = unique_temp_dir("config");
    write_file(&root.join("inputs").join("list.txt"), "matcha\n");
    write_file(
        &root.join("settings.toml"),
        "concepts_file = \"inputs/list.txt\"\nstate_dir = \"state\"\nrefresh_interval_days = 3\n",
    );

    let (ok, stdout, stderr) =
        run_region_demand(&root, &["status", "-j", "--config", "settings.toml"], &[]);
    assert!(ok, "stderr: {}", String::from_utf8_lossy(&stderr));

    let json: Value = serde_json::from_slice(&stdout).expect("json");
    assert_eq!(json["refresh_interval_days"].as_u64(), Some(3));
    let concepts = json["concepts"].as_array().expect("concepts array");
    assert_eq!(concepts.len(), 1);
    // no region file: built-in default list
    assert_eq!(concepts[0]["regions"].as_u64(), Some(17));

    let _ = fs::remove_dir_all(root);
}

#[test]
fn empty_rotation_slot_is_not_an_error() {
    let root = unique_temp_dir("rotation");
    write_file(&root.join("concepts.txt"), "matcha\nramen\nsushi\n");
    write_file(&root.join("settings.toml"), "rotation_slots = 5\n");

    // 2026-01-02 lands in slot 3 of 5; three concepts only fill slots 0-2
    let (ok, stdout, stderr) = run_region_demand(
        &root,
        &["status", "-j", "--config", "settings.toml", "--as-of", "2026-01-02"],
        &[],
    );
    assert!(ok, "stderr: {}", String::from_utf8_lossy(&stderr));
    let json: Value = serde_json::from_slice(&stdout).expect("json");
    assert_eq!(json["concepts"].as_array().map(Vec::len), Some(0));

    let (ok, stdout, stderr) = run_region_demand(
        &root,
        &[
            "run",
            "-j",
            "--config",
            "settings.toml",
            "--as-of",
            "2026-01-02",
            "--state-dir",
            "state",
        ],
        &[("YOUTUBE_API_KEY", "dummy")],
    );
    assert!(ok, "stderr: {}", String::from_utf8_lossy(&stderr));
    let report: Value = serde_json::from_slice(&stdout).expect("json");
    assert_eq!(report["units_charged"].as_u64(), Some(0));
    assert_eq!(report["phase"].as_str(), Some("completed"));

    let _ = fs::remove_dir_all(root);
}

#[test]
fn empty_concepts_file_fails() {
    let root = unique_temp_dir("empty-concepts");
    write_file(&root.join("concepts.txt"), "\n\n");

    let (ok, _stdout, stderr) = run_region_demand(&root, &["status"], &[]);
    assert!(!ok);
    assert!(String::from_utf8_lossy(&stderr).contains("Concept list is empty"));

    let _ = fs::remove_dir_all(root);
}
