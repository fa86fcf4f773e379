use std::path::Path;

use chrono::{NaiveDate, Utc};
use tracing::{debug, info, warn};

use crate::cli::{Cli, Commands};
use crate::collector::{Collector, RunOptions};
use crate::config::Config;
use crate::consts::QUOTA_LEDGER_FILE;
use crate::core::{Concept, QuotaEstimator, ScheduleTracker};
use crate::error::AppError;
use crate::input::{build_concepts, load_concepts, load_query_words, load_regions, select_concepts};
use crate::notify::{LogNotifier, Notifier, SlackNotifier};
use crate::output::{
    ConceptStatus, CsvSink, print_quota_table, print_run_summary, print_status_table, quota_json,
    status_json,
};
use crate::source::{YouTubeConfig, YouTubeSource};
use crate::store::{QuotaLedger, open_store};
use crate::utils::{parse_date, quota_day_key};

pub(crate) fn dispatch(cli: &Cli, config: &Config) -> Result<(), AppError> {
    let as_of = match cli.as_of.as_deref() {
        Some(s) => parse_date(s)?,
        None => Utc::now().date_naive(),
    };
    debug!("as_of={as_of} command={:?}", cli.command());

    match cli.command() {
        Commands::Run => handle_run(cli, config, as_of),
        Commands::Status => handle_status(cli, config, as_of),
        Commands::Quota => handle_quota(cli),
    }
}

fn load_selected_concepts(cli: &Cli, config: &Config, as_of: NaiveDate) -> Result<Vec<Concept>, AppError> {
    let labels = match cli.concept.as_deref() {
        // An explicit concept does not need the list file
        Some(only) => vec![only.to_string()],
        None => {
            let all = load_concepts(&config.concepts_file())?;
            if all.is_empty() {
                return Err(AppError::NoConcepts);
            }
            let selected = select_concepts(&all, config.rotation_slots(), as_of);
            if selected.is_empty() {
                info!(
                    "Rotation slot for {as_of} is empty ({} concepts, {} slots)",
                    all.len(),
                    config.rotation_slots()
                );
            }
            selected
        }
    };
    let query_words = load_query_words(&config.query_words_file())?;
    let regions = load_regions(&cli.regions_file(), cli.limit_regions)?;
    Ok(build_concepts(&labels, &query_words, &regions))
}

fn handle_run(cli: &Cli, config: &Config, as_of: NaiveDate) -> Result<(), AppError> {
    let key_var = config.api_key_env();
    let api_key = std::env::var(key_var)
        .ok()
        .filter(|k| !k.trim().is_empty())
        .ok_or_else(|| AppError::MissingApiKey {
            var: key_var.to_string(),
        })?;

    let concepts = load_selected_concepts(cli, config, as_of)?;
    let state_dir = cli.state_dir();
    let store = open_store(cli.store(), &state_dir);
    let mut tracker = ScheduleTracker::new(store.load()?);
    info!(
        "Loaded fetch record from {} ({} concepts known)",
        store.location(),
        tracker.record().len()
    );

    let source = YouTubeSource::new(YouTubeConfig {
        api_key,
        search_cost: config.search_cost(),
        videos_cost: config.videos_cost(),
        max_results: config.max_results(),
    });
    let notifier: Box<dyn Notifier> = match config.slack_webhook_url() {
        Some(url) => Box::new(SlackNotifier::new(url)),
        None => Box::new(LogNotifier),
    };
    let mut sink = CsvSink::new(&cli.output_dir(), as_of);
    let mut quota = QuotaEstimator::new(cli.quota_ceiling());

    let report = {
        let mut collector = Collector {
            source: &source,
            store: store.as_ref(),
            sink: &mut sink,
            notifier: notifier.as_ref(),
        };
        collector.run(
            &concepts,
            &mut tracker,
            &mut quota,
            RunOptions {
                as_of,
                refresh_interval_days: cli.refresh_days(),
                lookback_days: config.lookback_days(),
                force: cli.force,
            },
        )?
    };

    for path in sink.written() {
        info!("Saved {}", path.display());
    }
    record_quota_usage(&state_dir, report.units_charged);

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report).unwrap_or_default());
    } else {
        print_run_summary(&report, cli.use_color());
    }
    Ok(())
}

/// Ledger bookkeeping is informational; failures only warn.
fn record_quota_usage(state_dir: &Path, units: u64) {
    if units == 0 {
        return;
    }
    let path = state_dir.join(QUOTA_LEDGER_FILE);
    let day = quota_day_key(Utc::now());
    let result = QuotaLedger::load(&path).and_then(|mut ledger| {
        let total = ledger.add(&day, units);
        ledger.save(&path)?;
        Ok(total)
    });
    match result {
        Ok(total) => info!("Quota ledger {day}: {total} units"),
        Err(e) => warn!("Failed to update quota ledger: {e}"),
    }
}

fn handle_status(cli: &Cli, config: &Config, as_of: NaiveDate) -> Result<(), AppError> {
    let concepts = load_selected_concepts(cli, config, as_of)?;
    let store = open_store(cli.store(), &cli.state_dir());
    let tracker = ScheduleTracker::new(store.load()?);
    let refresh_days = cli.refresh_days();

    let entries: Vec<ConceptStatus> = concepts
        .iter()
        .map(|c| ConceptStatus {
            concept: c.label.clone(),
            last_fetch: tracker.last_fetch(&c.label),
            next_due: tracker.next_due(&c.label, refresh_days),
            due: cli.force || tracker.is_due(&c.label, as_of, refresh_days),
            queries: c.queries.len(),
            regions: c.regions.len(),
        })
        .collect();

    if cli.json {
        println!("{}", status_json(as_of, refresh_days, &entries));
    } else {
        print_status_table(&entries, refresh_days, cli.use_color());
    }
    Ok(())
}

fn handle_quota(cli: &Cli) -> Result<(), AppError> {
    let ledger = QuotaLedger::load(&cli.state_dir().join(QUOTA_LEDGER_FILE))?;
    if cli.json {
        println!("{}", quota_json(ledger.days(), cli.quota_ceiling()));
    } else if ledger.days().is_empty() {
        println!("No quota usage recorded.");
    } else {
        print_quota_table(ledger.days(), cli.quota_ceiling(), cli.use_color());
    }
    Ok(())
}
