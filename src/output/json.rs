use std::collections::BTreeMap;

use chrono::NaiveDate;

use super::ConceptStatus;

pub(crate) fn status_json(as_of: NaiveDate, refresh_interval_days: u32, entries: &[ConceptStatus]) -> String {
    let output = serde_json::json!({
        "as_of": as_of,
        "refresh_interval_days": refresh_interval_days,
        "due": entries.iter().filter(|e| e.due).count(),
        "concepts": entries,
    });
    serde_json::to_string_pretty(&output).unwrap_or_default()
}

pub(crate) fn quota_json(days: &BTreeMap<String, u64>, ceiling: u64) -> String {
    let rows: Vec<serde_json::Value> = days
        .iter()
        .map(|(day, used)| {
            serde_json::json!({
                "day": day,
                "units": used,
                "remaining": ceiling.saturating_sub(*used),
            })
        })
        .collect();
    serde_json::to_string_pretty(&rows).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_json_counts_due() {
        let as_of = NaiveDate::from_ymd_opt(2026, 3, 9).unwrap();
        let entries = vec![
            ConceptStatus {
                concept: "matcha".to_string(),
                last_fetch: None,
                next_due: None,
                due: true,
                queries: 2,
                regions: 3,
            },
            ConceptStatus {
                concept: "ramen".to_string(),
                last_fetch: Some(as_of),
                next_due: NaiveDate::from_ymd_opt(2026, 3, 16),
                due: false,
                queries: 1,
                regions: 3,
            },
        ];
        let json: serde_json::Value = serde_json::from_str(&status_json(as_of, 7, &entries)).unwrap();
        assert_eq!(json["as_of"].as_str(), Some("2026-03-09"));
        assert_eq!(json["due"].as_u64(), Some(1));
        assert_eq!(json["concepts"][1]["next_due"].as_str(), Some("2026-03-16"));
        assert!(json["concepts"][0]["last_fetch"].is_null());
    }

    #[test]
    fn quota_json_reports_remaining() {
        let mut days = BTreeMap::new();
        days.insert("2026-03-08".to_string(), 10_500);
        days.insert("2026-03-09".to_string(), 404);
        let json: serde_json::Value = serde_json::from_str(&quota_json(&days, 10_000)).unwrap();
        assert_eq!(json[0]["remaining"].as_u64(), Some(0));
        assert_eq!(json[1]["remaining"].as_u64(), Some(9_596));
    }
}
