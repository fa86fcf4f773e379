/// Standard date format used throughout the codebase: "2025-01-15"
pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";

/// Compact date stamp used in output file names: "20250115"
pub(crate) const FILE_DATE_FORMAT: &str = "%Y%m%d";

/// Timestamp format written by older fetch-record files
pub(crate) const LEGACY_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Approximate quota cost of one search request
pub(crate) const SEARCH_COST: u64 = 100;

/// Approximate quota cost of one statistics lookup
pub(crate) const VIDEOS_COST: u64 = 1;

/// Default daily quota granted to a fresh API project
pub(crate) const DEFAULT_QUOTA_CEILING: u64 = 10_000;

pub(crate) const DEFAULT_REFRESH_DAYS: u32 = 1;

/// How far back a search looks for published videos
pub(crate) const DEFAULT_LOOKBACK_DAYS: u32 = 30;

/// Results requested per search page
pub(crate) const DEFAULT_MAX_RESULTS: u32 = 25;

pub(crate) const DEFAULT_CONCEPTS_FILE: &str = "concepts.txt";
pub(crate) const DEFAULT_QUERY_WORDS_FILE: &str = "query_words.json";
pub(crate) const DEFAULT_REGIONS_FILE: &str = "regions code.txt";

pub(crate) const FETCH_RECORD_JSON: &str = "last_fetch.json";
pub(crate) const FETCH_RECORD_SQLITE: &str = "fetch_record.db";
pub(crate) const QUOTA_LEDGER_FILE: &str = "quota_usage.json";

pub(crate) const API_KEY_ENV: &str = "YOUTUBE_API_KEY";
pub(crate) const SLACK_WEBHOOK_ENV: &str = "YOUTUBE_SLACK_WEBHOOK_URL";

/// Regions used when no region file is present
pub(crate) const DEFAULT_REGIONS: &[&str] = &[
    "JP", "US", "GB", "IN", "BR", "FR", "DE", "ES", "KR", "CN", "TW", "IT", "RU", "MX", "CA",
    "AU", "ID",
];
