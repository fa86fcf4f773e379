//! Video platform client
//!
//! One logical query is a relevance search in a region followed by a single
//! statistics lookup for the returned video IDs.

use std::time::Duration;

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::core::Counters;
use crate::error::TransportError;

use super::DataSource;

const SEARCH_URL: &str = "https://www.googleapis.com/youtube/v3/search";
const VIDEOS_URL: &str = "https://www.googleapis.com/youtube/v3/videos";
const FETCH_TIMEOUT: Duration = Duration::from_secs(15);
const FETCH_RETRIES: usize = 3;
const RETRY_BACKOFF_MS: u64 = 500;
/// The statistics endpoint accepts at most 50 IDs per call
const MAX_IDS_PER_LOOKUP: u32 = 50;

#[derive(Debug, Clone)]
pub(crate) struct YouTubeConfig {
    pub(crate) api_key: String,
    pub(crate) search_cost: u64,
    pub(crate) videos_cost: u64,
    pub(crate) max_results: u32,
}

pub(crate) struct YouTubeSource {
    agent: ureq::Agent,
    config: YouTubeConfig,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: SearchId,
}

#[derive(Debug, Deserialize)]
struct SearchId {
    #[serde(rename = "videoId")]
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VideosResponse {
    #[serde(default)]
    items: Vec<VideoItem>,
}

#[derive(Debug, Deserialize)]
struct VideoItem {
    #[serde(default)]
    statistics: Statistics,
}

/// Counts arrive as decimal strings and are omitted when hidden by the uploader
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Statistics {
    view_count: Option<String>,
    like_count: Option<String>,
    comment_count: Option<String>,
}

impl YouTubeSource {
    pub(crate) fn new(mut config: YouTubeConfig) -> Self {
        config.max_results = config.max_results.clamp(1, MAX_IDS_PER_LOOKUP);
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .timeout_global(Some(FETCH_TIMEOUT))
            .http_status_as_error(false)
            .build()
            .into();
        Self { agent, config }
    }

    fn search(&self, query: &str, region: &str, since: NaiveDate) -> Result<Vec<String>, TransportError> {
        let max_results = self.config.max_results.to_string();
        let published_after = format!("{since}T00:00:00Z");
        let body = self.get_with_retries(SEARCH_URL, &[
            ("part", "id"),
            ("type", "video"),
            ("order", "relevance"),
            ("q", query),
            ("regionCode", region),
            ("maxResults", max_results.as_str()),
            ("publishedAfter", published_after.as_str()),
        ])?;
        parse_video_ids(&body)
    }

    fn statistics(&self, ids: &[String]) -> Result<Counters, TransportError> {
        let joined = ids.join(",");
        let body = self.get_with_retries(VIDEOS_URL, &[("part", "statistics"), ("id", joined.as_str())])?;
        parse_statistics(&body)
    }

    fn get_with_retries(&self, url: &str, params: &[(&str, &str)]) -> Result<String, TransportError> {
        let mut last_err = TransportError::Http("no attempt made".to_string());
        for attempt in 0..FETCH_RETRIES {
            match self.get_once(url, params) {
                Ok(body) => return Ok(body),
                Err(e) if !is_retryable(&e) => return Err(e),
                Err(e) => {
                    warn!("{url} attempt {} failed: {e}", attempt + 1);
                    last_err = e;
                }
            }
            if attempt + 1 < FETCH_RETRIES {
                std::thread::sleep(Duration::from_millis(
                    RETRY_BACKOFF_MS * (attempt as u64 + 1),
                ));
            }
        }
        Err(last_err)
    }

    fn get_once(&self, url: &str, params: &[(&str, &str)]) -> Result<String, TransportError> {
        let mut request = self.agent.get(url).query("key", &self.config.api_key);
        for (k, v) in params {
            request = request.query(*k, *v);
        }
        let response = request
            .call()
            .map_err(|e| TransportError::Http(e.to_string()))?;
        let status = response.status().as_u16();
        let mut body = response.into_body();
        let text = body
            .read_to_string()
            .map_err(|e| TransportError::Http(e.to_string()))?;
        if (200..300).contains(&status) {
            Ok(text)
        } else {
            Err(classify_status(status, &text))
        }
    }
}

impl DataSource for YouTubeSource {
    fn display_name(&self) -> &'static str {
        "YouTube Data API"
    }

    fn query_cost(&self) -> u64 {
        self.config.search_cost.saturating_add(self.config.videos_cost)
    }

    fn fetch(&self, query: &str, region: &str, since: NaiveDate) -> Result<Counters, TransportError> {
        let ids = self.search(query, region, since)?;
        debug!("search q={query} region={region}: {} videos", ids.len());
        if ids.is_empty() {
            return Ok(Counters::default());
        }
        self.statistics(&ids)
    }
}

fn is_retryable(err: &TransportError) -> bool {
    match err {
        TransportError::Http(_) => true,
        TransportError::Status { status } => *status >= 500,
        TransportError::RateLimited | TransportError::Decode(_) => false,
    }
}

fn classify_status(status: u16, body: &str) -> TransportError {
    let quota_reason = body.contains("quotaExceeded")
        || body.contains("rateLimitExceeded")
        || body.contains("userRateLimitExceeded");
    if status == 429 || (status == 403 && quota_reason) {
        TransportError::RateLimited
    } else {
        TransportError::Status { status }
    }
}

/// Video IDs in result order, without duplicates
fn parse_video_ids(body: &str) -> Result<Vec<String>, TransportError> {
    let parsed: SearchResponse =
        serde_json::from_str(body).map_err(|e| TransportError::Decode(e.to_string()))?;
    let mut ids: Vec<String> = Vec::with_capacity(parsed.items.len());
    for id in parsed.items.into_iter().filter_map(|item| item.id.video_id) {
        if !ids.contains(&id) {
            ids.push(id);
        }
    }
    Ok(ids)
}

fn parse_statistics(body: &str) -> Result<Counters, TransportError> {
    let parsed: VideosResponse =
        serde_json::from_str(body).map_err(|e| TransportError::Decode(e.to_string()))?;
    let mut total = Counters::default();
    for item in parsed.items {
        let stats = item.statistics;
        total.add(&Counters {
            view_count: parse_count(stats.view_count.as_deref()),
            like_count: parse_count(stats.like_count.as_deref()),
            comment_count: parse_count(stats.comment_count.as_deref()),
        });
    }
    Ok(total)
}

fn parse_count(raw: Option<&str>) -> u64 {
    raw.and_then(|s| s.trim().parse().ok()).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> YouTubeConfig {
        YouTubeConfig {
            api_key: "test-key".to_string(),
            search_cost: 100,
            videos_cost: 1,
            max_results: 25,
        }
    }

    #[test]
    fn query_cost_is_search_plus_lookup() {
        let source = YouTubeSource::new(config());
        assert_eq!(source.query_cost(), 101);
    }

    #[test]
    fn query_cost_saturates() {
        let source = YouTubeSource::new(YouTubeConfig {
            search_cost: u64::MAX,
            videos_cost: 1,
            ..config()
        });
        assert_eq!(source.query_cost(), u64::MAX);
    }

    #[test]
    fn max_results_is_clamped_to_one_lookup() {
        let source = YouTubeSource::new(YouTubeConfig {
            max_results: 500,
            ..config()
        });
        assert_eq!(source.config.max_results, 50);
    }

    #[test]
    fn video_ids_keep_order_and_drop_duplicates() {
        let body = r#"{"items":[
            {"id":{"kind":"youtube#video","videoId":"b"}},
            {"id":{"kind":"youtube#video","videoId":"a"}},
            {"id":{"kind":"youtube#channel","channelId":"c"}},
            {"id":{"kind":"youtube#video","videoId":"b"}}
        ]}"#;
        assert_eq!(parse_video_ids(body).unwrap(), vec!["b", "a"]);
    }

    #[test]
    fn empty_search_has_no_ids() {
        assert!(parse_video_ids(r#"{"kind":"youtube#searchListResponse"}"#)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn statistics_are_summed() {
        let body = r#"{"items":[
            {"id":"a","statistics":{"viewCount":"1000","likeCount":"50","commentCount":"7"}},
            {"id":"b","statistics":{"viewCount":"24","commentCount":"1"}},
            {"id":"c"}
        ]}"#;
        let counters = parse_statistics(body).unwrap();
        assert_eq!(counters.view_count, 1024);
        assert_eq!(counters.like_count, 50);
        assert_eq!(counters.comment_count, 8);
    }

    #[test]
    fn malformed_body_is_decode_error() {
        assert!(matches!(
            parse_statistics("<html>"),
            Err(TransportError::Decode(_))
        ));
    }

    #[test]
    fn quota_responses_are_rate_limited() {
        let body = r#"{"error":{"code":403,"errors":[{"reason":"quotaExceeded"}]}}"#;
        assert!(matches!(classify_status(403, body), TransportError::RateLimited));
        assert!(matches!(classify_status(429, ""), TransportError::RateLimited));
        assert!(matches!(
            classify_status(403, r#"{"error":{"errors":[{"reason":"forbidden"}]}}"#),
            TransportError::Status { status: 403 }
        ));
    }

    #[test]
    fn only_transient_errors_retry() {
        assert!(is_retryable(&TransportError::Http("reset".to_string())));
        assert!(is_retryable(&TransportError::Status { status: 503 }));
        assert!(!is_retryable(&TransportError::Status { status: 400 }));
        assert!(!is_retryable(&TransportError::RateLimited));
    }
}
