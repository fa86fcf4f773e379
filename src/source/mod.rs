//! Data source abstraction layer
//!
//! The collector asks a source for engagement counters of one query in one
//! region. Retries and backoff live inside the source; the collector only
//! sees the final outcome and charges quota for the attempt.

pub(crate) mod youtube;

use chrono::NaiveDate;

use crate::core::Counters;
use crate::error::TransportError;

pub(crate) use youtube::{YouTubeConfig, YouTubeSource};

/// Data source trait - implemented by each remote API client
pub(crate) trait DataSource {
    /// Display name for log lines and notifications
    fn display_name(&self) -> &'static str;

    /// Estimated quota units consumed by one [`fetch`](Self::fetch) attempt
    fn query_cost(&self) -> u64;

    /// Aggregate counters for `query` scoped to `region`, counting only
    /// videos published on or after `since`
    fn fetch(&self, query: &str, region: &str, since: NaiveDate) -> Result<Counters, TransportError>;
}
