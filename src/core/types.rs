//! Core data types for a collection run
//!
//! Concepts arrive from the input loaders; counters and rows flow from the
//! data source to the output sink.

use serde::Serialize;

use super::quota::QuotaPhase;

/// A topic whose cross-regional demand is measured
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Concept {
    pub(crate) label: String,
    pub(crate) queries: Vec<String>,
    pub(crate) regions: Vec<String>,
}

impl Concept {
    pub(crate) fn new(label: impl Into<String>, queries: Vec<String>, regions: Vec<String>) -> Self {
        Self {
            label: label.into(),
            queries,
            regions,
        }
    }
}

/// Engagement counters returned for one query in one region
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub(crate) struct Counters {
    pub(crate) view_count: u64,
    pub(crate) like_count: u64,
    pub(crate) comment_count: u64,
}

impl Counters {
    pub(crate) fn add(&mut self, other: &Counters) {
        self.view_count = self.view_count.saturating_add(other.view_count);
        self.like_count = self.like_count.saturating_add(other.like_count);
        self.comment_count = self.comment_count.saturating_add(other.comment_count);
    }
}

/// Aggregated counters for one concept in one region
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct RegionRow {
    pub(crate) concept: String,
    pub(crate) region: String,
    pub(crate) counters: Counters,
    pub(crate) queries_ok: u32,
    pub(crate) queries_failed: u32,
}

impl RegionRow {
    pub(crate) fn new(concept: &str, region: &str) -> Self {
        Self {
            concept: concept.to_string(),
            region: region.to_string(),
            counters: Counters::default(),
            queries_ok: 0,
            queries_failed: 0,
        }
    }
}

/// Outcome of one collection run
#[derive(Debug, Clone, Serialize)]
pub(crate) struct RunReport {
    pub(crate) processed: Vec<String>,
    pub(crate) skipped_not_due: Vec<String>,
    pub(crate) failed: Vec<String>,
    /// Concepts left untouched (or partially done) when the budget ran out
    pub(crate) left_due: Vec<String>,
    pub(crate) units_charged: u64,
    pub(crate) quota_ceiling: u64,
    pub(crate) rows_written: usize,
    pub(crate) phase: QuotaPhase,
}

impl RunReport {
    pub(crate) fn new(quota_ceiling: u64) -> Self {
        Self {
            processed: Vec::new(),
            skipped_not_due: Vec::new(),
            failed: Vec::new(),
            left_due: Vec::new(),
            units_charged: 0,
            quota_ceiling,
            rows_written: 0,
            phase: QuotaPhase::Idle,
        }
    }

    pub(crate) fn exhausted(&self) -> bool {
        self.phase == QuotaPhase::Exhausted
    }
}
