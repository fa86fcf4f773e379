//! Incremental-fetch bookkeeping
//!
//! Decides which concepts are due for collection and records when each one
//! last completed.

use std::collections::BTreeMap;

use chrono::NaiveDate;

/// Last successful fetch date per concept label
pub(crate) type FetchRecord = BTreeMap<String, NaiveDate>;

#[derive(Debug, Default, Clone)]
pub(crate) struct ScheduleTracker {
    record: FetchRecord,
}

impl ScheduleTracker {
    pub(crate) fn new(record: FetchRecord) -> Self {
        Self { record }
    }

    /// A concept with no record is always due; otherwise it is due once
    /// `refresh_interval_days` whole days have passed since its last fetch.
    pub(crate) fn is_due(&self, concept: &str, as_of: NaiveDate, refresh_interval_days: u32) -> bool {
        match self.record.get(concept) {
            None => true,
            Some(last) => (as_of - *last).num_days() >= i64::from(refresh_interval_days),
        }
    }

    pub(crate) fn mark_fetched(&mut self, concept: &str, as_of: NaiveDate) {
        self.record.insert(concept.to_string(), as_of);
    }

    pub(crate) fn last_fetch(&self, concept: &str) -> Option<NaiveDate> {
        self.record.get(concept).copied()
    }

    /// First date on which `concept` becomes due again, or `None` if it is due now regardless.
    pub(crate) fn next_due(&self, concept: &str, refresh_interval_days: u32) -> Option<NaiveDate> {
        let last = self.record.get(concept)?;
        last.checked_add_days(chrono::Days::new(u64::from(refresh_interval_days)))
    }

    pub(crate) fn record(&self) -> &FetchRecord {
        &self.record
    }

    #[cfg(test)]
    pub(crate) fn into_record(self) -> FetchRecord {
        self.record
    }
}
