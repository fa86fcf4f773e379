mod csv;
mod format;
mod json;
mod table;

use chrono::NaiveDate;
use serde::Serialize;

use crate::core::RegionRow;
use crate::error::OutputError;

pub(crate) use csv::CsvSink;
pub(crate) use json::{quota_json, status_json};
pub(crate) use table::{print_quota_table, print_run_summary, print_status_table};

/// Receives the aggregated rows of each completed concept
pub(crate) trait OutputSink {
    fn write_concept(&mut self, concept: &str, rows: &[RegionRow]) -> Result<(), OutputError>;
}

/// Schedule view of one concept, as shown by the status command
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct ConceptStatus {
    pub(crate) concept: String,
    pub(crate) last_fetch: Option<NaiveDate>,
    pub(crate) next_due: Option<NaiveDate>,
    pub(crate) due: bool,
    pub(crate) queries: usize,
    pub(crate) regions: usize,
}
