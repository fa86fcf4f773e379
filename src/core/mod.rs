//! Core module - schedule and quota bookkeeping shared by every command

mod quota;
mod schedule;
mod types;

pub(crate) use quota::{QuotaEstimator, QuotaPhase};
pub(crate) use schedule::{FetchRecord, ScheduleTracker};
pub(crate) use types::{Concept, Counters, RegionRow, RunReport};
