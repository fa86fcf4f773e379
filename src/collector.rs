//! Collection run
//!
//! Walks due concepts, then query words, then regions, in order. Every
//! request is gated by the quota estimator; the fetch record only advances
//! for concepts that finished cleanly.

use std::collections::{BTreeMap, HashSet};

use chrono::{Days, NaiveDate};
use tracing::{debug, info, warn};

use crate::core::{Concept, QuotaEstimator, RegionRow, RunReport, ScheduleTracker};
use crate::error::PersistenceError;
use crate::notify::{Event, Notifier};
use crate::output::OutputSink;
use crate::source::DataSource;
use crate::store::FetchStore;

#[derive(Debug, Clone, Copy)]
pub(crate) struct RunOptions {
    pub(crate) as_of: NaiveDate,
    pub(crate) refresh_interval_days: u32,
    /// Search window for concepts that were never fetched
    pub(crate) lookback_days: u32,
    /// Treat every concept as due
    pub(crate) force: bool,
}

impl RunOptions {
    /// Earliest publish date counted for `concept`: its last fetch, or
    /// `lookback_days` before `as_of` on the first run.
    pub(crate) fn search_since(&self, tracker: &ScheduleTracker, concept: &str) -> NaiveDate {
        tracker.last_fetch(concept).unwrap_or_else(|| {
            self.as_of
                .checked_sub_days(Days::new(u64::from(self.lookback_days)))
                .unwrap_or(self.as_of)
        })
    }
}

pub(crate) struct Collector<'a> {
    pub(crate) source: &'a dyn DataSource,
    pub(crate) store: &'a dyn FetchStore,
    pub(crate) sink: &'a mut dyn OutputSink,
    pub(crate) notifier: &'a dyn Notifier,
}

enum ConceptOutcome {
    Completed(Vec<RegionRow>),
    Failed(Vec<RegionRow>),
    Exhausted,
}

impl Collector<'_> {
    pub(crate) fn run(
        &mut self,
        concepts: &[Concept],
        tracker: &mut ScheduleTracker,
        quota: &mut QuotaEstimator,
        options: RunOptions,
    ) -> Result<RunReport, PersistenceError> {
        let mut report = RunReport::new(quota.ceiling());
        let total = concepts.len();
        self.notifier.notify(&Event::Started(format!(
            "Demand collection started: {total} concepts, budget {} units, source {}",
            quota.ceiling(),
            self.source.display_name(),
        )));

        let mut seen: HashSet<&str> = HashSet::with_capacity(total);
        for (index, concept) in concepts.iter().enumerate() {
            if !seen.insert(concept.label.as_str()) {
                debug!("duplicate concept '{}' ignored", concept.label);
                continue;
            }

            if !options.force
                && !tracker.is_due(&concept.label, options.as_of, options.refresh_interval_days)
            {
                let msg = format!(
                    "Skip concept '{}': last fetched {} (refresh every {} day(s))",
                    concept.label,
                    tracker
                        .last_fetch(&concept.label)
                        .map(|d| d.to_string())
                        .unwrap_or_default(),
                    options.refresh_interval_days,
                );
                info!("{msg}");
                self.notifier.notify(&Event::Progress(msg));
                report.skipped_not_due.push(concept.label.clone());
                continue;
            }

            if quota.is_exhausted() {
                report.left_due.push(concept.label.clone());
                continue;
            }

            if concept.queries.is_empty() || concept.regions.is_empty() {
                let msg = format!(
                    "Concept '{}' has {} queries and {} regions; nothing to collect",
                    concept.label,
                    concept.queries.len(),
                    concept.regions.len(),
                );
                warn!("{msg}");
                self.notifier.notify(&Event::Error(msg));
                report.failed.push(concept.label.clone());
                continue;
            }

            info!("Processing concept: {} ({}/{total})", concept.label, index + 1);
            let since = options.search_since(tracker, &concept.label);
            let (rows, clean) = match self.collect_concept(concept, since, quota) {
                ConceptOutcome::Exhausted => {
                    let msg = format!(
                        "Quota budget exhausted at {} / {} units; '{}' and later concepts stay due",
                        quota.used(),
                        quota.ceiling(),
                        concept.label,
                    );
                    warn!("{msg}");
                    self.notifier.notify(&Event::Progress(msg));
                    report.left_due.push(concept.label.clone());
                    continue;
                }
                ConceptOutcome::Completed(rows) => (rows, true),
                ConceptOutcome::Failed(rows) => (rows, false),
            };

            let written = match self.sink.write_concept(&concept.label, &rows) {
                Ok(()) => {
                    report.rows_written += rows.len();
                    true
                }
                Err(e) => {
                    warn!("Failed saving outputs for {}: {e}", concept.label);
                    self.notifier.notify(&Event::Error(format!(
                        "Failed saving outputs for '{}': {e}",
                        concept.label
                    )));
                    false
                }
            };

            if clean && written {
                tracker.mark_fetched(&concept.label, options.as_of);
                self.store.save(tracker.record())?;
                report.processed.push(concept.label.clone());
                self.notifier.notify(&Event::Progress(format!(
                    "Completed concept {} ({}/{total}), {} units used, {} remaining",
                    concept.label,
                    index + 1,
                    quota.used(),
                    quota.remaining(),
                )));
            } else {
                report.failed.push(concept.label.clone());
            }
        }

        report.phase = quota.finish();
        report.units_charged = quota.used();

        // Always end by persisting whatever was accumulated
        self.store.save(tracker.record())?;
        debug!("fetch record saved to {}", self.store.location());

        self.notifier.notify(&Event::Completed(format!(
            "Demand collection finished: {} processed, {} not due, {} failed, {} left due, {} / {} units",
            report.processed.len(),
            report.skipped_not_due.len(),
            report.failed.len(),
            report.left_due.len(),
            report.units_charged,
            report.quota_ceiling,
        )));
        Ok(report)
    }

    fn collect_concept(
        &self,
        concept: &Concept,
        since: NaiveDate,
        quota: &mut QuotaEstimator,
    ) -> ConceptOutcome {
        let mut rows: BTreeMap<&str, RegionRow> = concept
            .regions
            .iter()
            .map(|r| (r.as_str(), RegionRow::new(&concept.label, r)))
            .collect();
        let mut failures = 0u32;
        let cost = self.source.query_cost();

        for query in &concept.queries {
            for region in &concept.regions {
                if !quota.admit(cost) {
                    return ConceptOutcome::Exhausted;
                }
                let result = self.source.fetch(query, region, since);
                let used = quota.charge(cost);
                debug!("q={query} region={region} charged {cost}, total {used}");

                let Some(row) = rows.get_mut(region.as_str()) else {
                    continue;
                };
                match result {
                    Ok(counters) => {
                        row.counters.add(&counters);
                        row.queries_ok += 1;
                    }
                    Err(e) => {
                        failures += 1;
                        row.queries_failed += 1;
                        warn!("Search failed region={region} q={query}: {e}");
                        self.notifier.notify(&Event::Error(format!(
                            "Concept '{}' query '{query}' region {region} failed: {e}",
                            concept.label
                        )));
                    }
                }
            }
        }

        // Preserve configured region order in the output
        let ordered: Vec<RegionRow> = concept
            .regions
            .iter()
            .filter_map(|r| rows.remove(r.as_str()))
            .collect();
        if failures == 0 {
            ConceptOutcome::Completed(ordered)
        } else {
            ConceptOutcome::Failed(ordered)
        }
    }
}
