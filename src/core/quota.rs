//! Per-run quota estimate
//!
//! Tracks approximate units consumed against a ceiling. The counter only
//! grows within a run and is never carried into the next one.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum QuotaPhase {
    Idle,
    Running,
    Exhausted,
    Completed,
}

#[derive(Debug, Clone)]
pub(crate) struct QuotaEstimator {
    used: u64,
    ceiling: u64,
    phase: QuotaPhase,
}

impl QuotaEstimator {
    pub(crate) fn new(ceiling: u64) -> Self {
        Self {
            used: 0,
            ceiling,
            phase: QuotaPhase::Idle,
        }
    }

    /// Record the cost of an issued request and return the running total.
    pub(crate) fn charge(&mut self, unit_cost: u64) -> u64 {
        self.used = self.used.saturating_add(unit_cost);
        self.used
    }

    pub(crate) fn has_budget(&self, planned_unit_cost: u64) -> bool {
        self.used
            .checked_add(planned_unit_cost)
            .is_some_and(|total| total <= self.ceiling)
    }

    /// Gate for the next request. The first refusal is sticky for the rest of the run.
    pub(crate) fn admit(&mut self, planned_unit_cost: u64) -> bool {
        match self.phase {
            QuotaPhase::Exhausted | QuotaPhase::Completed => false,
            QuotaPhase::Idle | QuotaPhase::Running => {
                if self.has_budget(planned_unit_cost) {
                    self.phase = QuotaPhase::Running;
                    true
                } else {
                    self.phase = QuotaPhase::Exhausted;
                    false
                }
            }
        }
    }

    pub(crate) fn finish(&mut self) -> QuotaPhase {
        if self.phase != QuotaPhase::Exhausted {
            self.phase = QuotaPhase::Completed;
        }
        self.phase
    }

    pub(crate) fn used(&self) -> u64 {
        self.used
    }

    pub(crate) fn ceiling(&self) -> u64 {
        self.ceiling
    }

    pub(crate) fn remaining(&self) -> u64 {
        self.ceiling.saturating_sub(self.used)
    }

    #[cfg(test)]
    pub(crate) fn phase(&self) -> QuotaPhase {
        self.phase
    }

    pub(crate) fn is_exhausted(&self) -> bool {
        self.phase == QuotaPhase::Exhausted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn charge_is_additive() {
        let mut quota = QuotaEstimator::new(100);
        assert_eq!(quota.charge(5), 5);
        assert_eq!(quota.charge(3), 8);
        assert_eq!(quota.used(), 8);
        assert_eq!(quota.remaining(), 92);
    }

    #[test]
    fn has_budget_matches_inequality() {
        for ceiling in [0u64, 1, 7, 10] {
            for used in 0..=ceiling {
                let mut quota = QuotaEstimator::new(ceiling);
                quota.charge(used);
                for k in 0..=12 {
                    assert_eq!(quota.has_budget(k), used + k <= ceiling);
                }
            }
        }
    }

    #[test]
    fn has_budget_does_not_overflow() {
        let mut quota = QuotaEstimator::new(u64::MAX);
        quota.charge(10);
        assert!(!quota.has_budget(u64::MAX));
    }

    #[test]
    fn exhaustion_stops_charging() {
        let mut quota = QuotaEstimator::new(10);
        let mut charges = 0;
        for _ in 0..5 {
            if !quota.admit(4) {
                break;
            }
            quota.charge(4);
            charges += 1;
        }
        assert_eq!(charges, 2);
        assert_eq!(quota.used(), 8);
        assert_eq!(quota.phase(), QuotaPhase::Exhausted);
    }

    #[test]
    fn exhausted_refusal_is_sticky() {
        let mut quota = QuotaEstimator::new(10);
        quota.charge(8);
        assert!(!quota.admit(4));
        // would fit, but the run has already stopped
        assert!(!quota.admit(1));
        assert_eq!(quota.finish(), QuotaPhase::Exhausted);
    }

    #[test]
    fn phase_transitions() {
        let mut quota = QuotaEstimator::new(10);
        assert_eq!(quota.phase(), QuotaPhase::Idle);
        assert!(quota.admit(1));
        assert_eq!(quota.phase(), QuotaPhase::Running);
        quota.charge(1);
        assert_eq!(quota.finish(), QuotaPhase::Completed);
        assert!(!quota.admit(1));
    }

    #[test]
    fn idle_run_completes() {
        let mut quota = QuotaEstimator::new(0);
        assert_eq!(quota.finish(), QuotaPhase::Completed);
        assert!(!quota.is_exhausted());
    }
}
