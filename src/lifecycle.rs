//! Arm retirement.
//!
//! Arms leave the pool two ways: failing their quota at a phase boundary, or
//! being pruned once when arms outnumber user types. Both are permanent.

use crate::{QuotaLedger, RewardTable};

/// Active flags for every arm, plus the one-shot pruning latch.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ArmLifecycle {
    active: Vec<bool>,
    pruned: bool,
}

#[derive(Debug, Clone, Copy)]
struct PruneRow {
    arm: usize,
    zero_threshold: bool,
    mass: f64,
}

impl ArmLifecycle {
    /// All arms start active.
    pub fn new(num_arms: usize) -> Self {
        Self {
            active: vec![true; num_arms],
            pruned: false,
        }
    }

    pub fn is_active(&self, arm: usize) -> bool {
        self.active[arm]
    }

    pub fn active_count(&self) -> usize {
        self.active.iter().filter(|&&a| a).count()
    }

    /// Active arms in index order.
    pub fn active_arms(&self) -> Vec<usize> {
        (0..self.active.len()).filter(|&a| self.active[a]).collect()
    }

    /// Retired arms in index order.
    pub fn retired_arms(&self) -> Vec<usize> {
        (0..self.active.len()).filter(|&a| !self.active[a]).collect()
    }

    /// Whether the excess-pruning pass has already run.
    pub fn pruned(&self) -> bool {
        self.pruned
    }

    /// Retire `arm`. Returns `false` if it was already inactive.
    pub fn deactivate(&mut self, arm: usize) -> bool {
        std::mem::replace(&mut self.active[arm], false)
    }

    /// Retire every active arm whose quota is still unmet. Returns the newly retired arms.
    pub fn retire_unmet(&mut self, quotas: &QuotaLedger) -> Vec<usize> {
        let failing: Vec<usize> = quotas.unmet_arms().collect();
        failing.into_iter().filter(|&a| self.deactivate(a)).collect()
    }

    /// One-time pass that trims the active set down to `keep` arms.
    ///
    /// Ranking, lowest first: zero-threshold arms, then ascending cumulative
    /// reward mass, then arm index. At most `num_arms - keep` arms are retired
    /// and already-inactive arms count toward the target. Later calls are no-ops.
    pub fn prune_excess(
        &mut self,
        keep: usize,
        quotas: &QuotaLedger,
        rewards: &RewardTable,
    ) -> Vec<usize> {
        if self.pruned {
            return Vec::new();
        }
        self.pruned = true;

        let budget = self.active.len().saturating_sub(keep);
        let mut to_retire = self.active_count().saturating_sub(keep).min(budget);
        if to_retire == 0 {
            return Vec::new();
        }

        let mut rows: Vec<PruneRow> = (0..self.active.len())
            .filter(|&a| self.active[a])
            .map(|arm| PruneRow {
                arm,
                zero_threshold: quotas.threshold(arm) == 0,
                mass: rewards.mass(arm),
            })
            .collect();
        rows.sort_by(|a, b| {
            b.zero_threshold
                .cmp(&a.zero_threshold)
                .then_with(|| a.mass.total_cmp(&b.mass))
                .then_with(|| a.arm.cmp(&b.arm))
        });

        let mut out = Vec::with_capacity(to_retire);
        for r in rows {
            if to_retire == 0 {
                break;
            }
            if self.deactivate(r.arm) {
                out.push(r.arm);
                to_retire -= 1;
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deactivate_is_idempotent() {
        let mut l = ArmLifecycle::new(3);
        assert!(l.deactivate(1));
        assert!(!l.deactivate(1));
        assert_eq!(l.active_arms(), vec![0, 2]);
        assert_eq!(l.retired_arms(), vec![1]);
        assert_eq!(l.active_count(), 2);
    }

    #[test]
    fn retire_unmet_only_reports_new_retirements() {
        let mut q = QuotaLedger::new(vec![1, 2, 0]);
        q.record_use(0);
        q.record_use(1);
        let mut l = ArmLifecycle::new(3);
        assert_eq!(l.retire_unmet(&q), vec![1]);
        assert_eq!(l.retire_unmet(&q), Vec::<usize>::new());
        assert!(l.is_active(0));
        assert!(l.is_active(2));
    }

    #[test]
    fn prune_prefers_zero_threshold_then_low_mass() {
        let q = QuotaLedger::new(vec![1, 0, 1, 1]);
        let mut r = RewardTable::new(1, 4);
        r.update(0, 0, 5.0);
        r.update(0, 1, 9.0); // high mass, but zero threshold
        r.update(0, 2, 1.0);
        r.update(0, 3, 3.0);
        let mut l = ArmLifecycle::new(4);
        let out = l.prune_excess(2, &q, &r);
        assert_eq!(out, vec![1, 2]);
        assert_eq!(l.active_arms(), vec![0, 3]);
        assert!(l.pruned());
    }

    #[test]
    fn prune_counts_already_retired_arms() {
        let q = QuotaLedger::new(vec![1, 1, 1, 1]);
        let r = RewardTable::new(1, 4);
        let mut l = ArmLifecycle::new(4);
        l.deactivate(3);
        // keep 2: only one more needs to go; equal mass -> lowest index.
        assert_eq!(l.prune_excess(2, &q, &r), vec![0]);
        assert_eq!(l.active_count(), 2);
    }

    #[test]
    fn prune_runs_once() {
        let q = QuotaLedger::new(vec![1, 1, 1]);
        let r = RewardTable::new(1, 3);
        let mut l = ArmLifecycle::new(3);
        assert_eq!(l.prune_excess(2, &q, &r).len(), 1);
        assert!(l.prune_excess(1, &q, &r).is_empty());
        assert_eq!(l.active_count(), 2);
    }

    #[test]
    fn prune_is_noop_when_already_at_or_below_target() {
        let q = QuotaLedger::new(vec![1, 1, 1]);
        let r = RewardTable::new(1, 3);
        let mut l = ArmLifecycle::new(3);
        l.deactivate(0);
        l.deactivate(1);
        assert!(l.prune_excess(2, &q, &r).is_empty());
        assert_eq!(l.active_arms(), vec![2]);
    }
}
