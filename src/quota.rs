//! Per-phase usage quotas.
//!
//! Every arm carries a fixed `threshold` and a `used` counter that resets at
//! each phase boundary. All arithmetic is integral.

/// Per-arm thresholds and usage for the current phase.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QuotaLedger {
    thresholds: Vec<u64>,
    used: Vec<u64>,
}

impl QuotaLedger {
    pub fn new(thresholds: Vec<u64>) -> Self {
        let used = vec![0; thresholds.len()];
        Self { thresholds, used }
    }

    pub fn num_arms(&self) -> usize {
        self.thresholds.len()
    }

    pub fn threshold(&self, arm: usize) -> u64 {
        self.thresholds[arm]
    }

    pub fn thresholds(&self) -> &[u64] {
        &self.thresholds
    }

    /// Uses of `arm` in the current phase.
    pub fn used(&self, arm: usize) -> u64 {
        self.used[arm]
    }

    /// Per-arm usage in the current phase.
    pub fn used_all(&self) -> &[u64] {
        &self.used
    }

    /// `threshold - used`; negative once the quota is over-satisfied.
    pub fn remaining_quota(&self, arm: usize) -> i64 {
        self.thresholds[arm] as i64 - self.used[arm] as i64
    }

    /// Whether `arm` has not reached its threshold yet this phase.
    pub fn is_unmet(&self, arm: usize) -> bool {
        self.used[arm] < self.thresholds[arm]
    }

    /// Whether `arm` is short of quota but can still make it within `horizon` more uses.
    ///
    /// `used < threshold <= used + horizon`.
    pub fn is_reachable(&self, arm: usize, horizon: u64) -> bool {
        let used = self.used[arm];
        let t = self.thresholds[arm];
        used < t && t <= used.saturating_add(horizon)
    }

    /// Arms still short of quota, in index order.
    pub fn unmet_arms(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.thresholds.len()).filter(move |&a| self.is_unmet(a))
    }

    /// Total uses recorded this phase (one per round).
    pub fn total_used(&self) -> u64 {
        self.used.iter().sum()
    }

    pub fn record_use(&mut self, arm: usize) {
        self.used[arm] = self.used[arm].saturating_add(1);
    }

    /// Clear usage for a new phase.
    pub fn reset(&mut self) {
        self.used.iter_mut().for_each(|u| *u = 0);
    }
}
