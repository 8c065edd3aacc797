//! Construction parameters for a [`Planner`](crate::Planner).
//!
//! All parameters are supplied once and never change afterwards. The planner
//! validates them in [`Planner::new`](crate::Planner::new); call
//! [`PlannerConfig::validate`] yourself to check a config without building one.

use crate::{PlannerError, Result};

/// Phases spent exploring past `num_arms` before exploitation starts.
///
/// Explore runs while `phase_num <= num_arms + EXPLORE_EXTRA_PHASES`.
pub const EXPLORE_EXTRA_PHASES: u64 = 4;

/// Full configuration for a [`Planner`](crate::Planner).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlannerConfig {
    /// Total rounds the harness intends to run.
    ///
    /// Informational: the planner does not stop after this many rounds.
    pub num_rounds: u64,
    /// Rounds per phase (must be > 0).
    pub phase_len: usize,
    /// Number of arms (must be > 0).
    pub num_arms: usize,
    /// Number of user types (must be > 0).
    pub num_users: usize,
    /// Minimum uses per phase, one entry per arm.
    pub arms_thresh: Vec<u64>,
    /// User sampling distribution, owned by the harness.
    ///
    /// Carried for completeness; the planner never reads or validates it.
    pub users_distribution: Vec<f64>,
}

impl PlannerConfig {
    /// Build a config with uniform user distribution and zero thresholds.
    ///
    /// Use the `with_*` helpers to fill in the rest.
    pub fn new(num_arms: usize, num_users: usize, phase_len: usize) -> Self {
        let uniform = if num_users > 0 {
            1.0 / num_users as f64
        } else {
            0.0
        };
        Self {
            num_rounds: 0,
            phase_len,
            num_arms,
            num_users,
            arms_thresh: vec![0; num_arms],
            users_distribution: vec![uniform; num_users],
        }
    }

    /// Set per-arm thresholds.
    pub fn with_thresholds(mut self, arms_thresh: Vec<u64>) -> Self {
        self.arms_thresh = arms_thresh;
        self
    }

    /// Set the planned number of rounds.
    pub fn with_rounds(mut self, num_rounds: u64) -> Self {
        self.num_rounds = num_rounds;
        self
    }

    /// Set the harness-side user distribution.
    pub fn with_users_distribution(mut self, users_distribution: Vec<f64>) -> Self {
        self.users_distribution = users_distribution;
        self
    }

    /// Reject configurations the planner cannot run.
    pub fn validate(&self) -> Result<()> {
        if self.phase_len == 0 {
            return Err(PlannerError::InvalidConfig("phase_len must be > 0".into()));
        }
        if self.num_arms == 0 {
            return Err(PlannerError::InvalidConfig("num_arms must be > 0".into()));
        }
        if self.num_users == 0 {
            return Err(PlannerError::InvalidConfig("num_users must be > 0".into()));
        }
        if self.arms_thresh.len() != self.num_arms {
            return Err(PlannerError::ThresholdCountMismatch {
                expected: self.num_arms,
                actual: self.arms_thresh.len(),
            });
        }
        Ok(())
    }

    /// Last phase number (inclusive) run in explore mode.
    pub fn last_explore_phase(&self) -> u64 {
        self.num_arms as u64 + EXPLORE_EXTRA_PHASES
    }

    /// Phase number at which the one-time excess pruning fires.
    pub fn pruning_phase(&self) -> u64 {
        self.last_explore_phase() + 1
    }

    /// Arms beyond the user-type count (0 when arms do not outnumber users).
    pub fn excess_arms(&self) -> usize {
        self.num_arms.saturating_sub(self.num_users)
    }

    /// `floor(sum(thresholds) / num_arms)`: the per-arm average quota.
    ///
    /// The floor is intentional; it sets the rescue window length.
    pub fn mean_threshold_floor(&self) -> u64 {
        if self.num_arms == 0 {
            return 0;
        }
        let total: u64 = self.arms_thresh.iter().fold(0u64, |acc, &t| acc.saturating_add(t));
        total / self.num_arms as u64
    }

    /// Rescue horizon: `phase_len - floor(sum(thresholds) / num_arms)`, saturating at 0.
    ///
    /// This is both the round index at which the rescue window opens and the
    /// look-ahead used to decide whether an arm can still reach its quota.
    pub fn rescue_horizon(&self) -> u64 {
        (self.phase_len as u64).saturating_sub(self.mean_threshold_floor())
    }
}
