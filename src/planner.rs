//! Stateful planner: the per-round entry point for a simulation harness.
//!
//! [`Planner`] owns every piece of state (phase clock, quotas, arm lifecycle,
//! reward estimates) and exposes a strictly alternating two-call interface:
//!
//! ```text
//! let arm = planner.choose_arm(user)?;   // pick one arm for this user
//! let reward = harness_reward(user, arm); // your code
//! planner.notify_outcome(reward)?;        // record what happened
//! ```
//!
//! ## Lifecycle
//!
//! 1. **Explore** (phases `0..=num_arms + 4`): fill every arm's quota, showing
//!    each user the arms they have seen least.
//! 2. **Exploit** (afterwards): show each user their best-estimated arm, except
//!    near the end of a phase when an arm that can still make quota is rescued.
//! 3. At each phase boundary, arms that missed quota are retired for good.
//! 4. On entering the first exploit phase, if arms outnumber user types, the
//!    weakest arms are pruned so that one active arm remains per user type.

use tracing::{debug, info, warn};

use crate::selector::{select_explore, select_exploit};
use crate::{
    ArmLifecycle, Decision, Mode, PhaseReport, PhaseTick, PlannerConfig, PlannerError,
    QuotaLedger, Result, RewardTable, SimulationClock,
};

/// Static identifier returned by [`Planner::get_id`].
pub const PLANNER_ID: &str = "quotaplan";

/// The selection awaiting its outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PendingSelection {
    pub user: usize,
    pub arm: usize,
}

/// Quota-aware per-user arm planner.
///
/// ```rust
/// use quotaplan::{Planner, PlannerConfig};
///
/// let cfg = PlannerConfig::new(3, 2, 3).with_thresholds(vec![1, 1, 1]);
/// let mut planner = Planner::new(cfg).unwrap();
///
/// let mut seen = Vec::new();
/// for round in 0..3 {
///     let arm = planner.choose_arm(round % 2).unwrap();
///     seen.push(arm);
///     planner.notify_outcome(1.0).unwrap();
/// }
/// seen.sort();
/// assert_eq!(seen, vec![0, 1, 2]);
/// ```
#[derive(Debug, Clone)]
pub struct Planner {
    cfg: PlannerConfig,
    clock: SimulationClock,
    quotas: QuotaLedger,
    lifecycle: ArmLifecycle,
    rewards: RewardTable,
    pending: Option<PendingSelection>,
    rescue_horizon: u64,
    rounds_observed: u64,
}

impl Planner {
    // -----------------------------------------------------------------------
    // Construction
    // -----------------------------------------------------------------------

    /// Build a planner, rejecting inconsistent configurations.
    pub fn new(cfg: PlannerConfig) -> Result<Self> {
        cfg.validate()?;
        let rescue_horizon = cfg.rescue_horizon();
        debug!(
            num_arms = cfg.num_arms,
            num_users = cfg.num_users,
            phase_len = cfg.phase_len,
            rescue_horizon,
            "planner created"
        );
        Ok(Self {
            clock: SimulationClock::new(cfg.phase_len),
            quotas: QuotaLedger::new(cfg.arms_thresh.clone()),
            lifecycle: ArmLifecycle::new(cfg.num_arms),
            rewards: RewardTable::new(cfg.num_users, cfg.num_arms),
            pending: None,
            rescue_horizon,
            rounds_observed: 0,
            cfg,
        })
    }

    // -----------------------------------------------------------------------
    // Core interface
    // -----------------------------------------------------------------------

    /// Pick an arm for `user` and remember it until [`notify_outcome`](Self::notify_outcome).
    pub fn choose_arm(&mut self, user: usize) -> Result<usize> {
        self.choose_arm_explain(user).map(|d| d.chosen)
    }

    /// Like [`choose_arm`](Self::choose_arm), returning the full [`Decision`].
    pub fn choose_arm_explain(&mut self, user: usize) -> Result<Decision> {
        if let Some(p) = self.pending {
            return Err(PlannerError::SelectionPending {
                user: p.user,
                arm: p.arm,
            });
        }
        if user >= self.cfg.num_users {
            return Err(PlannerError::UserOutOfRange {
                user,
                num_users: self.cfg.num_users,
            });
        }

        let mode = self.mode();
        let picked = match mode {
            Mode::Explore => select_explore(user, &self.quotas, &self.lifecycle, &self.rewards)
                .map(|(arm, note)| (arm, vec![note])),
            Mode::Exploit => select_exploit(
                user,
                &self.clock,
                self.rescue_horizon,
                &self.quotas,
                &self.lifecycle,
                &self.rewards,
            ),
        };
        let Some((chosen, notes)) = picked else {
            warn!(user, phase = self.clock.phase_num(), "no active arm left to select");
            return Err(PlannerError::Exhausted);
        };

        debug!(
            user,
            arm = chosen,
            ?mode,
            phase = self.clock.phase_num(),
            round = self.clock.round_in_phase(),
            "arm selected"
        );
        self.pending = Some(PendingSelection { user, arm: chosen });
        Ok(Decision {
            mode,
            phase_num: self.clock.phase_num(),
            round_in_phase: self.clock.round_in_phase(),
            user,
            chosen,
            notes,
        })
    }

    /// Record the reward for the pending selection.
    ///
    /// Returns a [`PhaseReport`] when this round closed a phase.
    pub fn notify_outcome(&mut self, reward: f64) -> Result<Option<PhaseReport>> {
        if !reward.is_finite() {
            return Err(PlannerError::NonFiniteReward(reward));
        }
        let PendingSelection { user, arm } =
            self.pending.take().ok_or(PlannerError::NoPendingSelection)?;

        self.quotas.record_use(arm);
        let report = match self.clock.tick() {
            PhaseTick::Within => None,
            PhaseTick::Boundary { closed } => Some(self.close_phase(closed)),
        };

        let cell = self.rewards.update(user, arm, reward);
        self.rounds_observed += 1;
        debug!(user, arm, reward, mean = cell.mean, count = cell.count, "outcome recorded");
        Ok(report)
    }

    /// Static identifier for this planner implementation.
    pub fn get_id(&self) -> &'static str {
        PLANNER_ID
    }

    fn close_phase(&mut self, closed: u64) -> PhaseReport {
        let used = self.quotas.used_all().to_vec();
        let retired = self.lifecycle.retire_unmet(&self.quotas);
        self.quotas.reset();
        if !retired.is_empty() {
            warn!(phase = closed, ?retired, "arms retired for missing quota");
        }

        let mut pruned = Vec::new();
        if self.clock.phase_num() == self.cfg.pruning_phase()
            && self.cfg.num_arms > self.cfg.num_users
        {
            pruned = self
                .lifecycle
                .prune_excess(self.cfg.num_users, &self.quotas, &self.rewards);
            info!(
                phase = self.clock.phase_num(),
                excess = self.cfg.excess_arms(),
                ?pruned,
                active = self.lifecycle.active_count(),
                "excess arms pruned"
            );
        }

        info!(
            phase = closed,
            active = self.lifecycle.active_count(),
            "phase closed"
        );
        PhaseReport {
            phase_num: closed,
            used,
            retired,
            pruned,
        }
    }

    // -----------------------------------------------------------------------
    // Read-only accessors
    // -----------------------------------------------------------------------

    pub fn config(&self) -> &PlannerConfig {
        &self.cfg
    }

    pub fn clock(&self) -> &SimulationClock {
        &self.clock
    }

    /// Mode the next selection will run in.
    pub fn mode(&self) -> Mode {
        self.clock.mode(self.cfg.last_explore_phase())
    }

    /// Whether the next selection falls in the exploit rescue window.
    pub fn in_rescue_window(&self) -> bool {
        self.mode() == Mode::Exploit && self.clock.in_rescue_window(self.rescue_horizon)
    }

    /// Returns `false` for out-of-range arms.
    pub fn is_active(&self, arm: usize) -> bool {
        arm < self.cfg.num_arms && self.lifecycle.is_active(arm)
    }

    pub fn active_arms(&self) -> Vec<usize> {
        self.lifecycle.active_arms()
    }

    pub fn retired_arms(&self) -> Vec<usize> {
        self.lifecycle.retired_arms()
    }

    /// Whether the one-time excess pruning has run.
    pub fn pruned(&self) -> bool {
        self.lifecycle.pruned()
    }

    pub fn rewards(&self) -> &RewardTable {
        &self.rewards
    }

    pub fn quotas(&self) -> &QuotaLedger {
        &self.quotas
    }

    pub fn pending(&self) -> Option<PendingSelection> {
        self.pending
    }

    /// Completed rounds (outcomes recorded).
    pub fn rounds_observed(&self) -> u64 {
        self.rounds_observed
    }
}

// ============================================================================
// Tests
// ============================================================================
