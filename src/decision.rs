//! Audit records for selections and phase boundaries.
//!
//! A [`Decision`] explains one `choose_arm` call; a [`PhaseReport`] summarises
//! the phase that a `notify_outcome` call closed. Both are plain data so a
//! harness can log or diff them between runs.

use crate::Mode;

/// Why a selection came out the way it did.
///
/// Prefer adding new variants over changing existing semantics.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DecisionNote {
    /// Explore: some active arms were still short of quota; the chosen arm is
    /// the one this user has seen least among them.
    QuotaPending { candidates: Vec<usize> },

    /// Explore: every active arm met its quota; the chosen arm is the one this
    /// user has seen least overall.
    QuotasMet,

    /// Exploit: highest estimated reward for this user.
    Greedy { estimate: f64 },

    /// Exploit, rescue window: the greedy pick was replaced by an arm that can
    /// still reach its quota this phase.
    RescueOverride {
        default_arm: usize,
        rescue_set: Vec<usize>,
    },
}

/// A single selection in an audit-friendly envelope.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Decision {
    /// Mode the planner was in.
    pub mode: Mode,
    /// Phase the selection belongs to.
    pub phase_num: u64,
    /// Round within that phase.
    pub round_in_phase: u64,
    /// The sampled user.
    pub user: usize,
    /// The selected arm.
    pub chosen: usize,
    pub notes: Vec<DecisionNote>,
}

/// Summary of a phase that just closed.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PhaseReport {
    /// The phase number that closed.
    pub phase_num: u64,
    /// Per-arm uses during that phase.
    pub used: Vec<u64>,
    /// Arms retired for missing their quota.
    pub retired: Vec<usize>,
    /// Arms retired by the one-time excess pruning (empty unless it fired here).
    pub pruned: Vec<usize>,
}

impl PhaseReport {
    /// Total rounds played in the phase.
    pub fn rounds(&self) -> u64 {
        self.used.iter().sum()
    }
}
