//! Error types for planner construction and the per-round calls.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, PlannerError>;

/// Errors surfaced by [`Planner`](crate::Planner).
///
/// Every variant is a caller mistake or a terminal condition; nothing here is
/// retriable. A call that returns an error leaves the planner untouched.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlannerError {
    /// A construction parameter is out of its domain.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// `arms_thresh` does not have one entry per arm.
    #[error("threshold count mismatch: expected {expected} thresholds, got {actual}")]
    ThresholdCountMismatch { expected: usize, actual: usize },

    /// The sampled user is outside `[0, num_users)`.
    #[error("user {user} out of range (num_users = {num_users})")]
    UserOutOfRange { user: usize, num_users: usize },

    /// `notify_outcome` was called without an unconsumed `choose_arm`.
    #[error("notify_outcome called without a pending selection")]
    NoPendingSelection,

    /// `choose_arm` was called again before the previous outcome arrived.
    #[error("selection already pending (user {user}, arm {arm}); notify_outcome first")]
    SelectionPending { user: usize, arm: usize },

    /// The reward is NaN or infinite.
    #[error("reward must be finite, got {0}")]
    NonFiniteReward(f64),

    /// Every arm has been retired; nothing can be selected.
    #[error("all arms are inactive")]
    Exhausted,
}
