//! `quotaplan`: deterministic per-user arm planning under per-phase usage quotas.
//!
//! Designed for repeated-allocation simulations: each round a harness samples a
//! user type, asks the planner which arm (content item) to show, then reports a
//! scalar reward for that one (user, arm) pair. The planner learns, per user
//! type, which arm pays best, while keeping arms alive under a survival rule:
//!
//! - Every arm has a **threshold**: the minimum number of uses it needs in each
//!   phase of `phase_len` rounds.
//! - An arm that misses its threshold at a phase boundary is **retired** and
//!   never selected again.
//! - When arms outnumber user types, the weakest arms are **pruned** once, on
//!   entering the exploit era, leaving one active arm per user type.
//!
//! **Goals:**
//! - **Deterministic**: same users + rewards → same arms, bit for bit. No RNG;
//!   every tie goes to the lowest arm index.
//! - **Explicit state**: the phase clock, quotas, lifecycle and estimates are
//!   separate values owned by one [`Planner`].
//! - **Fail fast**: out-of-order calls and bad inputs return [`PlannerError`]
//!   and leave state untouched.
//!
//! **Selection policies:**
//! - Explore (phases `0..=num_arms + 4`): [`select_explore`] fills quotas,
//!   showing each user the arm they have seen least.
//! - Exploit (afterwards): [`select_exploit`] is greedy on the per-user reward
//!   estimate, with an end-of-phase rescue window for arms that can still make
//!   quota.
//!
//! **Non-goals:**
//! - Sampling users, generating rewards and driving the round loop are the
//!   harness's job.
//! - No persistence, no concurrency, no coordination between planners.
//!
//! # Quick start
//!
//! ```rust
//! use quotaplan::{Planner, PlannerConfig};
//!
//! let cfg = PlannerConfig::new(3, 2, 10)
//!     .with_thresholds(vec![2, 2, 2])
//!     .with_rounds(1_000);
//! let mut planner = Planner::new(cfg).unwrap();
//!
//! for round in 0..1_000usize {
//!     let user = round % 2;
//!     let arm = planner.choose_arm(user).unwrap();
//!     let reward = if arm == user { 1.0 } else { 0.2 };
//!     planner.notify_outcome(reward).unwrap();
//! }
//! assert_eq!(planner.rounds_observed(), 1_000);
//! ```
//!
//! # Logging
//!
//! The planner emits [`tracing`] events: `debug` per selection and outcome,
//! `info` on phase boundaries and pruning, `warn` on retirement and
//! exhaustion. Install any subscriber to see them.

#![forbid(unsafe_code)]

mod error;
pub use error::*;

mod config;
pub use config::*;

mod clock;
pub use clock::*;

mod quota;
pub use quota::*;

mod estimator;
pub use estimator::*;

mod lifecycle;
pub use lifecycle::*;

mod decision;
pub use decision::*;

mod selector;
pub use selector::*;

mod planner;
pub use planner::*;

/// Crate version, for stamping logs and reports.
pub const QUOTAPLAN_VERSION: &str = env!("CARGO_PKG_VERSION");
