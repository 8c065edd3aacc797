//! Arm selection policies.
//!
//! Both policies are pure functions of the planner state they are handed.
//! Inactive arms never enter a scan, and every tie resolves to the lowest
//! arm index (first occurrence of the minimum or maximum in index order).

use crate::{ArmLifecycle, DecisionNote, QuotaLedger, RewardTable, SimulationClock};

/// First arm with the strictly smallest key.
fn first_argmin<I>(items: I) -> Option<usize>
where
    I: IntoIterator<Item = (usize, u64)>,
{
    let mut best: Option<(usize, u64)> = None;
    for (arm, key) in items {
        match best {
            Some((_, k)) if key >= k => {}
            _ => best = Some((arm, key)),
        }
    }
    best.map(|(arm, _)| arm)
}

/// First arm with the strictly largest key.
fn first_argmax<I>(items: I) -> Option<(usize, f64)>
where
    I: IntoIterator<Item = (usize, f64)>,
{
    let mut best: Option<(usize, f64)> = None;
    for (arm, key) in items {
        match best {
            Some((_, k)) if key <= k => {}
            _ => best = Some((arm, key)),
        }
    }
    best
}

/// Explore policy.
///
/// Among active arms still short of quota, pick the one this user has seen
/// least. When every active arm has met its quota, pick the least-seen active
/// arm overall. Returns `None` only when no arm is active.
pub fn select_explore(
    user: usize,
    quotas: &QuotaLedger,
    lifecycle: &ArmLifecycle,
    rewards: &RewardTable,
) -> Option<(usize, DecisionNote)> {
    let row = rewards.row(user);
    let candidates: Vec<usize> = quotas
        .unmet_arms()
        .filter(|&a| lifecycle.is_active(a))
        .collect();

    if candidates.is_empty() {
        let arm = first_argmin(
            (0..row.len())
                .filter(|&a| lifecycle.is_active(a))
                .map(|a| (a, row[a].count)),
        )?;
        return Some((arm, DecisionNote::QuotasMet));
    }

    let arm = first_argmin(candidates.iter().map(|&a| (a, row[a].count)))?;
    Some((arm, DecisionNote::QuotaPending { candidates }))
}

/// Exploit policy.
///
/// Default to the active arm with the highest reward estimate for this user.
/// Inside the rescue window, arms that are short of quota but can still reach
/// it within `rescue_horizon` uses take precedence: if the default is not one
/// of them, the best-estimated of them is chosen instead.
pub fn select_exploit(
    user: usize,
    clock: &SimulationClock,
    rescue_horizon: u64,
    quotas: &QuotaLedger,
    lifecycle: &ArmLifecycle,
    rewards: &RewardTable,
) -> Option<(usize, Vec<DecisionNote>)> {
    let row = rewards.row(user);
    let (default_arm, estimate) = first_argmax(
        (0..row.len())
            .filter(|&a| lifecycle.is_active(a))
            .map(|a| (a, row[a].mean)),
    )?;
    let mut notes = vec![DecisionNote::Greedy { estimate }];

    if !clock.in_rescue_window(rescue_horizon) {
        return Some((default_arm, notes));
    }

    let rescue_set: Vec<usize> = (0..row.len())
        .filter(|&a| lifecycle.is_active(a) && quotas.is_reachable(a, rescue_horizon))
        .collect();
    if rescue_set.is_empty() || rescue_set.contains(&default_arm) {
        return Some((default_arm, notes));
    }

    match first_argmax(rescue_set.iter().map(|&a| (a, row[a].mean))) {
        Some((arm, _)) => {
            notes.push(DecisionNote::RescueOverride {
                default_arm,
                rescue_set,
            });
            Some((arm, notes))
        }
        None => Some((default_arm, notes)),
    }
}
