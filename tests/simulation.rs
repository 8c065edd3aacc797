//! End-to-end runs against a seeded stochastic harness.
//!
//! The harness owns everything the planner does not: it samples users from
//! `users_distribution` and draws Bernoulli rewards from a per-(user, arm)
//! success matrix.

use quotaplan::{DecisionNote, Mode, Planner, PlannerConfig, PhaseReport};
use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

struct Harness {
    rng: StdRng,
    users: WeightedIndex<f64>,
    success: Vec<Vec<f64>>,
}

impl Harness {
    fn new(seed: u64, cfg: &PlannerConfig, success: Vec<Vec<f64>>) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            users: WeightedIndex::new(cfg.users_distribution.iter().copied()).unwrap(),
            success,
        }
    }

    fn sample_user(&mut self) -> usize {
        self.users.sample(&mut self.rng)
    }

    fn reward(&mut self, user: usize, arm: usize) -> f64 {
        if self.rng.gen_bool(self.success[user][arm]) {
            1.0
        } else {
            0.0
        }
    }
}

#[derive(Default)]
struct RunStats {
    reports: Vec<PhaseReport>,
    exploit_rounds: u64,
    exploit_best: u64,
    rescues: u64,
}

fn run(planner: &mut Planner, harness: &mut Harness) -> RunStats {
    let mut stats = RunStats::default();
    for _ in 0..planner.config().num_rounds {
        let user = harness.sample_user();
        let d = planner.choose_arm_explain(user).unwrap();
        if d.mode == Mode::Exploit {
            stats.exploit_rounds += 1;
            let row = &harness.success[user];
            let best = planner
                .active_arms()
                .into_iter()
                .max_by(|&a, &b| row[a].total_cmp(&row[b]))
                .unwrap();
            if d.chosen == best {
                stats.exploit_best += 1;
            }
            if d
                .notes
                .iter()
                .any(|n| matches!(n, DecisionNote::RescueOverride { .. }))
            {
                stats.rescues += 1;
            }
        }
        let reward = harness.reward(user, d.chosen);
        if let Some(r) = planner.notify_outcome(reward).unwrap() {
            stats.reports.push(r);
        }
    }
    stats
}

#[test]
fn learns_per_user_best_arm_and_prunes_weakest() {
    let cfg = PlannerConfig::new(3, 2, 20)
        .with_thresholds(vec![2, 2, 2])
        .with_users_distribution(vec![0.5, 0.5])
        .with_rounds(600);
    let success = vec![vec![0.9, 0.2, 0.1], vec![0.1, 0.8, 0.2]];
    let mut harness = Harness::new(7, &cfg, success);
    let mut planner = Planner::new(cfg).unwrap();

    let stats = run(&mut planner, &mut harness);

    assert_eq!(planner.rounds_observed(), 600);
    assert_eq!(stats.reports.len(), 30);
    for r in &stats.reports {
        assert_eq!(r.rounds(), 20);
    }

    // Arm 2 is the weakest for both users and is the one pruned.
    assert!(planner.pruned());
    assert_eq!(planner.active_arms(), vec![0, 1]);
    let pruned: Vec<usize> = stats.reports.iter().flat_map(|r| r.pruned.clone()).collect();
    assert_eq!(pruned, vec![2]);

    let rewards = planner.rewards();
    assert!(rewards.mean(0, 0) > rewards.mean(0, 1));
    assert!(rewards.mean(1, 1) > rewards.mean(1, 0));

    assert!(stats.exploit_rounds > 0);
    let hit_rate = stats.exploit_best as f64 / stats.exploit_rounds as f64;
    assert!(hit_rate > 0.8, "hit_rate={hit_rate}");
}

#[test]
fn skewed_population_still_keeps_quotas() {
    // User 1 is rare, so arm 1 (user 1's favourite) depends on quotas to survive.
    let cfg = PlannerConfig::new(2, 2, 10)
        .with_thresholds(vec![2, 2])
        .with_users_distribution(vec![0.95, 0.05])
        .with_rounds(400);
    let success = vec![vec![0.7, 0.3], vec![0.2, 0.9]];
    let mut harness = Harness::new(11, &cfg, success);
    let mut planner = Planner::new(cfg).unwrap();

    let stats = run(&mut planner, &mut harness);

    assert!(!planner.pruned());
    assert_eq!(planner.active_arms(), vec![0, 1]);
    for r in &stats.reports {
        assert!(r.retired.is_empty(), "phase {} retired {:?}", r.phase_num, r.retired);
        assert!(r.used[1] >= 2, "phase {} used {:?}", r.phase_num, r.used);
    }
    assert!(stats.rescues > 0);
}

#[test]
fn same_seed_same_trajectory() {
    let cfg = PlannerConfig::new(4, 3, 8)
        .with_thresholds(vec![1, 2, 0, 1])
        .with_users_distribution(vec![0.2, 0.5, 0.3])
        .with_rounds(300);
    let success = vec![
        vec![0.5, 0.1, 0.4, 0.3],
        vec![0.2, 0.6, 0.1, 0.5],
        vec![0.3, 0.3, 0.9, 0.1],
    ];

    let trajectory = |seed: u64| {
        let mut h = Harness::new(seed, &cfg, success.clone());
        let mut p = Planner::new(cfg.clone()).unwrap();
        (0..cfg.num_rounds)
            .map(|_| {
                let u = h.sample_user();
                let arm = p.choose_arm(u).unwrap();
                let r = h.reward(u, arm);
                p.notify_outcome(r).unwrap();
                arm
            })
            .collect::<Vec<_>>()
    };
    assert_eq!(trajectory(3), trajectory(3));
}
