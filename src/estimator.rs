//! Per-(user, arm) running reward averages.
//!
//! Counts are lifetime counts: they are never reset at phase boundaries.

/// Running mean and observation count for one (user, arm) pair.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RewardCell {
    pub mean: f64,
    pub count: u64,
}

impl RewardCell {
    /// Total reward mass behind the mean (`mean * count`).
    pub fn mass(&self) -> f64 {
        self.mean * self.count as f64
    }

    /// Fold one observation into the mean:
    /// `mean_n = ((n-1)/n) * mean_{n-1} + (1/n) * reward`.
    ///
    /// The count is bumped before dividing. Greedy tie-breaks depend on the
    /// exact bits of this expression; do not rearrange it.
    fn observe(&mut self, reward: f64) {
        self.count = self.count.saturating_add(1);
        let n = self.count as f64;
        self.mean = ((n - 1.0) / n) * self.mean + (1.0 / n) * reward;
    }
}

/// Reward estimates for every (user, arm) pair, stored row-major by user.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RewardTable {
    num_users: usize,
    num_arms: usize,
    cells: Vec<RewardCell>,
}

impl RewardTable {
    pub fn new(num_users: usize, num_arms: usize) -> Self {
        Self {
            num_users,
            num_arms,
            cells: vec![RewardCell::default(); num_users * num_arms],
        }
    }

    pub fn num_users(&self) -> usize {
        self.num_users
    }

    pub fn num_arms(&self) -> usize {
        self.num_arms
    }

    pub fn cell(&self, user: usize, arm: usize) -> RewardCell {
        self.cells[user * self.num_arms + arm]
    }

    pub fn mean(&self, user: usize, arm: usize) -> f64 {
        self.cell(user, arm).mean
    }

    pub fn count(&self, user: usize, arm: usize) -> u64 {
        self.cell(user, arm).count
    }

    /// All arm estimates for one user, indexed by arm.
    pub fn row(&self, user: usize) -> &[RewardCell] {
        let start = user * self.num_arms;
        &self.cells[start..start + self.num_arms]
    }

    /// Record `reward` for the pair and return the updated cell.
    pub fn update(&mut self, user: usize, arm: usize, reward: f64) -> RewardCell {
        let cell = &mut self.cells[user * self.num_arms + arm];
        cell.observe(reward);
        *cell
    }

    /// Cumulative reward earned by `arm` across all users.
    pub fn mass(&self, arm: usize) -> f64 {
        (0..self.num_users).map(|u| self.cell(u, arm).mass()).sum()
    }
}
