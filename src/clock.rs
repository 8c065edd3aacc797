//! Phase clock: round-within-phase, phase number, and the explore/exploit mode.
//!
//! The clock is a plain value. Policy functions receive it by reference and
//! never read phase state from anywhere else.

/// Selection mode, keyed on the phase number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Mode {
    /// Quota-driven exploration.
    Explore,
    /// Reward-greedy selection with an end-of-phase rescue window.
    Exploit,
}

/// Result of advancing the clock by one round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseTick {
    /// Still inside the same phase.
    Within,
    /// The round closed phase `closed`; the clock now sits at round 0 of `closed + 1`.
    Boundary { closed: u64 },
}

/// Round/phase counters for one planner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimulationClock {
    phase_len: u64,
    phase_num: u64,
    round_in_phase: u64,
}

impl SimulationClock {
    /// Start at round 0 of phase 0. `phase_len` is clamped to at least 1.
    pub fn new(phase_len: usize) -> Self {
        Self {
            phase_len: (phase_len as u64).max(1),
            phase_num: 0,
            round_in_phase: 0,
        }
    }

    pub fn phase_len(&self) -> u64 {
        self.phase_len
    }

    pub fn phase_num(&self) -> u64 {
        self.phase_num
    }

    /// Rounds already completed in the current phase, in `[0, phase_len)`.
    pub fn round_in_phase(&self) -> u64 {
        self.round_in_phase
    }

    /// Explore while `phase_num <= last_explore_phase`, exploit afterwards.
    pub fn mode(&self, last_explore_phase: u64) -> Mode {
        if self.phase_num <= last_explore_phase {
            Mode::Explore
        } else {
            Mode::Exploit
        }
    }

    /// Whether the current round falls in the end-of-phase rescue window.
    ///
    /// The window opens once `round_in_phase >= horizon`, i.e. when at most
    /// `phase_len - horizon` rounds remain.
    pub fn in_rescue_window(&self, horizon: u64) -> bool {
        self.round_in_phase >= horizon
    }

    /// Count one completed round, rolling into the next phase when full.
    pub fn tick(&mut self) -> PhaseTick {
        self.round_in_phase += 1;
        if self.round_in_phase < self.phase_len {
            return PhaseTick::Within;
        }
        let closed = self.phase_num;
        self.round_in_phase = 0;
        self.phase_num += 1;
        PhaseTick::Boundary { closed }
    }
}
