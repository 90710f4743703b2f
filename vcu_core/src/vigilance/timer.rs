//! Vigilance countdown timer.
//!
//! Counts down from the full cycle while timing is active. Two warning
//! stages fire at configured remaining-time thresholds; exhaustion is
//! the penalty condition. The timer itself holds no knowledge of what
//! may restart it.

/// Progression through one vigilance cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum VigilanceStage {
    /// Counting down, no warning yet.
    Counting = 0,
    /// First warning threshold crossed.
    FirstWarning = 1,
    /// Second warning threshold crossed.
    SecondWarning = 2,
    /// Cycle exhausted; penalty demanded.
    Penalty = 3,
}

/// Countdown register for the vigilance cycle.
#[derive(Debug, Clone)]
pub struct VigilanceTimer {
    cycle_ticks: u64,
    warning1_ticks: u64,
    warning2_ticks: u64,
    remaining: u64,
}

impl VigilanceTimer {
    pub fn new(cycle_ticks: u64, warning1_ticks: u64, warning2_ticks: u64) -> Self {
        Self {
            cycle_ticks,
            warning1_ticks,
            warning2_ticks,
            remaining: cycle_ticks,
        }
    }

    /// Count down one tick.
    #[inline]
    pub fn tick(&mut self) {
        self.remaining = self.remaining.saturating_sub(1);
    }

    /// Reload the full cycle.
    #[inline]
    pub fn restart(&mut self) {
        self.remaining = self.cycle_ticks;
    }

    /// Current stage from the remaining time.
    pub fn stage(&self) -> VigilanceStage {
        if self.remaining == 0 {
            VigilanceStage::Penalty
        } else if self.remaining <= self.warning2_ticks {
            VigilanceStage::SecondWarning
        } else if self.remaining <= self.warning1_ticks {
            VigilanceStage::FirstWarning
        } else {
            VigilanceStage::Counting
        }
    }

    /// Ticks left in the cycle.
    #[inline]
    pub const fn remaining(&self) -> u64 {
        self.remaining
    }
}
