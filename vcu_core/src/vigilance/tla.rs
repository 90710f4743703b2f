//! Task-linked activity gates.
//!
//! Secondary activity (horns, headlight, wiper, bypass acknowledge,
//! demand movement) may reset the vigilance timer only through a gate:
//! a ceiling on consecutive resets by the same activity kind and an
//! activity timeout that ignores repeats arriving too soon. An ignored
//! event has no effect at all; in particular it does not restart the
//! gate's own timeout.

/// Verdict on one offered activity event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TlaDecision {
    /// Event may reset the vigilance timer.
    Accepted,
    /// Repeat within the activity timeout.
    IgnoredTimeout,
    /// Consecutive-reset ceiling reached.
    IgnoredLimit,
}

/// Gate state for one activity kind.
#[derive(Debug, Clone)]
pub struct TlaGate {
    max_consecutive: u8,
    consecutive: u8,
    /// Timeout reload value [ticks]; 0 disables the timeout gate.
    timeout_reload_ticks: u64,
    timeout_remaining: u64,
}

impl TlaGate {
    pub fn new(max_consecutive: u8, timeout_ticks: u64) -> Self {
        Self {
            max_consecutive,
            consecutive: 0,
            timeout_reload_ticks: timeout_ticks,
            timeout_remaining: 0,
        }
    }

    /// Advance the activity timeout one tick.
    #[inline]
    pub fn tick(&mut self) {
        self.timeout_remaining = self.timeout_remaining.saturating_sub(1);
    }

    /// Offer one qualified event of this kind.
    pub fn offer(&mut self) -> TlaDecision {
        if self.timeout_remaining > 0 {
            return TlaDecision::IgnoredTimeout;
        }
        if self.consecutive >= self.max_consecutive {
            return TlaDecision::IgnoredLimit;
        }
        self.consecutive += 1;
        self.timeout_remaining = self.timeout_reload_ticks;
        TlaDecision::Accepted
    }

    /// Another kind reset the timer: this kind's run is broken.
    #[inline]
    pub fn clear_consecutive(&mut self) {
        self.consecutive = 0;
    }

    /// Consecutive resets currently accumulated.
    #[inline]
    pub const fn consecutive(&self) -> u8 {
        self.consecutive
    }

    pub fn reset(&mut self) {
        self.consecutive = 0;
        self.timeout_remaining = 0;
    }
}
