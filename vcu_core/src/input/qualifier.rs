//! Per-input debounce and event qualification.
//!
//! Each logical input owns one [`DebouncedChannel`] per physical channel
//! and, for dual inputs, a [`DualCompare`]. The qualifier maps qualified
//! transitions to events according to the input's
//! [`QualificationKind`]: edge kinds emit one event per matching
//! transition, `RisingThenFalling` emits a single event for a complete
//! press-release pair inside the max-activity bound, and `Level` emits
//! no events at all.
//!
//! Any malformed activity (a dropped transition, an overlong hold) is
//! discarded without a substitute event.

use vcu_common::input::{ChannelArity, InputSpec, QualificationKind};

use super::EdgeKind;
use super::dual::{DualCompare, DualOutcome};

/// Counter debounce for one physical channel.
///
/// A candidate level must persist for the full debounce window before it
/// becomes the stable level; any reversal restarts the window.
#[derive(Debug, Clone, Default)]
pub struct DebouncedChannel {
    stable: bool,
    counter: u32,
    debounce_ticks: u32,
}

impl DebouncedChannel {
    pub fn new(debounce_ticks: u32) -> Self {
        Self {
            stable: false,
            counter: 0,
            debounce_ticks,
        }
    }

    /// Feed one logical sample; returns the transition that completed
    /// its debounce window this tick, if any.
    pub fn sample(&mut self, level: bool) -> Option<EdgeKind> {
        if level == self.stable {
            self.counter = 0;
            return None;
        }
        self.counter += 1;
        if self.counter < self.debounce_ticks {
            return None;
        }
        self.stable = level;
        self.counter = 0;
        Some(if level {
            EdgeKind::Rising
        } else {
            EdgeKind::Falling
        })
    }

    /// Current stable level.
    #[inline]
    pub const fn stable(&self) -> bool {
        self.stable
    }

    /// Restore power-on state (level low, window empty).
    pub fn reset(&mut self) {
        self.stable = false;
        self.counter = 0;
    }
}

/// Qualified output of one input for one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QualifierOutput {
    /// One qualified event completed this tick.
    pub event: bool,
    /// Debounced logical level (AND of both channels for dual inputs).
    pub level: bool,
    /// Consecutive ticks the level has been held active.
    pub held_ticks: u64,
}

/// Full qualification pipeline for one logical input.
#[derive(Debug, Clone)]
pub struct InputQualifier {
    spec: InputSpec,
    channels: [DebouncedChannel; 2],
    compare: DualCompare,
    max_activity_ticks: Option<u64>,
    /// Tick of the qualified rising edge awaiting its falling partner.
    pending_rise: Option<u64>,
    held_ticks: u64,
}

impl InputQualifier {
    pub fn new(
        spec: InputSpec,
        debounce_ticks: u32,
        max_activity_ticks: Option<u64>,
        skew_guaranteed_ticks: u64,
        skew_never_ticks: u64,
    ) -> Self {
        Self {
            spec,
            channels: [
                DebouncedChannel::new(debounce_ticks),
                DebouncedChannel::new(debounce_ticks),
            ],
            compare: DualCompare::new(skew_guaranteed_ticks, skew_never_ticks),
            max_activity_ticks,
            pending_rise: None,
            held_ticks: 0,
        }
    }

    /// Process one tick of raw channel samples.
    ///
    /// `masked` suppresses a permanently masked channel, `suppress`
    /// discards events while a directed self-test drives this input.
    pub fn step(
        &mut self,
        now: u64,
        raw: [bool; 2],
        masked: [bool; 2],
        suppress: bool,
    ) -> QualifierOutput {
        // Overlong press invalidates the pending compound event even
        // before the falling edge arrives.
        if let (Some(rise), Some(max)) = (self.pending_rise, self.max_activity_ticks) {
            if now.saturating_sub(rise) > max {
                self.pending_rise = None;
            }
        }

        let mut edges = [None, None];
        for ch in 0..self.active_channels() {
            if masked[ch] {
                continue;
            }
            edges[ch] = self.channels[ch].sample(self.spec.polarity.logical(raw[ch]));
        }

        let outcome = match self.spec.arity {
            ChannelArity::Dual => self.compare.step(now, edges),
            ChannelArity::Single => match edges[0] {
                Some(kind) => DualOutcome::Qualified(kind),
                None => DualOutcome::None,
            },
        };

        let level = self.level(masked);
        if level {
            self.held_ticks += 1;
        } else {
            self.held_ticks = 0;
        }

        if suppress {
            // Test stimulus must not surface as operator activity, and
            // must not accumulate into the hold measurement either.
            self.pending_rise = None;
            self.held_ticks = 0;
            self.compare.reset();
            return QualifierOutput {
                event: false,
                level: false,
                held_ticks: 0,
            };
        }

        let event = match outcome {
            DualOutcome::None => false,
            DualOutcome::Qualified(kind) => self.accept(now, kind),
            DualOutcome::Dropped(_) => {
                // A malformed transition poisons the compound sequence.
                self.pending_rise = None;
                false
            }
        };

        QualifierOutput {
            event,
            level,
            held_ticks: self.held_ticks,
        }
    }

    fn accept(&mut self, now: u64, kind: EdgeKind) -> bool {
        match (self.spec.kind, kind) {
            (QualificationKind::RisingOnly, EdgeKind::Rising) => true,
            (QualificationKind::RisingOnly, EdgeKind::Falling) => false,
            (QualificationKind::FallingOnly, EdgeKind::Falling) => true,
            (QualificationKind::FallingOnly, EdgeKind::Rising) => false,
            (QualificationKind::EitherEdge, _) => true,
            (QualificationKind::RisingThenFalling, EdgeKind::Rising) => {
                self.pending_rise = Some(now);
                false
            }
            (QualificationKind::RisingThenFalling, EdgeKind::Falling) => {
                match self.pending_rise.take() {
                    Some(rise) => match self.max_activity_ticks {
                        Some(max) => now.saturating_sub(rise) <= max,
                        None => true,
                    },
                    // Falling without a qualified rise: stale or dropped
                    // press, no event.
                    None => false,
                }
            }
            (QualificationKind::Level, _) => false,
        }
    }

    fn level(&self, masked: [bool; 2]) -> bool {
        match self.spec.arity {
            ChannelArity::Single => !masked[0] && self.channels[0].stable(),
            ChannelArity::Dual => {
                !masked[0]
                    && !masked[1]
                    && self.channels[0].stable()
                    && self.channels[1].stable()
            }
        }
    }

    const fn active_channels(&self) -> usize {
        match self.spec.arity {
            ChannelArity::Single => 1,
            ChannelArity::Dual => 2,
        }
    }

    /// Power-on state.
    pub fn reset(&mut self) {
        self.channels[0].reset();
        self.channels[1].reset();
        self.compare.reset();
        self.pending_rise = None;
        self.held_ticks = 0;
    }
}
