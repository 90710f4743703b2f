//! Vigilance timing state machine.
//!
//! Combines the countdown timer with the per-kind activity gates. The
//! vigilance push button is the primary acknowledgment and always
//! resets the timer; every other activity must pass its gate first. A
//! timer reset by one kind breaks every other kind's consecutive run.
//! While the push button or either horn is held, every activity event
//! is ignored outright; a lever's own release still counts because its
//! level has dropped by the tick its event completes.
//!
//! Timing runs only in NORMAL mode; in every other mode the timer is
//! held reloaded. Entering SUPPRESSED additionally clears all
//! consecutive-run counters.

pub mod timer;
pub mod tla;

use vcu_common::mode::OperationMode;
use vcu_common::tla::TlaKind;

use crate::config::LoadedConfig;

use timer::{VigilanceStage, VigilanceTimer};
use tla::{TlaDecision, TlaGate};

/// Qualified activity for one tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct VigilanceEvents {
    /// Vigilance push-button event (complete press-release).
    pub vpb: bool,
    /// Push-button level currently held.
    pub vpb_level: bool,
    /// Horn levers currently held.
    pub horn_low_level: bool,
    pub horn_high_level: bool,
    /// Qualified task-linked activity events, by kind index.
    pub tla: [bool; TlaKind::COUNT],
}

/// Timing verdict for one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VigilanceOutput {
    pub stage: Option<VigilanceStage>,
    /// First/second warning indications (second implies first).
    pub first_warning: bool,
    pub second_warning: bool,
    /// Cycle exhausted; penalty demanded.
    pub penalty: bool,
    /// The push button reset the timer this tick.
    pub vpb_accepted: bool,
    /// Activity kinds whose reset was accepted this tick.
    pub accepted: [bool; TlaKind::COUNT],
}

/// Timer plus gates, stepped once per tick.
#[derive(Debug, Clone)]
pub struct VigilanceFsm {
    timer: VigilanceTimer,
    gates: [TlaGate; TlaKind::COUNT],
    prev_mode: OperationMode,
}

impl VigilanceFsm {
    pub fn new(cfg: &LoadedConfig) -> Self {
        let gates = TlaKind::ALL.map(|kind| {
            TlaGate::new(
                cfg.tla_max_consecutive[kind.index()],
                cfg.tla_timeout_ticks[kind.index()],
            )
        });
        Self {
            timer: VigilanceTimer::new(
                cfg.vigilance_cycle_ticks,
                cfg.warning1_ticks,
                cfg.warning2_ticks,
            ),
            gates,
            prev_mode: OperationMode::default(),
        }
    }

    /// Advance one tick in the given (previous-cycle) mode.
    pub fn step(&mut self, mode: OperationMode, events: &VigilanceEvents) -> VigilanceOutput {
        // Activity timeouts run in every mode.
        for g in &mut self.gates {
            g.tick();
        }

        if !mode.timing_active() {
            self.timer.restart();
            if mode == OperationMode::Suppressed && self.prev_mode != OperationMode::Suppressed {
                for g in &mut self.gates {
                    g.clear_consecutive();
                }
            }
            self.prev_mode = mode;
            return VigilanceOutput::default();
        }
        self.prev_mode = mode;

        let blocked = events.vpb_level || events.horn_low_level || events.horn_high_level;
        let mut out = VigilanceOutput::default();

        if events.vpb {
            // Primary acknowledgment: unconditional, breaks every run.
            self.timer.restart();
            for g in &mut self.gates {
                g.clear_consecutive();
            }
            out.vpb_accepted = true;
        }

        for kind in TlaKind::ALL {
            if !events.tla[kind.index()] {
                continue;
            }
            if blocked {
                // Held priority input: activity is discarded, not
                // queued and not counted against any gate.
                continue;
            }
            match self.gates[kind.index()].offer() {
                TlaDecision::Accepted => {
                    self.timer.restart();
                    for other in TlaKind::ALL {
                        if other != kind {
                            self.gates[other.index()].clear_consecutive();
                        }
                    }
                    out.accepted[kind.index()] = true;
                }
                TlaDecision::IgnoredTimeout | TlaDecision::IgnoredLimit => {
                    tracing::trace!(?kind, "activity reset ignored");
                }
            }
        }

        self.timer.tick();
        let stage = self.timer.stage();
        out.stage = Some(stage);
        out.first_warning = stage >= VigilanceStage::FirstWarning;
        out.second_warning = stage >= VigilanceStage::SecondWarning;
        out.penalty = stage == VigilanceStage::Penalty;
        out
    }

    /// Ticks left in the current cycle.
    pub fn remaining(&self) -> u64 {
        self.timer.remaining()
    }

    pub fn reset(&mut self) {
        self.timer.restart();
        for g in &mut self.gates {
            g.reset();
        }
        self.prev_mode = OperationMode::default();
    }
}
