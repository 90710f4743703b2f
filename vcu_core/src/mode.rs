//! Operation-mode state machine.
//!
//! The mode register gates the whole vigilance system: timing runs only
//! in NORMAL, SUPPRESSED parks the system with the cab inactive,
//! DEPRESSED covers attended maintenance, TEST drives the directed
//! self-tests, and MFAULT latches on a confirmed major fault until full
//! reset. Other components read the mode committed by the previous
//! cycle, never the one being computed.

use vcu_common::mode::OperationMode;

/// Conditions sampled for one mode evaluation.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModeInputs {
    /// Confirmed major fault (penalty or lamp feedback).
    pub major_fault: bool,
    /// Qualified cab-active level.
    pub cab_active: bool,
    /// Maintenance (HCS) input level.
    pub hcs_maintenance: bool,
    /// Standstill confirmed by the speed interface.
    pub standstill: bool,
    /// Qualified vigilance push-button level.
    pub vpb_level: bool,
    /// Consecutive ticks the VPB level has been held.
    pub vpb_held_ticks: u64,
    /// A directed self-test is running.
    pub selftest_busy: bool,
}

/// Mode register and transition logic.
#[derive(Debug, Clone)]
pub struct ModeDecoder {
    mode: OperationMode,
    test_entry_hold_ticks: u64,
}

impl ModeDecoder {
    pub fn new(test_entry_hold_ticks: u64) -> Self {
        Self {
            mode: OperationMode::default(),
            test_entry_hold_ticks,
        }
    }

    /// Current mode (as committed by the last `step`).
    #[inline]
    pub const fn mode(&self) -> OperationMode {
        self.mode
    }

    /// Evaluate one tick's transition.
    pub fn step(&mut self, s: &ModeInputs) -> OperationMode {
        use OperationMode::*;

        let next = if s.major_fault {
            Mfault
        } else {
            match self.mode {
                Mfault => Mfault,
                Normal => {
                    if !s.cab_active {
                        Suppressed
                    } else if s.hcs_maintenance {
                        Depressed
                    } else {
                        Normal
                    }
                }
                Depressed => {
                    if !s.cab_active {
                        Suppressed
                    } else if !s.hcs_maintenance {
                        Normal
                    } else {
                        Depressed
                    }
                }
                Suppressed => {
                    if s.cab_active {
                        if s.hcs_maintenance { Depressed } else { Normal }
                    } else if s.standstill
                        && s.vpb_level
                        && s.vpb_held_ticks >= self.test_entry_hold_ticks
                    {
                        Test
                    } else {
                        Suppressed
                    }
                }
                Test => {
                    if s.cab_active {
                        Normal
                    } else if !s.standstill {
                        Suppressed
                    } else if !s.vpb_level && !s.selftest_busy {
                        Suppressed
                    } else {
                        Test
                    }
                }
            }
        };

        if next != self.mode {
            tracing::info!(from = ?self.mode, to = ?next, "operation mode transition");
            self.mode = next;
        }
        next
    }

    /// Full system reset, clearing a latched MFAULT.
    pub fn reset(&mut self) {
        self.mode = OperationMode::default();
    }
}
