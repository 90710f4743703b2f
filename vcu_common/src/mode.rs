//! Operation mode of the vigilance control unit.
//!
//! `#[repr(u8)]` for compact layout and one-hot export to the diagnostic
//! interface. The mode register has exactly one writer (the mode decoder)
//! and many readers.

use serde::{Deserialize, Serialize};

/// Current operating mode.
///
/// `Mfault` takes priority over all other mode computation and is latched
/// until full system reset. `Test` is reachable only from `Suppressed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum OperationMode {
    /// Cab active, vigilance timing running.
    Normal = 0,
    /// Cab inactive, vigilance suppressed.
    Suppressed = 1,
    /// Maintenance (HCS) input asserted with cab active, timing suspended.
    Depressed = 2,
    /// Self-test mode, entered from Suppressed only.
    Test = 3,
    /// Major fault, overrides everything until full reset.
    Mfault = 4,
}

impl OperationMode {
    /// Convert from raw `u8`. Returns `None` for invalid values.
    #[inline]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Normal),
            1 => Some(Self::Suppressed),
            2 => Some(Self::Depressed),
            3 => Some(Self::Test),
            4 => Some(Self::Mfault),
            _ => None,
        }
    }

    /// One-hot bit for the diagnostic/LED interface.
    #[inline]
    pub const fn one_hot(&self) -> u8 {
        1 << (*self as u8)
    }

    /// Vigilance timing runs only in Normal.
    #[inline]
    pub const fn timing_active(&self) -> bool {
        matches!(self, Self::Normal)
    }
}

impl Default for OperationMode {
    fn default() -> Self {
        Self::Suppressed
    }
}

static_assertions::assert_eq_size!(OperationMode, u8);
