//! Task-linked-activity kinds and their per-kind limits.
//!
//! Every accepted TLA event resets the vigilance cycle, subject to two
//! independent gates configured here per kind: the max-consecutive-events
//! ceiling and the activity timeout.

use serde::{Deserialize, Serialize};

use crate::consts::{
    TLA_MAX_CONSEC_HORN, TLA_MAX_CONSEC_SINGLE, TLA_TIMEOUT_HEADLIGHT_S, TLA_TIMEOUT_HORN_S,
    TLA_TIMEOUT_WIPER_S,
};

/// Operator activity whose occurrence resets the vigilance timing cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum TlaKind {
    /// Master-controller demand movement of at least 12.5 % duty.
    McMovement = 0,
    HornLow = 1,
    HornHigh = 2,
    Headlight = 3,
    Wiper = 4,
    /// Safety-system-bypass acknowledge.
    SafetyBypass = 5,
}

impl TlaKind {
    /// Number of TLA kinds.
    pub const COUNT: usize = 6;

    /// All kinds, in index order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::McMovement,
        Self::HornLow,
        Self::HornHigh,
        Self::Headlight,
        Self::Wiper,
        Self::SafetyBypass,
    ];

    #[inline]
    pub const fn index(&self) -> usize {
        *self as usize
    }

    #[inline]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::McMovement),
            1 => Some(Self::HornLow),
            2 => Some(Self::HornHigh),
            3 => Some(Self::Headlight),
            4 => Some(Self::Wiper),
            5 => Some(Self::SafetyBypass),
            _ => None,
        }
    }

    /// Default ceiling on consecutive accepted events of this kind.
    pub const fn default_max_consecutive(&self) -> u8 {
        match self {
            Self::McMovement => TLA_MAX_CONSEC_HORN,
            Self::HornLow | Self::HornHigh => TLA_MAX_CONSEC_HORN,
            Self::Headlight | Self::Wiper | Self::SafetyBypass => TLA_MAX_CONSEC_SINGLE,
        }
    }

    /// Default activity timeout [s]. While non-zero, further events of
    /// this kind are ignored entirely. `None` disables the gate.
    pub const fn default_timeout_s(&self) -> Option<f64> {
        match self {
            Self::McMovement => None,
            Self::HornLow | Self::HornHigh | Self::SafetyBypass => Some(TLA_TIMEOUT_HORN_S),
            Self::Headlight => Some(TLA_TIMEOUT_HEADLIGHT_S),
            Self::Wiper => Some(TLA_TIMEOUT_WIPER_S),
        }
    }
}
