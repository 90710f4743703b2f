//! Logical input identities and qualification semantics.
//!
//! Each logical input is statically described by a [`InputSpec`]: channel
//! arity (single or dual), qualification kind, logic polarity, debounce
//! window, and the optional activity bounds used by the qualifier and the
//! vigilance gates. The table below is the default wiring; individual
//! fields can be overridden from the configuration file.

use serde::{Deserialize, Serialize};

use crate::consts::{DEBOUNCE_NS, SKEW_GUARANTEED_NS, SKEW_NEVER_NS};

/// Identity of a logical input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum InputId {
    /// Vigilance push button (dual channel, rising-then-falling).
    VigilancePushButton = 0,
    /// Zero-speed digital input (dual channel, level).
    ZeroSpeed = 1,
    /// Horn low operation (dual channel, rising-then-falling).
    HornLow = 2,
    /// Horn high operation (dual channel, rising-then-falling).
    HornHigh = 3,
    /// Headlight switch (single channel, either edge).
    Headlight = 4,
    /// Wiper/washer control (single channel, either edge).
    WiperWasher = 5,
    /// Safety-system-bypass acknowledge (single channel, rising edge).
    SafetyBypassAck = 6,
    /// Cab active (dual channel, level).
    CabActive = 7,
    /// Maintenance (HCS) mode input (single channel, level).
    HcsMode = 8,
}

impl InputId {
    /// Number of logical inputs.
    pub const COUNT: usize = 9;

    /// All inputs, in index order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::VigilancePushButton,
        Self::ZeroSpeed,
        Self::HornLow,
        Self::HornHigh,
        Self::Headlight,
        Self::WiperWasher,
        Self::SafetyBypassAck,
        Self::CabActive,
        Self::HcsMode,
    ];

    /// Array index of this input.
    #[inline]
    pub const fn index(&self) -> usize {
        *self as usize
    }

    #[inline]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::VigilancePushButton),
            1 => Some(Self::ZeroSpeed),
            2 => Some(Self::HornLow),
            3 => Some(Self::HornHigh),
            4 => Some(Self::Headlight),
            5 => Some(Self::WiperWasher),
            6 => Some(Self::SafetyBypassAck),
            7 => Some(Self::CabActive),
            8 => Some(Self::HcsMode),
            _ => None,
        }
    }
}

/// Physical channel of a dual-channel input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Channel {
    Ch1 = 0,
    Ch2 = 1,
}

impl Channel {
    /// The other channel of the pair.
    #[inline]
    pub const fn other(&self) -> Self {
        match self {
            Self::Ch1 => Self::Ch2,
            Self::Ch2 => Self::Ch1,
        }
    }

    #[inline]
    pub const fn index(&self) -> usize {
        *self as usize
    }
}

/// Channel arity of a logical input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelArity {
    Single,
    Dual,
}

/// Logic polarity mapping raw sample to logical level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Polarity {
    ActiveHigh,
    ActiveLow,
}

impl Polarity {
    /// Map a raw sampled level to the logical level.
    #[inline]
    pub const fn logical(&self, raw: bool) -> bool {
        match self {
            Self::ActiveHigh => raw,
            Self::ActiveLow => !raw,
        }
    }
}

/// Edge/level semantics assigned to a logical input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualificationKind {
    /// One event per qualified rising transition.
    RisingOnly,
    /// One event per qualified falling transition.
    FallingOnly,
    /// One event per qualified transition in either direction.
    EitherEdge,
    /// One event per rising transition followed by a falling transition
    /// within the input's max-activity period; exceeding the period
    /// invalidates the pending event.
    RisingThenFalling,
    /// Output tracks the debounced level; no events.
    Level,
}

impl QualificationKind {
    /// Inputs whose compound event depends on both edge directions.
    #[inline]
    pub const fn is_compound(&self) -> bool {
        matches!(self, Self::RisingThenFalling)
    }
}

/// Static description of one logical input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InputSpec {
    pub arity: ChannelArity,
    pub kind: QualificationKind,
    pub polarity: Polarity,
    /// Debounce window [ns].
    pub debounce_ns: u64,
    /// For `RisingThenFalling`: maximum press-to-release span [ns].
    pub max_activity_ns: Option<u64>,
    /// Dual-channel skew always-qualify bound [ns].
    pub skew_guaranteed_ns: u64,
    /// Dual-channel skew never-qualify bound [ns].
    pub skew_never_ns: u64,
}

impl InputSpec {
    const fn dual(kind: QualificationKind, max_activity_ns: Option<u64>) -> Self {
        Self {
            arity: ChannelArity::Dual,
            kind,
            polarity: Polarity::ActiveHigh,
            debounce_ns: DEBOUNCE_NS,
            max_activity_ns,
            skew_guaranteed_ns: SKEW_GUARANTEED_NS,
            skew_never_ns: SKEW_NEVER_NS,
        }
    }

    const fn single(kind: QualificationKind) -> Self {
        Self {
            arity: ChannelArity::Single,
            kind,
            polarity: Polarity::ActiveHigh,
            debounce_ns: DEBOUNCE_NS,
            max_activity_ns: None,
            skew_guaranteed_ns: SKEW_GUARANTEED_NS,
            skew_never_ns: SKEW_NEVER_NS,
        }
    }
}

/// Default per-input wiring table.
///
/// Horn Low allows a 1.5 s press, Horn High 3 s; the VPB press itself is
/// bounded at 1.5 s (the 3 s TEST-entry hold is measured on the level,
/// not on the compound event).
pub fn default_spec(id: InputId) -> InputSpec {
    use QualificationKind::*;
    match id {
        InputId::VigilancePushButton => InputSpec::dual(RisingThenFalling, Some(1_500_000_000)),
        InputId::ZeroSpeed => InputSpec::dual(Level, None),
        InputId::HornLow => InputSpec::dual(RisingThenFalling, Some(1_500_000_000)),
        InputId::HornHigh => InputSpec::dual(RisingThenFalling, Some(3_000_000_000)),
        InputId::Headlight => InputSpec::single(EitherEdge),
        InputId::WiperWasher => InputSpec::single(EitherEdge),
        InputId::SafetyBypassAck => InputSpec::single(RisingOnly),
        InputId::CabActive => InputSpec::dual(Level, None),
        InputId::HcsMode => InputSpec::single(Level),
    }
}
