//! Fault, diagnostic and LED code bitflags.
//!
//! All error state is encoded as data; lower layers never raise
//! exceptions. Minor faults keep the unit operational with masked
//! channels; any major fault forces the MFAULT operating mode.

use bitflags::bitflags;

bitflags! {
    /// Minor-fault aggregate: the unit stays in service with degraded
    /// supervision. All bits latch until full system reset.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct MinorFault: u16 {
        /// A digital input channel is permanently masked.
        const DIGITAL_CHANNEL_MASKED = 0x0001;
        /// Self-test failed on a dual-channel input.
        const SELFTEST_FAILED        = 0x0002;
        /// PWM channel 1 permanently masked.
        const PWM_CH1_MASKED         = 0x0004;
        /// PWM channel 2 permanently masked.
        const PWM_CH2_MASKED         = 0x0008;
        /// Analog speed persistent fault (under/over/invalid).
        const SPEED_RANGE            = 0x0010;
        /// Confirmed 25 km/h range fault.
        const RANGE_25KMH            = 0x0020;
        /// Power-supply status degraded.
        const POWER_SUPPLY           = 0x0040;
    }
}

impl Default for MinorFault {
    fn default() -> Self {
        Self::empty()
    }
}

bitflags! {
    /// Major-fault aggregate. Any bit forces `OperationMode::Mfault`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct MajorFault: u8 {
        /// Penalty-brake feedback disagrees with the commanded output.
        const PENALTY_FEEDBACK = 0x01;
        /// Warning-lamp feedback disagrees with the commanded output.
        const LAMP_FEEDBACK    = 0x02;
    }
}

impl Default for MajorFault {
    fn default() -> Self {
        Self::empty()
    }
}

bitflags! {
    /// Per-channel PWM fault pulses produced by the supervision pipeline
    /// within one tick. Not latched; the saturating counters carry the
    /// persistent state.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct PwmFault: u8 {
        /// Measured period outside the envelope.
        const CAPTURE_PERIOD   = 0x01;
        /// Cross-channel edge skew exceeded.
        const COMPARE_SKEW     = 0x02;
        /// Channel stopped transitioning while its partner continued.
        const COMPARE_STALLED  = 0x04;
        /// Cross-channel pulse-width mismatch (ambiguous reference).
        const COMPARE_WIDTH    = 0x08;
        /// Duty cycle outside the valid band.
        const DUTY_INVALID     = 0x10;
    }
}

impl Default for PwmFault {
    fn default() -> Self {
        Self::empty()
    }
}

bitflags! {
    /// Bit-mapped diagnostic word for the external reporting interface,
    /// latched every poll period.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct DiagnosticCode: u16 {
        const MINOR_FAULT       = 0x0001;
        const MAJOR_FAULT       = 0x0002;
        const VPB_MASKED        = 0x0004;
        const ZERO_SPEED_MASKED = 0x0008;
        const HORN_MASKED       = 0x0010;
        const PWM_DEGRADED      = 0x0020;
        const PWM_NO_POWER      = 0x0040;
        const SPEED_INVALID     = 0x0080;
        const RANGE_25KMH       = 0x0100;
        const FIRST_WARNING     = 0x0200;
        const SECOND_WARNING    = 0x0400;
        const PENALTY_ACTIVE    = 0x0800;
        const SELFTEST_ACTIVE   = 0x1000;
    }
}

impl Default for DiagnosticCode {
    fn default() -> Self {
        Self::empty()
    }
}

bitflags! {
    /// LED indication word, latched every poll period.
    ///
    /// `ORANGE` is the degraded single-PWM-channel indication; `RED`
    /// accompanies no-power and major faults.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct LedCode: u8 {
        const GREEN    = 0x01;
        const ORANGE   = 0x02;
        const RED      = 0x04;
        const WARNING  = 0x08;
        const PENALTY  = 0x10;
        const TEST     = 0x20;
    }
}

impl Default for LedCode {
    fn default() -> Self {
        Self::empty()
    }
}
