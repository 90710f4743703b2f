//! Fault aggregation and external status reporting.
//!
//! Minor faults latch individual degradations while the unit stays in
//! service; a confirmed feedback mismatch on the penalty brake or the
//! warning lamp is a major fault and forces MFAULT. The diagnostic and
//! LED words are latched snapshots, refreshed once per poll period, so
//! the external interface sees a stable value between polls.

use vcu_common::counter::PersistenceCounter;
use vcu_common::fault::{DiagnosticCode, LedCode, MajorFault, MinorFault};
use vcu_common::mode::OperationMode;

use crate::pwm::McPowerStatus;

/// Per-tick conditions feeding the aggregates.
#[derive(Debug, Clone, Copy, Default)]
pub struct FaultConditions {
    /// Any digital input channel is permanently masked.
    pub digital_masked: bool,
    /// A directed self-test reported failure this tick.
    pub selftest_failed: bool,
    /// PWM channels permanently masked.
    pub pwm_masked_permanently: [bool; 2],
    /// Confirmed under/over/invalid speed fault.
    pub speed_range_fault: bool,
    /// Confirmed 25 km/h range contradiction.
    pub range25_fault: bool,
    /// Supply monitor healthy.
    pub power_ok: bool,
    /// Output commanded on the previous cycle vs. feedback now.
    pub penalty_commanded: bool,
    pub penalty_feedback: bool,
    pub lamp_commanded: bool,
    pub lamp_feedback: bool,
}

/// Latching fault aggregator with feedback supervision.
#[derive(Debug, Clone)]
pub struct FaultAggregator {
    minor: MinorFault,
    major: MajorFault,
    penalty_mismatch: PersistenceCounter,
    lamp_mismatch: PersistenceCounter,
}

impl FaultAggregator {
    pub fn new(feedback_persist_ticks: u32) -> Self {
        Self {
            minor: MinorFault::empty(),
            major: MajorFault::empty(),
            penalty_mismatch: PersistenceCounter::new(feedback_persist_ticks),
            lamp_mismatch: PersistenceCounter::new(feedback_persist_ticks),
        }
    }

    /// Fold one tick's conditions into the latched aggregates.
    pub fn step(&mut self, c: &FaultConditions) -> (MinorFault, MajorFault) {
        if c.digital_masked {
            self.minor.insert(MinorFault::DIGITAL_CHANNEL_MASKED);
        }
        if c.selftest_failed {
            self.minor.insert(MinorFault::SELFTEST_FAILED);
        }
        if c.pwm_masked_permanently[0] {
            self.minor.insert(MinorFault::PWM_CH1_MASKED);
        }
        if c.pwm_masked_permanently[1] {
            self.minor.insert(MinorFault::PWM_CH2_MASKED);
        }
        if c.speed_range_fault {
            self.minor.insert(MinorFault::SPEED_RANGE);
        }
        if c.range25_fault {
            self.minor.insert(MinorFault::RANGE_25KMH);
        }
        if !c.power_ok {
            self.minor.insert(MinorFault::POWER_SUPPLY);
        }

        if self
            .penalty_mismatch
            .step(c.penalty_commanded != c.penalty_feedback)
            && !self.major.contains(MajorFault::PENALTY_FEEDBACK)
        {
            tracing::error!("penalty brake feedback mismatch confirmed");
            self.major.insert(MajorFault::PENALTY_FEEDBACK);
        }
        if self
            .lamp_mismatch
            .step(c.lamp_commanded != c.lamp_feedback)
            && !self.major.contains(MajorFault::LAMP_FEEDBACK)
        {
            tracing::error!("warning lamp feedback mismatch confirmed");
            self.major.insert(MajorFault::LAMP_FEEDBACK);
        }

        (self.minor, self.major)
    }

    #[inline]
    pub const fn minor(&self) -> MinorFault {
        self.minor
    }

    #[inline]
    pub const fn major(&self) -> MajorFault {
        self.major
    }

    /// Full system reset, the only path that clears latched faults.
    pub fn reset(&mut self) {
        self.minor = MinorFault::empty();
        self.major = MajorFault::empty();
        self.penalty_mismatch.reset();
        self.lamp_mismatch.reset();
    }
}

/// Unit status sampled for one reporting refresh.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatusSnapshot {
    pub minor: MinorFault,
    pub major: MajorFault,
    pub mode: OperationMode,
    pub vpb_masked: bool,
    pub zero_speed_masked: bool,
    pub horn_masked: bool,
    pub pwm_status: McPowerStatus,
    pub speed_invalid: bool,
    pub range25: bool,
    pub first_warning: bool,
    pub second_warning: bool,
    pub penalty: bool,
    pub selftest_active: bool,
}

/// Poll-period latch for the diagnostic and LED words.
#[derive(Debug, Clone)]
pub struct DiagnosticReporter {
    poll_period_ticks: u64,
    ticks_until_refresh: u64,
    diagnostic: DiagnosticCode,
    led: LedCode,
}

impl DiagnosticReporter {
    pub fn new(poll_period_ticks: u64) -> Self {
        Self {
            poll_period_ticks,
            // First refresh on the first tick.
            ticks_until_refresh: 0,
            diagnostic: DiagnosticCode::empty(),
            led: LedCode::empty(),
        }
    }

    /// Advance one tick; refreshes the latched words when the poll
    /// period elapses and returns the latched values.
    pub fn step(&mut self, snap: &StatusSnapshot) -> (DiagnosticCode, LedCode) {
        if self.ticks_until_refresh == 0 {
            self.diagnostic = Self::encode_diagnostic(snap);
            self.led = Self::encode_led(snap);
            self.ticks_until_refresh = self.poll_period_ticks;
        }
        self.ticks_until_refresh -= 1;
        (self.diagnostic, self.led)
    }

    fn encode_diagnostic(snap: &StatusSnapshot) -> DiagnosticCode {
        let mut d = DiagnosticCode::empty();
        d.set(DiagnosticCode::MINOR_FAULT, !snap.minor.is_empty());
        d.set(DiagnosticCode::MAJOR_FAULT, !snap.major.is_empty());
        d.set(DiagnosticCode::VPB_MASKED, snap.vpb_masked);
        d.set(DiagnosticCode::ZERO_SPEED_MASKED, snap.zero_speed_masked);
        d.set(DiagnosticCode::HORN_MASKED, snap.horn_masked);
        d.set(
            DiagnosticCode::PWM_DEGRADED,
            snap.pwm_status == McPowerStatus::Degraded,
        );
        d.set(
            DiagnosticCode::PWM_NO_POWER,
            snap.pwm_status == McPowerStatus::NoPower,
        );
        d.set(DiagnosticCode::SPEED_INVALID, snap.speed_invalid);
        d.set(DiagnosticCode::RANGE_25KMH, snap.range25);
        d.set(DiagnosticCode::FIRST_WARNING, snap.first_warning);
        d.set(DiagnosticCode::SECOND_WARNING, snap.second_warning);
        d.set(DiagnosticCode::PENALTY_ACTIVE, snap.penalty);
        d.set(DiagnosticCode::SELFTEST_ACTIVE, snap.selftest_active);
        d
    }

    fn encode_led(snap: &StatusSnapshot) -> LedCode {
        let mut led = LedCode::empty();
        let red = !snap.major.is_empty() || snap.pwm_status == McPowerStatus::NoPower;
        let orange =
            !red && (!snap.minor.is_empty() || snap.pwm_status == McPowerStatus::Degraded);
        led.set(LedCode::RED, red);
        led.set(LedCode::ORANGE, orange);
        led.set(LedCode::GREEN, !red && !orange);
        led.set(LedCode::WARNING, snap.first_warning || snap.second_warning);
        led.set(LedCode::PENALTY, snap.penalty);
        led.set(LedCode::TEST, snap.mode == OperationMode::Test);
        led
    }

    pub fn reset(&mut self) {
        self.ticks_until_refresh = 0;
        self.diagnostic = DiagnosticCode::empty();
        self.led = LedCode::empty();
    }
}
