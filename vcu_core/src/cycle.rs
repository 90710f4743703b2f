//! Deterministic supervision cycle.
//!
//! [`VcuCore::tick`] runs one complete cycle: sample, qualify,
//! supervise, aggregate, commit. Cross-component reads are two-phase:
//! the vigilance machine and the fault conditions see the mode and the
//! commanded outputs committed by the *previous* cycle, and this tick's
//! results become visible only in the returned [`TickOutputs`] and the
//! next cycle.

use vcu_common::fault::{DiagnosticCode, LedCode, MajorFault, MinorFault};
use vcu_common::input::InputId;
use vcu_common::mode::OperationMode;
use vcu_common::tla::TlaKind;

use crate::config::LoadedConfig;
use crate::fault::{DiagnosticReporter, FaultAggregator, FaultConditions, StatusSnapshot};
use crate::input::MaskRegistry;
use crate::input::qualifier::{InputQualifier, QualifierOutput};
use crate::input::selftest::{SelfTestController, SelfTestFeedback, SelfTestRequest, SelfTestVerdict};
use crate::mode::{ModeDecoder, ModeInputs};
use crate::pwm::{McPowerStatus, PwmPipeline};
use crate::speed::{AnalogVector, SpeedDecoder};
use crate::vigilance::timer::VigilanceStage;
use crate::vigilance::{VigilanceEvents, VigilanceFsm};

/// Raw samples for one cycle. `Default` is the all-idle, healthy state.
#[derive(Debug, Clone, Copy)]
pub struct TickInputs {
    /// Raw digital channel levels, `[input][channel]`. Single-channel
    /// inputs use channel 0.
    pub digital: [[bool; 2]; InputId::COUNT],
    /// Raw PWM demand pair levels.
    pub pwm: [bool; 2],
    /// Analog comparator vector.
    pub analog: AnalogVector,
    /// Directed self-test request (runs immediately when idle, queued
    /// otherwise).
    pub selftest_request: Option<SelfTestRequest>,
    /// Self-test harness observation.
    pub selftest_feedback: SelfTestFeedback,
    /// Output read-back contacts.
    pub penalty_feedback: bool,
    pub lamp_feedback: bool,
    /// Supply monitor healthy.
    pub power_ok: bool,
    /// Full system reset strobe.
    pub reset: bool,
}

impl Default for TickInputs {
    fn default() -> Self {
        Self {
            digital: [[false; 2]; InputId::COUNT],
            pwm: [false; 2],
            analog: AnalogVector::empty(),
            selftest_request: None,
            selftest_feedback: SelfTestFeedback::default(),
            penalty_feedback: false,
            lamp_feedback: false,
            power_ok: true,
            reset: false,
        }
    }
}

/// Committed outputs of one cycle.
#[derive(Debug, Clone, Copy, Default)]
pub struct TickOutputs {
    pub mode: OperationMode,
    /// Vigilance stage; `None` while timing is held outside NORMAL.
    pub stage: Option<VigilanceStage>,
    pub first_warning: bool,
    pub second_warning: bool,
    /// Commanded safety outputs.
    pub penalty_brake: bool,
    pub warning_lamp: bool,
    pub mc_power: McPowerStatus,
    /// Decoded demand duty when a PWM cycle completed this tick.
    pub duty_pct: Option<f64>,
    pub speed_band: u8,
    pub standstill: bool,
    pub minor_fault: MinorFault,
    pub major_fault: MajorFault,
    pub diagnostic: DiagnosticCode,
    pub led: LedCode,
    /// Activity kinds that reset the vigilance timer this tick.
    pub accepted: [bool; TlaKind::COUNT],
    /// The push button reset the timer this tick.
    pub vpb_accepted: bool,
}

/// Running totals since power-on (survive full reset).
#[derive(Debug, Clone, Copy, Default)]
pub struct TickStats {
    pub ticks: u64,
    pub accepted_resets: u64,
    pub penalty_entries: u64,
    pub selftests_failed: u64,
}

/// The complete supervision core.
pub struct VcuCore {
    cfg: LoadedConfig,
    now: u64,
    qualifiers: [InputQualifier; InputId::COUNT],
    masks: MaskRegistry,
    selftest: SelfTestController,
    pwm: PwmPipeline,
    speed: SpeedDecoder,
    mode: ModeDecoder,
    vigilance: VigilanceFsm,
    faults: FaultAggregator,
    reporter: DiagnosticReporter,
    prev_penalty_cmd: bool,
    prev_lamp_cmd: bool,
    prev_penalty: bool,
    stats: TickStats,
}

impl VcuCore {
    pub fn new(cfg: LoadedConfig) -> Self {
        let qualifiers = InputId::ALL.map(|id| {
            let i = id.index();
            InputQualifier::new(
                cfg.specs[i],
                cfg.debounce_ticks[i],
                cfg.max_activity_ticks[i],
                cfg.skew_guaranteed_ticks,
                cfg.skew_never_ticks,
            )
        });
        Self {
            now: 0,
            qualifiers,
            masks: MaskRegistry::new(),
            selftest: SelfTestController::new(),
            pwm: PwmPipeline::new(&cfg.raw.pwm, cfg.tick_ns),
            speed: SpeedDecoder::new(cfg.speed_persist_ticks, cfg.range25_persist_ticks),
            mode: ModeDecoder::new(cfg.test_entry_hold_ticks),
            vigilance: VigilanceFsm::new(&cfg),
            faults: FaultAggregator::new(cfg.feedback_persist_ticks),
            reporter: DiagnosticReporter::new(cfg.poll_period_ticks),
            prev_penalty_cmd: false,
            prev_lamp_cmd: false,
            prev_penalty: false,
            stats: TickStats::default(),
            cfg,
        }
    }

    /// Loaded configuration in use.
    pub fn config(&self) -> &LoadedConfig {
        &self.cfg
    }

    /// Totals since power-on.
    pub fn stats(&self) -> TickStats {
        self.stats
    }

    /// Run one supervision cycle.
    pub fn tick(&mut self, inputs: &TickInputs) -> TickOutputs {
        if inputs.reset {
            self.full_reset();
        }
        self.stats.ticks += 1;
        let now = self.now;
        self.now += 1;

        // Registers committed by the previous cycle.
        let prev_mode = self.mode.mode();
        let prev_major = self.faults.major();

        // Self-test sequencing and directed masking.
        let verdict = self.selftest.step(
            inputs.selftest_request,
            inputs.selftest_feedback,
            &mut self.masks,
        );
        let busy = self.selftest.busy_input();
        let selftest_failed = matches!(verdict, Some(SelfTestVerdict::Failed(_)));
        if selftest_failed {
            self.stats.selftests_failed += 1;
        }

        // Qualification of every digital input.
        let mut qual = [QualifierOutput::default(); InputId::COUNT];
        for id in InputId::ALL {
            let i = id.index();
            qual[i] = self.qualifiers[i].step(
                now,
                inputs.digital[i],
                self.masks.masked(id),
                busy == Some(id),
            );
        }

        // Analog speed and PWM demand supervision.
        let speed = self.speed.step(inputs.analog);
        let pwm = self.pwm.step(now, inputs.pwm, inputs.power_ok);

        // Standstill needs both the analog interface and the qualified
        // zero-speed input to agree.
        let standstill = speed.standstill && qual[InputId::ZeroSpeed.index()].level;

        // Fault aggregation, using the outputs commanded last cycle.
        let (minor, major) = self.faults.step(&FaultConditions {
            digital_masked: self.masks.any_masked_at_all(),
            selftest_failed,
            pwm_masked_permanently: pwm.masked_permanently,
            speed_range_fault: speed.under_fault || speed.over_fault || speed.invalid_fault,
            range25_fault: speed.range25_fault,
            power_ok: inputs.power_ok,
            penalty_commanded: self.prev_penalty_cmd,
            penalty_feedback: inputs.penalty_feedback,
            lamp_commanded: self.prev_lamp_cmd,
            lamp_feedback: inputs.lamp_feedback,
        });

        // Vigilance timing runs against the previous cycle's mode.
        let vpb = &qual[InputId::VigilancePushButton.index()];
        let mut events = VigilanceEvents {
            vpb: vpb.event,
            vpb_level: vpb.level,
            horn_low_level: qual[InputId::HornLow.index()].level,
            horn_high_level: qual[InputId::HornHigh.index()].level,
            tla: [false; TlaKind::COUNT],
        };
        events.tla[TlaKind::McMovement.index()] = pwm.movement;
        events.tla[TlaKind::HornLow.index()] = qual[InputId::HornLow.index()].event;
        events.tla[TlaKind::HornHigh.index()] = qual[InputId::HornHigh.index()].event;
        events.tla[TlaKind::Headlight.index()] = qual[InputId::Headlight.index()].event;
        events.tla[TlaKind::Wiper.index()] = qual[InputId::WiperWasher.index()].event;
        events.tla[TlaKind::SafetyBypass.index()] = qual[InputId::SafetyBypassAck.index()].event;
        let vig = self.vigilance.step(prev_mode, &events);

        // Mode transition for the next cycle, committed into outputs.
        let mode = self.mode.step(&ModeInputs {
            major_fault: !(prev_major | major).is_empty(),
            cab_active: qual[InputId::CabActive.index()].level,
            hcs_maintenance: qual[InputId::HcsMode.index()].level,
            standstill,
            vpb_level: vpb.level,
            vpb_held_ticks: vpb.held_ticks,
            selftest_busy: busy.is_some(),
        });

        // Commanded safety outputs: fail toward the brake.
        let penalty_brake = vig.penalty || mode == OperationMode::Mfault;
        let warning_lamp = vig.first_warning || vig.second_warning;

        if vig.penalty && !self.prev_penalty {
            tracing::warn!(tick = now, "vigilance penalty engaged");
            self.stats.penalty_entries += 1;
        }
        self.prev_penalty = vig.penalty;
        if vig.vpb_accepted {
            self.stats.accepted_resets += 1;
        }
        for kind in TlaKind::ALL {
            if vig.accepted[kind.index()] {
                self.stats.accepted_resets += 1;
            }
        }

        let (diagnostic, led) = self.reporter.step(&StatusSnapshot {
            minor,
            major,
            mode,
            vpb_masked: self.masks.any_masked(InputId::VigilancePushButton),
            zero_speed_masked: self.masks.any_masked(InputId::ZeroSpeed),
            horn_masked: self.masks.any_masked(InputId::HornLow)
                || self.masks.any_masked(InputId::HornHigh),
            pwm_status: pwm.status,
            speed_invalid: speed.invalid_fault,
            range25: speed.range25_fault,
            first_warning: vig.first_warning,
            second_warning: vig.second_warning,
            penalty: vig.penalty,
            selftest_active: busy.is_some(),
        });

        // Commit for the next cycle.
        self.prev_penalty_cmd = penalty_brake;
        self.prev_lamp_cmd = warning_lamp;

        TickOutputs {
            mode,
            stage: vig.stage,
            first_warning: vig.first_warning,
            second_warning: vig.second_warning,
            penalty_brake,
            warning_lamp,
            mc_power: pwm.status,
            duty_pct: pwm.duty_pct,
            speed_band: speed.band,
            standstill,
            minor_fault: minor,
            major_fault: major,
            diagnostic,
            led,
            accepted: vig.accepted,
            vpb_accepted: vig.vpb_accepted,
        }
    }

    /// Full system reset: clears permanent masks, latched faults, a
    /// latched MFAULT, and all timing state. Statistics survive.
    pub fn full_reset(&mut self) {
        tracing::info!("full system reset");
        for q in &mut self.qualifiers {
            q.reset();
        }
        self.masks.reset();
        self.selftest.reset();
        self.pwm.reset();
        self.speed.reset();
        self.mode.reset();
        self.vigilance.reset();
        self.faults.reset();
        self.reporter.reset();
        self.prev_penalty_cmd = false;
        self.prev_lamp_cmd = false;
        self.prev_penalty = false;
    }
}
