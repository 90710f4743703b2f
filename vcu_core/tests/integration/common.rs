//! Shared harness for end-to-end core tests.
//!
//! Uses a coarse 1 ms tick and shortened windows so complete vigilance
//! cycles run in a few thousand ticks. The ratios between windows match
//! the production defaults.

use vcu_common::config::VcuConfig;
use vcu_common::input::InputId;
use vcu_common::mode::OperationMode;
use vcu_common::tla::TlaKind;

use vcu_core::config::LoadedConfig;
use vcu_core::cycle::{TickInputs, TickOutputs, VcuCore};

/// Test tick: 1 ms.
pub const TICK_NS: u64 = 1_000_000;
/// Debounce: 2 ticks.
pub const DEBOUNCE_TICKS: u64 = 2;
/// Vigilance cycle: 2000 ticks, warnings at 500/250 remaining.
pub const CYCLE_TICKS: u64 = 2_000;

/// Shortened configuration for end-to-end tests.
pub fn fast_config() -> LoadedConfig {
    let mut raw = VcuConfig::default();
    raw.timing.tick_ns = TICK_NS;
    raw.timing.debounce_ns = DEBOUNCE_TICKS * TICK_NS;
    // Dual-channel skew: qualify within 2 ticks, never beyond 4.
    raw.timing.skew_guaranteed_ns = 2 * TICK_NS;
    raw.timing.skew_never_ns = 4 * TICK_NS;
    raw.vigilance.cycle_s = 2.0;
    raw.vigilance.warning1_s = 0.5;
    raw.vigilance.warning2_s = 0.25;
    raw.vigilance.test_entry_hold_s = 0.05;
    raw.speed.fault_persist_s = 0.005;
    raw.speed.range25_persist_s = 0.01;
    raw.diagnostics.poll_period_ms = 5;
    raw.diagnostics.feedback_persist_s = 0.004;
    // Shortened activity timeouts, same ordering as the defaults.
    let short = |timeout_s| {
        Some(vcu_common::config::TlaOverride {
            max_consecutive: None,
            timeout_s: Some(timeout_s),
        })
    };
    raw.tla.horn_low = short(0.1);
    raw.tla.horn_high = short(0.1);
    raw.tla.headlight = short(0.05);
    raw.tla.wiper = short(0.1);
    raw.tla.safety_bypass = short(0.1);
    LoadedConfig::from_config(raw).expect("test config must validate")
}

/// Core plus the persistent stimulus it is driven with.
pub struct Harness {
    pub core: VcuCore,
    pub inputs: TickInputs,
    /// Echo commanded outputs back as feedback (a healthy plant).
    /// Disable to inject feedback faults by hand.
    pub faithful_feedback: bool,
}

/// Everything observed over a run of ticks.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunObservation {
    pub last: TickOutputs,
    pub accepted: [bool; TlaKind::COUNT],
    pub vpb_accepted: bool,
    pub penalty_seen: bool,
}

impl Harness {
    pub fn new() -> Self {
        Self {
            core: VcuCore::new(fast_config()),
            inputs: TickInputs::default(),
            faithful_feedback: true,
        }
    }

    /// Set both channels of an input to one raw level.
    pub fn set_level(&mut self, id: InputId, level: bool) {
        self.inputs.digital[id.index()] = [level, level];
    }

    /// Run `n` ticks with the current stimulus, collecting accepted
    /// resets along the way.
    pub fn run(&mut self, n: u64) -> RunObservation {
        let mut obs = RunObservation::default();
        for _ in 0..n {
            let out = self.core.tick(&self.inputs);
            if self.faithful_feedback {
                self.inputs.penalty_feedback = out.penalty_brake;
                self.inputs.lamp_feedback = out.warning_lamp;
            }
            for k in 0..TlaKind::COUNT {
                obs.accepted[k] |= out.accepted[k];
            }
            obs.vpb_accepted |= out.vpb_accepted;
            obs.penalty_seen |= out.penalty_brake;
            obs.last = out;
        }
        obs
    }

    /// One clean press-release of an input, including settle margins.
    pub fn press(&mut self, id: InputId) -> RunObservation {
        self.set_level(id, true);
        let mut obs = self.run(DEBOUNCE_TICKS + 2);
        self.set_level(id, false);
        let release = self.run(DEBOUNCE_TICKS + 2);
        for k in 0..TlaKind::COUNT {
            obs.accepted[k] |= release.accepted[k];
        }
        obs.vpb_accepted |= release.vpb_accepted;
        obs.penalty_seen |= release.penalty_seen;
        obs.last = release.last;
        obs
    }

    /// Occupy the cab and settle into NORMAL mode.
    pub fn enter_normal(&mut self) {
        self.set_level(InputId::CabActive, true);
        let obs = self.run(DEBOUNCE_TICKS + 4);
        assert_eq!(obs.last.mode, OperationMode::Normal);
    }

    /// Confirm standstill: valid zero analog band plus the qualified
    /// zero-speed input.
    pub fn hold_standstill(&mut self) {
        self.set_level(InputId::ZeroSpeed, true);
        let obs = self.run(DEBOUNCE_TICKS + 4);
        assert!(obs.last.standstill);
    }
}
