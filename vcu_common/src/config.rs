//! Configuration structures for the VCU core.
//!
//! All config types use `serde::Deserialize` for TOML loading. Every
//! field carries a default matching the observed hardware constants, so
//! an empty file is a valid configuration. `validate()` checks bounds
//! and threshold ordering before the core is constructed.

use serde::{Deserialize, Serialize};

use crate::consts::{
    DEBOUNCE_NS, DEFAULT_TICK_NS, DUTY_MAX_PCT, DUTY_MIN_PCT, DUTY_TOL_PCT, FEEDBACK_PERSIST_S,
    MC_MOVEMENT_PCT, POLL_PERIOD_MS, PWM_PERIOD_NS, PWM_PERIOD_TOL_NS, PWM_SKEW_NS,
    PWM_WIDTH_TOL_NS, RANGE25_PERSIST_S, SKEW_GUARANTEED_NS, SKEW_NEVER_NS,
    SPEED_FAULT_PERSIST_S, TEST_ENTRY_HOLD_S, VIGILANCE_CYCLE_S, WARNING1_S, WARNING2_S,
};
use crate::input::InputId;
use crate::tla::TlaKind;

// ─── Top-Level Config ───────────────────────────────────────────────

/// Top-level VCU configuration, loaded from TOML at startup.
/// Immutable once the core is constructed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VcuConfig {
    #[serde(default)]
    pub timing: TimingConfig,
    #[serde(default)]
    pub vigilance: VigilanceConfig,
    #[serde(default)]
    pub pwm: PwmConfig,
    #[serde(default)]
    pub speed: SpeedConfig,
    #[serde(default)]
    pub diagnostics: DiagnosticsConfig,
    /// Per-input overrides, keyed by input name (e.g. `[inputs.horn_low]`).
    #[serde(default)]
    pub inputs: InputOverrides,
    /// Per-TLA overrides (e.g. `[tla.headlight]`).
    #[serde(default)]
    pub tla: TlaOverrides,
}

impl VcuConfig {
    /// Validate parameter bounds and ordering across all sections.
    pub fn validate(&self) -> Result<(), String> {
        self.timing.validate()?;
        self.vigilance.validate()?;
        self.pwm.validate()?;
        self.speed.validate()?;
        self.diagnostics.validate()?;
        self.inputs.validate()?;
        self.tla.validate()?;
        Ok(())
    }
}

// ─── Timing ─────────────────────────────────────────────────────────

/// Clock and input-qualification timing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingConfig {
    /// Tick period [ns] (default: 15 625 = 64 kHz).
    #[serde(default = "default_tick_ns")]
    pub tick_ns: u64,
    /// Debounce window for digital inputs [ns].
    #[serde(default = "default_debounce_ns")]
    pub debounce_ns: u64,
    /// Dual-channel skew always-qualify bound [ns].
    #[serde(default = "default_skew_guaranteed_ns")]
    pub skew_guaranteed_ns: u64,
    /// Dual-channel skew never-qualify bound [ns].
    #[serde(default = "default_skew_never_ns")]
    pub skew_never_ns: u64,
}

fn default_tick_ns() -> u64 {
    DEFAULT_TICK_NS
}
fn default_debounce_ns() -> u64 {
    DEBOUNCE_NS
}
fn default_skew_guaranteed_ns() -> u64 {
    SKEW_GUARANTEED_NS
}
fn default_skew_never_ns() -> u64 {
    SKEW_NEVER_NS
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            tick_ns: DEFAULT_TICK_NS,
            debounce_ns: DEBOUNCE_NS,
            skew_guaranteed_ns: SKEW_GUARANTEED_NS,
            skew_never_ns: SKEW_NEVER_NS,
        }
    }
}

impl TimingConfig {
    /// Tick period bounds [ns]: 1 µs .. 1 ms.
    pub const TICK_NS_MIN: u64 = 1_000;
    pub const TICK_NS_MAX: u64 = 1_000_000;

    pub fn validate(&self) -> Result<(), String> {
        if self.tick_ns < Self::TICK_NS_MIN || self.tick_ns > Self::TICK_NS_MAX {
            return Err(format!(
                "timing.tick_ns {} out of range [{}, {}]",
                self.tick_ns,
                Self::TICK_NS_MIN,
                Self::TICK_NS_MAX
            ));
        }
        if self.debounce_ns < self.tick_ns {
            return Err(format!(
                "timing.debounce_ns {} below one tick ({})",
                self.debounce_ns, self.tick_ns
            ));
        }
        if self.skew_guaranteed_ns >= self.skew_never_ns {
            return Err(format!(
                "timing.skew_guaranteed_ns {} must be below skew_never_ns {}",
                self.skew_guaranteed_ns, self.skew_never_ns
            ));
        }
        Ok(())
    }
}

// ─── Vigilance ──────────────────────────────────────────────────────

/// Vigilance cycle and warning-stage thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VigilanceConfig {
    /// Full cycle length [s] (default: 45).
    #[serde(default = "default_cycle_s")]
    pub cycle_s: f64,
    /// First-warning threshold [s remaining].
    #[serde(default = "default_warning1_s")]
    pub warning1_s: f64,
    /// Second-warning threshold [s remaining].
    #[serde(default = "default_warning2_s")]
    pub warning2_s: f64,
    /// VPB hold duration for TEST entry [s].
    #[serde(default = "default_test_entry_hold_s")]
    pub test_entry_hold_s: f64,
}

fn default_cycle_s() -> f64 {
    VIGILANCE_CYCLE_S
}
fn default_warning1_s() -> f64 {
    WARNING1_S
}
fn default_warning2_s() -> f64 {
    WARNING2_S
}
fn default_test_entry_hold_s() -> f64 {
    TEST_ENTRY_HOLD_S
}

impl Default for VigilanceConfig {
    fn default() -> Self {
        Self {
            cycle_s: VIGILANCE_CYCLE_S,
            warning1_s: WARNING1_S,
            warning2_s: WARNING2_S,
            test_entry_hold_s: TEST_ENTRY_HOLD_S,
        }
    }
}

impl VigilanceConfig {
    pub fn validate(&self) -> Result<(), String> {
        if !(1.0..=600.0).contains(&self.cycle_s) {
            return Err(format!("vigilance.cycle_s {} out of range [1, 600]", self.cycle_s));
        }
        if self.warning1_s >= self.cycle_s {
            return Err(format!(
                "vigilance.warning1_s {} must be below cycle_s {}",
                self.warning1_s, self.cycle_s
            ));
        }
        if self.warning2_s >= self.warning1_s {
            return Err(format!(
                "vigilance.warning2_s {} must be below warning1_s {}",
                self.warning2_s, self.warning1_s
            ));
        }
        if self.test_entry_hold_s <= 0.0 {
            return Err("vigilance.test_entry_hold_s must be positive".into());
        }
        Ok(())
    }
}

// ─── PWM ────────────────────────────────────────────────────────────

/// PWM supervision envelope and duty-cycle interpretation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PwmConfig {
    /// Expected period [ns].
    #[serde(default = "default_pwm_period_ns")]
    pub period_ns: u64,
    /// Period envelope half-width [ns].
    #[serde(default = "default_pwm_period_tol_ns")]
    pub period_tol_ns: u64,
    /// Cross-channel edge skew bound [ns].
    #[serde(default = "default_pwm_skew_ns")]
    pub skew_ns: u64,
    /// Cross-channel width mismatch bound [ns].
    #[serde(default = "default_pwm_width_tol_ns")]
    pub width_tol_ns: u64,
    /// Valid duty band lower bound [%].
    #[serde(default = "default_duty_min")]
    pub duty_min_pct: f64,
    /// Valid duty band upper bound [%].
    #[serde(default = "default_duty_max")]
    pub duty_max_pct: f64,
    /// Digitization tolerance on the band [%].
    #[serde(default = "default_duty_tol")]
    pub duty_tol_pct: f64,
    /// Demand movement counted as task-linked activity [% duty].
    #[serde(default = "default_movement_pct")]
    pub movement_pct: f64,
}

fn default_pwm_period_ns() -> u64 {
    PWM_PERIOD_NS
}
fn default_pwm_period_tol_ns() -> u64 {
    PWM_PERIOD_TOL_NS
}
fn default_pwm_skew_ns() -> u64 {
    PWM_SKEW_NS
}
fn default_pwm_width_tol_ns() -> u64 {
    PWM_WIDTH_TOL_NS
}
fn default_duty_min() -> f64 {
    DUTY_MIN_PCT
}
fn default_duty_max() -> f64 {
    DUTY_MAX_PCT
}
fn default_duty_tol() -> f64 {
    DUTY_TOL_PCT
}
fn default_movement_pct() -> f64 {
    MC_MOVEMENT_PCT
}

impl Default for PwmConfig {
    fn default() -> Self {
        Self {
            period_ns: PWM_PERIOD_NS,
            period_tol_ns: PWM_PERIOD_TOL_NS,
            skew_ns: PWM_SKEW_NS,
            width_tol_ns: PWM_WIDTH_TOL_NS,
            duty_min_pct: DUTY_MIN_PCT,
            duty_max_pct: DUTY_MAX_PCT,
            duty_tol_pct: DUTY_TOL_PCT,
            movement_pct: MC_MOVEMENT_PCT,
        }
    }
}

impl PwmConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.period_ns == 0 {
            return Err("pwm.period_ns must be positive".into());
        }
        if self.period_tol_ns >= self.period_ns {
            return Err(format!(
                "pwm.period_tol_ns {} must be below period_ns {}",
                self.period_tol_ns, self.period_ns
            ));
        }
        if !(0.0..100.0).contains(&self.duty_min_pct)
            || !(0.0..=100.0).contains(&self.duty_max_pct)
            || self.duty_min_pct >= self.duty_max_pct
        {
            return Err(format!(
                "pwm duty band [{}, {}] invalid",
                self.duty_min_pct, self.duty_max_pct
            ));
        }
        if self.duty_tol_pct < 0.0 || self.duty_tol_pct >= self.duty_min_pct {
            return Err(format!("pwm.duty_tol_pct {} invalid", self.duty_tol_pct));
        }
        if !(0.0..=100.0).contains(&self.movement_pct) {
            return Err(format!("pwm.movement_pct {} invalid", self.movement_pct));
        }
        Ok(())
    }
}

// ─── Analog speed ───────────────────────────────────────────────────

/// Analog speed decoder persistence windows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeedConfig {
    /// Under/over/invalid fault persistence [s].
    #[serde(default = "default_speed_persist_s")]
    pub fault_persist_s: f64,
    /// 25 km/h range fault persistence [s].
    #[serde(default = "default_range25_persist_s")]
    pub range25_persist_s: f64,
}

fn default_speed_persist_s() -> f64 {
    SPEED_FAULT_PERSIST_S
}
fn default_range25_persist_s() -> f64 {
    RANGE25_PERSIST_S
}

impl Default for SpeedConfig {
    fn default() -> Self {
        Self {
            fault_persist_s: SPEED_FAULT_PERSIST_S,
            range25_persist_s: RANGE25_PERSIST_S,
        }
    }
}

impl SpeedConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.fault_persist_s <= 0.0 {
            return Err("speed.fault_persist_s must be positive".into());
        }
        if self.range25_persist_s <= 0.0 {
            return Err("speed.range25_persist_s must be positive".into());
        }
        Ok(())
    }
}

// ─── Diagnostics ────────────────────────────────────────────────────

/// External reporting interface timing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagnosticsConfig {
    /// Diagnostic/LED poll period [ms].
    #[serde(default = "default_poll_period_ms")]
    pub poll_period_ms: u64,
    /// Feedback-mismatch persistence before major fault [s].
    #[serde(default = "default_feedback_persist_s")]
    pub feedback_persist_s: f64,
}

fn default_poll_period_ms() -> u64 {
    POLL_PERIOD_MS
}
fn default_feedback_persist_s() -> f64 {
    FEEDBACK_PERSIST_S
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            poll_period_ms: POLL_PERIOD_MS,
            feedback_persist_s: FEEDBACK_PERSIST_S,
        }
    }
}

impl DiagnosticsConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.poll_period_ms == 0 {
            return Err("diagnostics.poll_period_ms must be positive".into());
        }
        if self.feedback_persist_s <= 0.0 {
            return Err("diagnostics.feedback_persist_s must be positive".into());
        }
        Ok(())
    }
}

// ─── Per-input overrides ────────────────────────────────────────────

/// Optional overrides of a logical input's default wiring.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct InputOverride {
    /// Debounce window [ns].
    pub debounce_ns: Option<u64>,
    /// Max press-to-release span for compound events [ns].
    pub max_activity_ns: Option<u64>,
}

/// Per-input override table, keyed by snake_case input name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InputOverrides {
    #[serde(default)]
    pub vigilance_push_button: Option<InputOverride>,
    #[serde(default)]
    pub zero_speed: Option<InputOverride>,
    #[serde(default)]
    pub horn_low: Option<InputOverride>,
    #[serde(default)]
    pub horn_high: Option<InputOverride>,
    #[serde(default)]
    pub headlight: Option<InputOverride>,
    #[serde(default)]
    pub wiper_washer: Option<InputOverride>,
    #[serde(default)]
    pub safety_bypass_ack: Option<InputOverride>,
    #[serde(default)]
    pub cab_active: Option<InputOverride>,
    #[serde(default)]
    pub hcs_mode: Option<InputOverride>,
}

impl InputOverrides {
    /// Override for one input, if present.
    pub fn get(&self, id: InputId) -> Option<InputOverride> {
        match id {
            InputId::VigilancePushButton => self.vigilance_push_button,
            InputId::ZeroSpeed => self.zero_speed,
            InputId::HornLow => self.horn_low,
            InputId::HornHigh => self.horn_high,
            InputId::Headlight => self.headlight,
            InputId::WiperWasher => self.wiper_washer,
            InputId::SafetyBypassAck => self.safety_bypass_ack,
            InputId::CabActive => self.cab_active,
            InputId::HcsMode => self.hcs_mode,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        for id in InputId::ALL {
            if let Some(ov) = self.get(id) {
                if let Some(d) = ov.debounce_ns {
                    if d == 0 {
                        return Err(format!("inputs.{id:?}: debounce_ns must be positive"));
                    }
                }
                if let Some(m) = ov.max_activity_ns {
                    if m == 0 {
                        return Err(format!("inputs.{id:?}: max_activity_ns must be positive"));
                    }
                }
            }
        }
        Ok(())
    }
}

// ─── Per-TLA overrides ──────────────────────────────────────────────

/// Optional overrides of a TLA kind's gates.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct TlaOverride {
    /// Ceiling on consecutive accepted events.
    pub max_consecutive: Option<u8>,
    /// Activity timeout [s]; 0 disables the gate.
    pub timeout_s: Option<f64>,
}

/// Per-TLA override table, keyed by snake_case kind name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TlaOverrides {
    #[serde(default)]
    pub mc_movement: Option<TlaOverride>,
    #[serde(default)]
    pub horn_low: Option<TlaOverride>,
    #[serde(default)]
    pub horn_high: Option<TlaOverride>,
    #[serde(default)]
    pub headlight: Option<TlaOverride>,
    #[serde(default)]
    pub wiper: Option<TlaOverride>,
    #[serde(default)]
    pub safety_bypass: Option<TlaOverride>,
}

impl TlaOverrides {
    /// Override for one kind, if present.
    pub fn get(&self, kind: TlaKind) -> Option<TlaOverride> {
        match kind {
            TlaKind::McMovement => self.mc_movement,
            TlaKind::HornLow => self.horn_low,
            TlaKind::HornHigh => self.horn_high,
            TlaKind::Headlight => self.headlight,
            TlaKind::Wiper => self.wiper,
            TlaKind::SafetyBypass => self.safety_bypass,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        for kind in TlaKind::ALL {
            if let Some(ov) = self.get(kind) {
                if let Some(n) = ov.max_consecutive {
                    if n == 0 {
                        return Err(format!("tla.{kind:?}: max_consecutive must be at least 1"));
                    }
                }
                if let Some(t) = ov.timeout_s {
                    if t < 0.0 {
                        return Err(format!("tla.{kind:?}: timeout_s must not be negative"));
                    }
                }
            }
        }
        Ok(())
    }
}
