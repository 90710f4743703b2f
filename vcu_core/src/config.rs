//! TOML configuration loader with tick quantization.
//!
//! Loads a [`VcuConfig`], validates it, and produces a [`LoadedConfig`]
//! with every duration converted to clock ticks. Components never see
//! nanoseconds at runtime, only tick counts, so the core behaves
//! identically at any configured tick rate.

use std::path::Path;

use thiserror::Error;

use vcu_common::config::VcuConfig;
use vcu_common::input::{InputId, InputSpec, default_spec};
use vcu_common::tla::TlaKind;

/// Configuration loading/validation error.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File I/O error.
    #[error("config I/O error: {0}")]
    Io(String),
    /// TOML parse error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Parameter validation error.
    #[error("config validation: {0}")]
    Validation(String),
}

/// Complete tick-quantized configuration, ready for runtime use.
///
/// Durations quantize conservatively: bounds that must *pass* use floor
/// (a skew strictly inside the guaranteed window still qualifies at a
/// coarse tick), windows that must *elapse* use ceiling (a debounce
/// window is never shorter than configured).
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    /// Validated raw configuration.
    pub raw: VcuConfig,
    /// Tick period [ns].
    pub tick_ns: u64,
    /// Merged per-input wiring (defaults + overrides).
    pub specs: [InputSpec; InputId::COUNT],
    /// Per-input debounce window [ticks].
    pub debounce_ticks: [u32; InputId::COUNT],
    /// Per-input compound-event hold bound [ticks].
    pub max_activity_ticks: [Option<u64>; InputId::COUNT],
    /// Dual-channel skew always-qualify bound [ticks].
    pub skew_guaranteed_ticks: u64,
    /// Dual-channel skew never-qualify bound [ticks].
    pub skew_never_ticks: u64,
    /// Vigilance cycle length [ticks].
    pub vigilance_cycle_ticks: u64,
    /// First-warning threshold [ticks remaining].
    pub warning1_ticks: u64,
    /// Second-warning threshold [ticks remaining].
    pub warning2_ticks: u64,
    /// VPB hold for TEST entry [ticks].
    pub test_entry_hold_ticks: u64,
    /// Per-TLA consecutive-event ceiling.
    pub tla_max_consecutive: [u8; TlaKind::COUNT],
    /// Per-TLA activity timeout [ticks]; 0 disables the gate.
    pub tla_timeout_ticks: [u64; TlaKind::COUNT],
    /// Speed under/over/invalid persistence [ticks].
    pub speed_persist_ticks: u32,
    /// 25 km/h range fault persistence [ticks].
    pub range25_persist_ticks: u32,
    /// Feedback-mismatch persistence [ticks].
    pub feedback_persist_ticks: u32,
    /// Diagnostic/LED poll period [ticks].
    pub poll_period_ticks: u64,
}

impl LoadedConfig {
    /// Quantize a validated configuration.
    pub fn from_config(raw: VcuConfig) -> Result<Self, ConfigError> {
        raw.validate().map_err(ConfigError::Validation)?;
        let tick_ns = raw.timing.tick_ns;

        let ceil_ticks = |ns: u64| ns.div_ceil(tick_ns);
        let floor_ticks = |ns: u64| ns / tick_ns;
        let ceil_ticks_s = |s: f64| ((s * 1e9) / tick_ns as f64).ceil() as u64;

        let mut specs = [default_spec(InputId::VigilancePushButton); InputId::COUNT];
        let mut debounce_ticks = [0u32; InputId::COUNT];
        let mut max_activity_ticks = [None; InputId::COUNT];
        for id in InputId::ALL {
            let mut spec = default_spec(id);
            spec.debounce_ns = raw.timing.debounce_ns;
            spec.skew_guaranteed_ns = raw.timing.skew_guaranteed_ns;
            spec.skew_never_ns = raw.timing.skew_never_ns;
            if let Some(ov) = raw.inputs.get(id) {
                if let Some(d) = ov.debounce_ns {
                    spec.debounce_ns = d;
                }
                if let Some(m) = ov.max_activity_ns {
                    spec.max_activity_ns = Some(m);
                }
            }
            specs[id.index()] = spec;
            debounce_ticks[id.index()] = ceil_ticks(spec.debounce_ns) as u32;
            max_activity_ticks[id.index()] = spec.max_activity_ns.map(ceil_ticks);
        }

        let mut tla_max_consecutive = [0u8; TlaKind::COUNT];
        let mut tla_timeout_ticks = [0u64; TlaKind::COUNT];
        for kind in TlaKind::ALL {
            let ov = raw.tla.get(kind);
            tla_max_consecutive[kind.index()] = ov
                .and_then(|o| o.max_consecutive)
                .unwrap_or_else(|| kind.default_max_consecutive());
            let timeout_s = ov
                .and_then(|o| o.timeout_s)
                .or_else(|| kind.default_timeout_s())
                .unwrap_or(0.0);
            tla_timeout_ticks[kind.index()] = ceil_ticks_s(timeout_s);
        }

        Ok(Self {
            tick_ns,
            specs,
            debounce_ticks,
            max_activity_ticks,
            skew_guaranteed_ticks: floor_ticks(raw.timing.skew_guaranteed_ns),
            skew_never_ticks: ceil_ticks(raw.timing.skew_never_ns),
            vigilance_cycle_ticks: ceil_ticks_s(raw.vigilance.cycle_s),
            warning1_ticks: ceil_ticks_s(raw.vigilance.warning1_s),
            warning2_ticks: ceil_ticks_s(raw.vigilance.warning2_s),
            test_entry_hold_ticks: ceil_ticks_s(raw.vigilance.test_entry_hold_s),
            tla_max_consecutive,
            tla_timeout_ticks,
            speed_persist_ticks: ceil_ticks_s(raw.speed.fault_persist_s) as u32,
            range25_persist_ticks: ceil_ticks_s(raw.speed.range25_persist_s) as u32,
            feedback_persist_ticks: ceil_ticks_s(raw.diagnostics.feedback_persist_s) as u32,
            poll_period_ticks: ceil_ticks(raw.diagnostics.poll_period_ms * 1_000_000),
            raw,
        })
    }

    /// Default configuration, quantized.
    pub fn default_config() -> Self {
        // Defaults always validate; the expect documents that invariant.
        Self::from_config(VcuConfig::default()).expect("default config must validate")
    }
}

/// Load and quantize the VCU configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<LoadedConfig, ConfigError> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::Io(format!("failed to read {}: {e}", path.display())))?;
    let raw: VcuConfig =
        toml::from_str(&text).map_err(|e| ConfigError::Parse(format!("{}: {e}", path.display())))?;
    LoadedConfig::from_config(raw)
}
