//! System-wide timing constants for the VCU workspace.
//!
//! Single source of truth for all numeric limits and default timing
//! parameters. Imported by all crates; no duplication permitted.
//!
//! All durations are nanoseconds unless the name says otherwise. They are
//! quantized to clock ticks at configuration load time.

/// Default system clock tick period [ns] (64 kHz sample clock).
///
/// One tick equals the differential-propagation quantum of 15.625 µs,
/// so the dual-channel skew bounds are exact tick multiples.
pub const DEFAULT_TICK_NS: u64 = 15_625;

/// Debounce window for all digital inputs [ns] (156.25 ms).
pub const DEBOUNCE_NS: u64 = 156_250_000;

/// Dual-channel skew below which a transition pair always qualifies [ns].
pub const SKEW_GUARANTEED_NS: u64 = 15_625;

/// Dual-channel skew at or above which a transition pair never qualifies [ns].
pub const SKEW_NEVER_NS: u64 = 31_250;

// ─── PWM supervision ────────────────────────────────────────────────

/// Expected PWM period [ns] (2 ms).
pub const PWM_PERIOD_NS: u64 = 2_000_000;

/// PWM period envelope half-width [ns] (±40 µs).
pub const PWM_PERIOD_TOL_NS: u64 = 40_000;

/// Maximum cross-channel edge skew before a compare fault [ns] (15 µs).
pub const PWM_SKEW_NS: u64 = 15_000;

/// Maximum cross-channel pulse-width mismatch [ns] (23.5 µs).
pub const PWM_WIDTH_TOL_NS: u64 = 23_500;

/// Lower bound of the valid duty-cycle band [%].
pub const DUTY_MIN_PCT: f64 = 5.0;

/// Upper bound of the valid duty-cycle band [%].
pub const DUTY_MAX_PCT: f64 = 95.0;

/// Digitization tolerance applied to the duty-cycle band [%].
pub const DUTY_TOL_PCT: f64 = 0.3;

/// Demand movement that counts as task-linked activity [% duty].
pub const MC_MOVEMENT_PCT: f64 = 12.5;

/// Saturation value of the 14-bit error counters.
///
/// Reaching this value is the permanent-mask condition; it is one-way
/// until full system reset.
pub const ERROR_COUNTER_MAX: u16 = 0x3FFF;

// ─── Vigilance timing ───────────────────────────────────────────────

/// Default vigilance cycle length [s].
pub const VIGILANCE_CYCLE_S: f64 = 45.0;

/// Default first-warning threshold [s remaining].
pub const WARNING1_S: f64 = 10.0;

/// Default second-warning threshold [s remaining].
pub const WARNING2_S: f64 = 5.0;

/// VPB hold duration required to enter TEST mode [s].
pub const TEST_ENTRY_HOLD_S: f64 = 3.0;

/// Activity timeout for Horn Low, Horn High and Safety-bypass [s].
pub const TLA_TIMEOUT_HORN_S: f64 = 10.0;

/// Activity timeout for Headlight [s].
pub const TLA_TIMEOUT_HEADLIGHT_S: f64 = 5.0;

/// Activity timeout for Wiper/Washer [s].
pub const TLA_TIMEOUT_WIPER_S: f64 = 10.0;

/// Max consecutive accepted events for horn operations.
pub const TLA_MAX_CONSEC_HORN: u8 = 15;

/// Max consecutive accepted events for single-shot inputs
/// (Headlight, Wiper/Washer, Safety-bypass).
pub const TLA_MAX_CONSEC_SINGLE: u8 = 1;

// ─── Analog speed supervision ───────────────────────────────────────

/// Persistence window for under/over/invalid speed-range faults [s].
pub const SPEED_FAULT_PERSIST_S: f64 = 2.0;

/// Persistence window for the 25 km/h range fault [s].
pub const RANGE25_PERSIST_S: f64 = 20.0;

// ─── Reporting ──────────────────────────────────────────────────────

/// Diagnostic/LED output poll period [ms]; latched codes must be stable
/// for at least one poll period.
pub const POLL_PERIOD_MS: u64 = 100;

/// Persistence window for penalty-brake feedback mismatch [s].
pub const FEEDBACK_PERSIST_S: f64 = 1.0;
