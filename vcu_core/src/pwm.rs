//! PWM master-controller demand supervision.
//!
//! The demand arrives as a redundant PWM pair. Each channel is captured
//! and judged against the period envelope; the pair is cross-checked for
//! edge skew, stall, and width disagreement; the decoded duty is checked
//! against the valid band and watched for movement. Every violation
//! advances a per-channel saturating error counter; a non-zero counter
//! masks the channel, a saturated counter masks it permanently.

pub mod capture;
pub mod compare;
pub mod duty;

use vcu_common::config::PwmConfig;
use vcu_common::counter::SaturatingErrorCounter;
use vcu_common::fault::PwmFault;

use capture::PwmCapture;
use compare::CrossCompare;
use duty::DutyMonitor;

/// Drivability of the master-controller demand path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum McPowerStatus {
    /// Both channels healthy.
    #[default]
    Ok = 0,
    /// One channel masked; demand follows the surviving channel.
    Degraded = 1,
    /// Both channels masked or supply lost; demand unavailable.
    NoPower = 2,
}

/// Tick-quantized PWM supervision bounds.
#[derive(Debug, Clone, Copy)]
pub struct PwmTiming {
    /// Acceptable period [ticks], inclusive envelope.
    pub period_min_ticks: u64,
    pub period_max_ticks: u64,
    /// Edge skew above this is a fault [ticks].
    pub skew_ticks: u64,
    /// Width disagreement above this is a fault [ticks].
    pub width_tol_ticks: u64,
    /// Silence beyond this while the partner toggles is a stall [ticks].
    pub stall_ticks: u64,
}

impl PwmTiming {
    /// Quantize the PWM envelope to the core tick.
    ///
    /// The envelope shrinks inward (ceil lower bound, floor upper) and
    /// fault thresholds round down, so a quantized judgment is never
    /// more permissive than the nanosecond bound.
    pub fn from_config(cfg: &PwmConfig, tick_ns: u64) -> Self {
        let nominal = cfg.period_ns.div_ceil(tick_ns);
        Self {
            period_min_ticks: (cfg.period_ns - cfg.period_tol_ns).div_ceil(tick_ns),
            period_max_ticks: (cfg.period_ns + cfg.period_tol_ns) / tick_ns,
            skew_ticks: cfg.skew_ns / tick_ns,
            width_tol_ticks: cfg.width_tol_ns / tick_ns,
            stall_ticks: 2 * nominal,
        }
    }
}

/// One tick's pipeline output.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PwmOutput {
    pub status: McPowerStatus,
    /// Demand moved enough to count as operator activity.
    pub movement: bool,
    /// Decoded duty of the preferred healthy channel, when a cycle
    /// completed this tick.
    pub duty_pct: Option<f64>,
    /// Checks that fired this tick.
    pub faults: PwmFault,
    /// Channels currently masked (counter non-zero).
    pub masked: [bool; 2],
    /// Channels masked permanently (counter saturated).
    pub masked_permanently: [bool; 2],
}

/// Full supervision pipeline for the redundant PWM demand pair.
#[derive(Debug, Clone)]
pub struct PwmPipeline {
    timing: PwmTiming,
    captures: [PwmCapture; 2],
    compare: CrossCompare,
    duty: DutyMonitor,
    counters: [SaturatingErrorCounter; 2],
}

impl PwmPipeline {
    pub fn new(cfg: &PwmConfig, tick_ns: u64) -> Self {
        let timing = PwmTiming::from_config(cfg, tick_ns);
        Self {
            timing,
            captures: [PwmCapture::new(), PwmCapture::new()],
            compare: CrossCompare::new(
                timing.skew_ticks,
                timing.width_tol_ticks,
                timing.stall_ticks,
            ),
            duty: DutyMonitor::new(
                cfg.duty_min_pct,
                cfg.duty_max_pct,
                cfg.duty_tol_pct,
                cfg.movement_pct,
            ),
            counters: [SaturatingErrorCounter::new(); 2],
        }
    }

    /// Advance the pipeline one tick.
    pub fn step(&mut self, now: u64, raw: [bool; 2], power_ok: bool) -> PwmOutput {
        let masked = [self.counters[0].masked_now(), self.counters[1].masked_now()];

        let mut edges = [None, None];
        let mut cycles = [None, None];
        let mut last_edge = [None, None];
        for ch in 0..2 {
            // Captures keep running on masked channels so a transient
            // mask can heal through subsequent valid cycles.
            let (edge, cycle) = self.captures[ch].sample(now, raw[ch]);
            edges[ch] = edge;
            cycles[ch] = cycle;
            last_edge[ch] = self.captures[ch].last_edge_tick();
        }

        let active = [!masked[0], !masked[1]];
        let cross_edges = [
            if active[0] { edges[0] } else { None },
            if active[1] { edges[1] } else { None },
        ];
        let cross_cycles = [
            if active[0] { cycles[0] } else { None },
            if active[1] { cycles[1] } else { None },
        ];
        let charges = self.compare.step(now, cross_edges, cross_cycles, last_edge, active);

        let mut faults = PwmFault::empty();
        if charges.skew {
            faults |= PwmFault::COMPARE_SKEW;
        }
        if charges.stalled[0] || charges.stalled[1] {
            faults |= PwmFault::COMPARE_STALLED;
        }
        if charges.width {
            faults |= PwmFault::COMPARE_WIDTH;
        }

        // Period envelope, judged per channel.
        let mut period_bad = [false; 2];
        for ch in 0..2 {
            if let Some(c) = cycles[ch] {
                if c.period_ticks < self.timing.period_min_ticks
                    || c.period_ticks > self.timing.period_max_ticks
                {
                    period_bad[ch] = true;
                    faults |= PwmFault::CAPTURE_PERIOD;
                }
            }
        }

        // Duty band, judged per channel on every completed cycle.
        let mut duty_bad = [false; 2];
        for ch in 0..2 {
            if let Some(c) = cycles[ch] {
                if !period_bad[ch] && !self.duty.in_band(c.duty_pct()) {
                    duty_bad[ch] = true;
                    faults |= PwmFault::DUTY_INVALID;
                }
            }
        }

        // Decode the demand from the preferred healthy channel.
        let mut duty_pct = None;
        let mut movement = false;
        let demand_ch = (0..2)
            .find(|&ch| !masked[ch] && cycles[ch].is_some() && !period_bad[ch] && !duty_bad[ch]);
        if let Some(ch) = demand_ch {
            if let Some(c) = cycles[ch] {
                let verdict = self.duty.evaluate(c.duty_pct());
                duty_pct = Some(c.duty_pct());
                movement = verdict.movement;
            }
        }

        for ch in 0..2 {
            let charged = period_bad[ch] || duty_bad[ch] || charges.charges(ch);
            if charged {
                let was_masked = self.counters[ch].masked_now();
                self.counters[ch].increment();
                if !was_masked {
                    tracing::debug!(channel = ch, ?faults, "pwm channel masked");
                }
            } else if cycles[ch].is_some() {
                // A clean completed cycle heals a transient mask.
                self.counters[ch].decrement();
            }
        }

        let masked_now = [self.counters[0].masked_now(), self.counters[1].masked_now()];
        let permanent = [
            self.counters[0].masked_permanently(),
            self.counters[1].masked_permanently(),
        ];
        let status = if !power_ok || (masked_now[0] && masked_now[1]) {
            McPowerStatus::NoPower
        } else if masked_now[0] || masked_now[1] {
            McPowerStatus::Degraded
        } else {
            McPowerStatus::Ok
        };

        PwmOutput {
            status,
            movement,
            duty_pct,
            faults,
            masked: masked_now,
            masked_permanently: permanent,
        }
    }

    /// Per-channel error counter values, for diagnostics.
    pub fn counter_values(&self) -> [u16; 2] {
        [self.counters[0].value(), self.counters[1].value()]
    }

    /// Full system reset, including permanent masks.
    pub fn reset(&mut self) {
        self.captures[0].reset();
        self.captures[1].reset();
        self.compare.reset();
        self.duty.reset();
        self.counters = [SaturatingErrorCounter::new(); 2];
    }
}
