//! PWM input capture.
//!
//! Measures rise-to-rise period and high width of one PWM channel from
//! per-tick level samples. A completed cycle is reported on the rising
//! edge that closes it; the period envelope itself is judged by the
//! pipeline, not here.

use crate::input::EdgeKind;

/// One completed PWM cycle, in ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PwmCycle {
    pub period_ticks: u64,
    pub high_ticks: u64,
}

impl PwmCycle {
    /// High-time fraction of the period, in percent.
    pub fn duty_pct(&self) -> f64 {
        if self.period_ticks == 0 {
            return 0.0;
        }
        100.0 * self.high_ticks as f64 / self.period_ticks as f64
    }
}

/// Edge and cycle capture for one PWM channel.
#[derive(Debug, Clone, Default)]
pub struct PwmCapture {
    prev: bool,
    last_rise: Option<u64>,
    last_fall: Option<u64>,
    last_edge: Option<u64>,
}

impl PwmCapture {
    pub const fn new() -> Self {
        Self {
            prev: false,
            last_rise: None,
            last_fall: None,
            last_edge: None,
        }
    }

    /// Feed one level sample. Returns the detected edge and, on a rising
    /// edge, the cycle it closes.
    pub fn sample(&mut self, now: u64, level: bool) -> (Option<EdgeKind>, Option<PwmCycle>) {
        if level == self.prev {
            return (None, None);
        }
        self.prev = level;
        self.last_edge = Some(now);

        if level {
            let cycle = match (self.last_rise, self.last_fall) {
                (Some(rise), Some(fall)) if fall > rise => Some(PwmCycle {
                    period_ticks: now - rise,
                    high_ticks: fall - rise,
                }),
                _ => None,
            };
            self.last_rise = Some(now);
            (Some(EdgeKind::Rising), cycle)
        } else {
            self.last_fall = Some(now);
            (Some(EdgeKind::Falling), None)
        }
    }

    /// Tick of the most recent edge in either direction.
    #[inline]
    pub const fn last_edge_tick(&self) -> Option<u64> {
        self.last_edge
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn measures_period_and_width() {
        let mut cap = PwmCapture::new();
        // 128-tick period, 64 ticks high.
        assert_eq!(cap.sample(0, true), (Some(EdgeKind::Rising), None));
        assert_eq!(cap.sample(64, false), (Some(EdgeKind::Falling), None));
        let (edge, cycle) = cap.sample(128, true);
        assert_eq!(edge, Some(EdgeKind::Rising));
        let cycle = cycle.unwrap();
        assert_eq!(cycle.period_ticks, 128);
        assert_eq!(cycle.high_ticks, 64);
        assert!((cycle.duty_pct() - 50.0).abs() < 1e-9);
    }

    #[test]
    fn steady_level_produces_nothing() {
        let mut cap = PwmCapture::new();
        cap.sample(0, true);
        for t in 1..100 {
            assert_eq!(cap.sample(t, true), (None, None));
        }
        assert_eq!(cap.last_edge_tick(), Some(0));
    }

    #[test]
    fn first_cycle_needs_a_full_rise_fall_rise() {
        let mut cap = PwmCapture::new();
        // A rise with no preceding fall closes nothing.
        let (_, cycle) = cap.sample(10, true);
        assert!(cycle.is_none());
        cap.sample(20, false);
        let (_, cycle) = cap.sample(138, true);
        assert_eq!(
            cycle,
            Some(PwmCycle {
                period_ticks: 128,
                high_ticks: 10
            })
        );
    }
}
