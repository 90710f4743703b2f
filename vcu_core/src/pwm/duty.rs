//! Duty-cycle interpretation of the master-controller demand.
//!
//! The demand is valid only inside the configured duty band, widened by
//! the digitization tolerance. Band violations are counted per cycle;
//! the caller decides masking. A demand change of at least the movement
//! threshold counts as operator activity.

/// Verdict on one completed cycle's duty value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DutyVerdict {
    /// Duty inside the widened valid band.
    pub valid: bool,
    /// Demand moved at least the movement threshold since the last
    /// valid reference.
    pub movement: bool,
}

/// Duty band check and movement detection.
#[derive(Debug, Clone)]
pub struct DutyMonitor {
    min_pct: f64,
    max_pct: f64,
    tol_pct: f64,
    movement_pct: f64,
    /// Last valid duty against which movement is measured.
    reference: Option<f64>,
}

impl DutyMonitor {
    pub fn new(min_pct: f64, max_pct: f64, tol_pct: f64, movement_pct: f64) -> Self {
        Self {
            min_pct,
            max_pct,
            tol_pct,
            movement_pct,
            reference: None,
        }
    }

    /// Duty inside the widened valid band. Stateless check, usable per
    /// channel before the demand channel is selected.
    pub fn in_band(&self, duty_pct: f64) -> bool {
        duty_pct > self.min_pct - self.tol_pct && duty_pct < self.max_pct + self.tol_pct
    }

    /// Judge one completed cycle's duty value.
    pub fn evaluate(&mut self, duty_pct: f64) -> DutyVerdict {
        let valid = self.in_band(duty_pct);
        if !valid {
            return DutyVerdict {
                valid: false,
                movement: false,
            };
        }
        let movement = match self.reference {
            Some(r) => (duty_pct - r).abs() >= self.movement_pct,
            // First valid demand establishes the reference silently.
            None => false,
        };
        if movement || self.reference.is_none() {
            self.reference = Some(duty_pct);
        }
        DutyVerdict {
            valid: true,
            movement,
        }
    }

    /// Most recent movement reference.
    pub fn reference(&self) -> Option<f64> {
        self.reference
    }

    pub fn reset(&mut self) {
        self.reference = None;
    }
}
