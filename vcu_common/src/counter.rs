//! Saturating error counter and persistence filter.
//!
//! The saturating counter carries two masking semantics derived from one
//! value: a transient mask while the counter is non-zero, and a permanent
//! mask once it saturates. Saturation is one-way: increment and decrement
//! become no-ops at the ceiling, so `masked_permanently()` can never
//! regress without an explicit full reset.

use serde::{Deserialize, Serialize};

use crate::consts::ERROR_COUNTER_MAX;

/// Fixed-width saturating error counter (14-bit).
///
/// - `masked_now()`: counter non-zero (transient, self-healing mask).
/// - `masked_permanently()`: counter saturated (cleared only by `reset()`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaturatingErrorCounter {
    value: u16,
}

impl SaturatingErrorCounter {
    /// Counter ceiling (all-ones of the 14-bit register).
    pub const MAX: u16 = ERROR_COUNTER_MAX;

    /// New counter at zero.
    pub const fn new() -> Self {
        Self { value: 0 }
    }

    /// Current raw value.
    #[inline]
    pub const fn value(&self) -> u16 {
        self.value
    }

    /// Increment by one. No-op once saturated.
    #[inline]
    pub fn increment(&mut self) {
        if self.value < Self::MAX {
            self.value += 1;
        }
    }

    /// Decrement by one (recovery). No-op at zero and no-op once
    /// saturated; permanent masking does not heal.
    #[inline]
    pub fn decrement(&mut self) {
        if self.value > 0 && self.value < Self::MAX {
            self.value -= 1;
        }
    }

    /// Transient mask: any accumulated error.
    #[inline]
    pub const fn masked_now(&self) -> bool {
        self.value != 0
    }

    /// Permanent mask: counter saturated. One-way until `reset()`.
    #[inline]
    pub const fn masked_permanently(&self) -> bool {
        self.value == Self::MAX
    }

    /// Full system reset, the only path out of permanent masking.
    #[inline]
    pub fn reset(&mut self) {
        self.value = 0;
    }
}

/// Debounce/persistence filter: output asserts only after the raw input
/// has been continuously true for the configured number of ticks, and
/// deasserts as soon as the raw input drops.
///
/// Used for speed-range fault confirmation and feedback-mismatch
/// escalation, where transient assertions must not be reported.
#[derive(Debug, Clone, Copy, Default)]
pub struct PersistenceCounter {
    threshold: u32,
    count: u32,
}

impl PersistenceCounter {
    /// New filter requiring `threshold` consecutive true ticks.
    pub const fn new(threshold: u32) -> Self {
        Self {
            threshold,
            count: 0,
        }
    }

    /// Advance one tick with the current raw condition.
    /// Returns the filtered (confirmed) output.
    #[inline]
    pub fn step(&mut self, raw: bool) -> bool {
        if raw {
            if self.count < self.threshold {
                self.count += 1;
            }
        } else {
            self.count = 0;
        }
        self.confirmed()
    }

    /// Filtered output without advancing.
    #[inline]
    pub const fn confirmed(&self) -> bool {
        self.count >= self.threshold
    }

    /// Ticks accumulated so far.
    #[inline]
    pub const fn count(&self) -> u32 {
        self.count
    }

    /// Clear accumulated ticks.
    #[inline]
    pub fn reset(&mut self) {
        self.count = 0;
    }
}
