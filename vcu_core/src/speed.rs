//! Analog speed decoding.
//!
//! The speed interface delivers a thermometer-coded comparator vector:
//! four redundant threshold pairs plus under- and over-range flags. A
//! threshold is asserted only when both comparators of its pair agree;
//! the asserted thresholds must form a contiguous run starting at the
//! lowest, otherwise the vector is an invalid encoding. Range and
//! encoding faults are confirmed through persistence filters so a
//! single-tick excursion never reaches the fault aggregate.

use bitflags::bitflags;

use vcu_common::counter::PersistenceCounter;

bitflags! {
    /// Raw comparator vector sampled from the analog front end.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
    pub struct AnalogVector: u16 {
        /// Signal below the measurable range.
        const UNDER = 1 << 0;
        const AN_1A = 1 << 1;
        const AN_1B = 1 << 2;
        const AN_2A = 1 << 3;
        const AN_2B = 1 << 4;
        const AN_3A = 1 << 5;
        const AN_3B = 1 << 6;
        const AN_4A = 1 << 7;
        const AN_4B = 1 << 8;
        /// Signal above the measurable range.
        const OVER = 1 << 9;
    }
}

impl AnalogVector {
    /// Both comparators of threshold `k` (1-based) agree asserted.
    pub fn threshold(&self, k: u8) -> bool {
        let (a, b) = match k {
            1 => (Self::AN_1A, Self::AN_1B),
            2 => (Self::AN_2A, Self::AN_2B),
            3 => (Self::AN_3A, Self::AN_3B),
            4 => (Self::AN_4A, Self::AN_4B),
            _ => return false,
        };
        self.contains(a) && self.contains(b)
    }
}

/// Decoded speed information for one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpeedOutput {
    /// Highest contiguous threshold reached (0..=4).
    pub band: u8,
    /// Vector is a well-formed thermometer code within range.
    pub valid: bool,
    /// Valid vector with no threshold reached.
    pub standstill: bool,
    /// Confirmed under-range fault.
    pub under_fault: bool,
    /// Confirmed over-range fault.
    pub over_fault: bool,
    /// Confirmed invalid-encoding fault.
    pub invalid_fault: bool,
    /// Confirmed 25 km/h range contradiction.
    pub range25_fault: bool,
}

/// Speed decoder with persistence filtering of range faults.
#[derive(Debug, Clone)]
pub struct SpeedDecoder {
    under: PersistenceCounter,
    over: PersistenceCounter,
    invalid: PersistenceCounter,
    range25: PersistenceCounter,
}

impl SpeedDecoder {
    pub fn new(fault_persist_ticks: u32, range25_persist_ticks: u32) -> Self {
        Self {
            under: PersistenceCounter::new(fault_persist_ticks),
            over: PersistenceCounter::new(fault_persist_ticks),
            invalid: PersistenceCounter::new(fault_persist_ticks),
            range25: PersistenceCounter::new(range25_persist_ticks),
        }
    }

    /// Decode one tick's comparator vector.
    pub fn step(&mut self, vec: AnalogVector) -> SpeedOutput {
        let thresholds = [
            vec.threshold(1),
            vec.threshold(2),
            vec.threshold(3),
            vec.threshold(4),
        ];

        // Thermometer decode: count the contiguous run from the bottom;
        // any assertion above a gap makes the vector invalid.
        let mut band = 0u8;
        let mut contiguous = true;
        for (i, &t) in thresholds.iter().enumerate() {
            if t && band as usize == i {
                band += 1;
            } else if t {
                contiguous = false;
            }
        }

        let under_raw = vec.contains(AnalogVector::UNDER);
        let over_raw = vec.contains(AnalogVector::OVER);
        let invalid_raw = !contiguous || (under_raw && band > 0) || (over_raw && band < 4);
        let valid = contiguous && !under_raw && !over_raw;

        // 25 km/h contradiction: threshold 4 reached on either
        // comparator while the threshold-3 pair disagrees or is clear.
        let range25_raw = !(vec.contains(AnalogVector::AN_3A) && vec.contains(AnalogVector::AN_3B))
            && (vec.contains(AnalogVector::AN_4A) || vec.contains(AnalogVector::AN_4B));

        SpeedOutput {
            band,
            valid,
            standstill: valid && band == 0,
            under_fault: self.under.step(under_raw),
            over_fault: self.over.step(over_raw),
            invalid_fault: self.invalid.step(invalid_raw),
            range25_fault: self.range25.step(range25_raw),
        }
    }

    pub fn reset(&mut self) {
        self.under.reset();
        self.over.reset();
        self.invalid.reset();
        self.range25.reset();
    }
}
