//! Analog speed interface through the full core: band reporting,
//! standstill gating, and confirmed range faults reaching the
//! fault aggregate.

use vcu_common::fault::MinorFault;
use vcu_common::input::InputId;

use vcu_core::speed::AnalogVector;

use super::common::{DEBOUNCE_TICKS, Harness};

fn pairs(n: u8) -> AnalogVector {
    let mut v = AnalogVector::empty();
    let all = [
        AnalogVector::AN_1A.union(AnalogVector::AN_1B),
        AnalogVector::AN_2A.union(AnalogVector::AN_2B),
        AnalogVector::AN_3A.union(AnalogVector::AN_3B),
        AnalogVector::AN_4A.union(AnalogVector::AN_4B),
    ];
    for pair in all.iter().take(n as usize) {
        v |= *pair;
    }
    v
}

#[test]
fn bands_are_reported_through_the_core() {
    let mut h = Harness::new();
    for n in 0..=4u8 {
        h.inputs.analog = pairs(n);
        let obs = h.run(2);
        assert_eq!(obs.last.speed_band, n);
    }
}

#[test]
fn standstill_needs_zero_band_and_zero_speed_input() {
    let mut h = Harness::new();
    // Zero band alone is not standstill.
    assert!(!h.run(4).last.standstill);
    h.set_level(InputId::ZeroSpeed, true);
    assert!(h.run(DEBOUNCE_TICKS + 2).last.standstill);
    // Any speed band breaks standstill even with the input asserted.
    h.inputs.analog = pairs(1);
    assert!(!h.run(4).last.standstill);
}

#[test]
fn contradictory_zero_speed_input_is_not_standstill() {
    let mut h = Harness::new();
    h.set_level(InputId::ZeroSpeed, true);
    h.inputs.analog = pairs(2);
    assert!(!h.run(DEBOUNCE_TICKS + 4).last.standstill);
}

#[test]
fn range25_contradiction_latches_a_minor_fault() {
    let mut h = Harness::new();
    // Threshold 4 asserted while the threshold-3 pair is clear.
    h.inputs.analog = AnalogVector::AN_4A | AnalogVector::AN_4B;
    let obs = h.run(20);
    assert!(obs.last.minor_fault.contains(MinorFault::RANGE_25KMH));
    // The gapped thermometer code is also a confirmed range fault.
    assert!(obs.last.minor_fault.contains(MinorFault::SPEED_RANGE));

    // Vector returns to sane: the latched bits stay.
    h.inputs.analog = AnalogVector::empty();
    let obs = h.run(20);
    assert!(obs.last.minor_fault.contains(MinorFault::RANGE_25KMH));
}

#[test]
fn brief_contradiction_is_filtered() {
    let mut h = Harness::new();
    // Shorter than the 10-tick confirmation window.
    h.inputs.analog = AnalogVector::AN_4A;
    h.run(5);
    h.inputs.analog = AnalogVector::empty();
    let obs = h.run(20);
    assert!(!obs.last.minor_fault.contains(MinorFault::RANGE_25KMH));
}

#[test]
fn over_range_is_a_confirmed_fault() {
    let mut h = Harness::new();
    h.inputs.analog = pairs(4) | AnalogVector::OVER;
    let obs = h.run(10);
    assert!(obs.last.minor_fault.contains(MinorFault::SPEED_RANGE));
    assert!(!obs.last.standstill);
}
