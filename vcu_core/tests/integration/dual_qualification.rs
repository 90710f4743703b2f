//! Dual-channel qualification end to end: skew tolerance, debounce,
//! and self-test masking observed through complete cycles.

use vcu_common::input::InputId;
use vcu_common::fault::MinorFault;
use vcu_common::tla::TlaKind;

use vcu_core::input::selftest::{SelfTestFeedback, SelfTestRequest};

use super::common::{DEBOUNCE_TICKS, Harness};

#[test]
fn simultaneous_dual_press_qualifies() {
    let mut h = Harness::new();
    h.enter_normal();
    let obs = h.press(InputId::HornLow);
    assert!(obs.accepted[TlaKind::HornLow.index()]);
}

#[test]
fn skew_within_guaranteed_bound_qualifies() {
    let mut h = Harness::new();
    h.enter_normal();

    // Ch1 leads Ch2 by one tick on the press; release is simultaneous.
    let i = InputId::HornLow.index();
    h.inputs.digital[i] = [true, false];
    h.run(1);
    h.inputs.digital[i] = [true, true];
    h.run(DEBOUNCE_TICKS + 2);
    h.inputs.digital[i] = [false, false];
    let obs = h.run(DEBOUNCE_TICKS + 2);
    assert!(obs.accepted[TlaKind::HornLow.index()]);
}

#[test]
fn skew_beyond_never_bound_is_dropped() {
    let mut h = Harness::new();
    h.enter_normal();

    // Ch1 leads by six ticks: past the never-qualify bound.
    let i = InputId::HornLow.index();
    h.inputs.digital[i] = [true, false];
    h.run(6);
    h.inputs.digital[i] = [true, true];
    h.run(DEBOUNCE_TICKS + 2);
    h.inputs.digital[i] = [false, false];
    let obs = h.run(DEBOUNCE_TICKS + 2);
    assert!(!obs.accepted[TlaKind::HornLow.index()]);
}

#[test]
fn glitch_shorter_than_debounce_is_invisible() {
    let mut h = Harness::new();
    h.enter_normal();
    // One-tick pulse on both channels of the headlight input.
    h.set_level(InputId::Headlight, true);
    h.run(1);
    h.set_level(InputId::Headlight, false);
    let obs = h.run(DEBOUNCE_TICKS + 4);
    assert!(!obs.accepted[TlaKind::Headlight.index()]);
}

#[test]
fn failed_self_test_masks_the_input_for_good() {
    let mut h = Harness::new();
    h.enter_normal();

    // Start a directed test on the horn-low input.
    h.inputs.selftest_request = Some(SelfTestRequest {
        input: InputId::HornLow,
        drive_high: true,
    });
    h.run(1);
    h.inputs.selftest_request = None;

    // Active phase, then low phase with Ch2 stuck high, then release.
    h.inputs.selftest_feedback = SelfTestFeedback {
        observed: [true, true],
        test_low: [false, false],
        in_progress: true,
    };
    h.run(1);
    h.inputs.selftest_feedback = SelfTestFeedback {
        observed: [false, true],
        test_low: [true, true],
        in_progress: true,
    };
    h.run(1);
    h.inputs.selftest_feedback = SelfTestFeedback {
        observed: [true, true],
        test_low: [false, false],
        in_progress: false,
    };
    let obs = h.run(1);
    h.inputs.selftest_feedback = SelfTestFeedback::default();

    assert!(obs.last.minor_fault.contains(MinorFault::SELFTEST_FAILED));
    assert!(
        obs.last
            .minor_fault
            .contains(MinorFault::DIGITAL_CHANNEL_MASKED)
    );

    // The surviving channel alone can never produce a qualified event.
    let obs = h.press(InputId::HornLow);
    assert!(!obs.accepted[TlaKind::HornLow.index()]);

    // Full reset clears the permanent mask.
    h.inputs.reset = true;
    h.run(1);
    h.inputs.reset = false;
    h.enter_normal();
    let obs = h.press(InputId::HornLow);
    assert!(obs.accepted[TlaKind::HornLow.index()]);
}
