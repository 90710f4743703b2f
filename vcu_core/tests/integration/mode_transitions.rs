//! Operation-mode paths through the full core: TEST reachable only
//! from SUPPRESSED, maintenance suspension, and MFAULT latching.

use vcu_common::input::InputId;
use vcu_common::mode::OperationMode;

use super::common::{DEBOUNCE_TICKS, Harness};

/// Ticks the VPB must be held for TEST entry in the fast config (50),
/// plus settle margin.
const HOLD_TICKS: u64 = 50;

#[test]
fn cab_activity_selects_normal_and_back() {
    let mut h = Harness::new();
    assert_eq!(h.run(4).last.mode, OperationMode::Suppressed);
    h.enter_normal();
    h.set_level(InputId::CabActive, false);
    let obs = h.run(DEBOUNCE_TICKS + 4);
    assert_eq!(obs.last.mode, OperationMode::Suppressed);
}

#[test]
fn maintenance_input_suspends_timing() {
    let mut h = Harness::new();
    h.enter_normal();
    h.set_level(InputId::HcsMode, true);
    let obs = h.run(DEBOUNCE_TICKS + 4);
    assert_eq!(obs.last.mode, OperationMode::Depressed);
    // Timing is held while depressed.
    let obs = h.run(3 * super::common::CYCLE_TICKS);
    assert!(!obs.penalty_seen);
    h.set_level(InputId::HcsMode, false);
    let obs = h.run(DEBOUNCE_TICKS + 4);
    assert_eq!(obs.last.mode, OperationMode::Normal);
}

#[test]
fn test_mode_needs_standstill_and_held_button() {
    let mut h = Harness::new();
    h.hold_standstill();

    // Short hold: stays suppressed.
    h.set_level(InputId::VigilancePushButton, true);
    let obs = h.run(HOLD_TICKS / 2);
    assert_eq!(obs.last.mode, OperationMode::Suppressed);

    // Keep holding past the threshold.
    let obs = h.run(HOLD_TICKS + DEBOUNCE_TICKS + 2);
    assert_eq!(obs.last.mode, OperationMode::Test);

    // Releasing the button with no test running exits to suppressed.
    h.set_level(InputId::VigilancePushButton, false);
    let obs = h.run(DEBOUNCE_TICKS + 4);
    assert_eq!(obs.last.mode, OperationMode::Suppressed);
}

#[test]
fn test_mode_unreachable_with_cab_active() {
    let mut h = Harness::new();
    h.enter_normal();
    h.hold_standstill();
    h.set_level(InputId::VigilancePushButton, true);
    let obs = h.run(2 * HOLD_TICKS);
    assert_eq!(obs.last.mode, OperationMode::Normal);
}

#[test]
fn test_mode_unreachable_while_moving() {
    let mut h = Harness::new();
    // Zero-speed input never asserted: no standstill confirmation.
    h.set_level(InputId::VigilancePushButton, true);
    let obs = h.run(2 * HOLD_TICKS);
    assert_eq!(obs.last.mode, OperationMode::Suppressed);
}

#[test]
fn losing_standstill_aborts_test_mode() {
    let mut h = Harness::new();
    h.hold_standstill();
    h.set_level(InputId::VigilancePushButton, true);
    let obs = h.run(HOLD_TICKS + DEBOUNCE_TICKS + 2);
    assert_eq!(obs.last.mode, OperationMode::Test);

    h.set_level(InputId::ZeroSpeed, false);
    let obs = h.run(DEBOUNCE_TICKS + 4);
    assert_eq!(obs.last.mode, OperationMode::Suppressed);
}

#[test]
fn mfault_latches_until_reset() {
    let mut h = Harness::new();
    h.enter_normal();
    // Lamp reports lit while never commanded.
    h.faithful_feedback = false;
    h.inputs.lamp_feedback = true;
    let obs = h.run(10);
    assert_eq!(obs.last.mode, OperationMode::Mfault);
    assert!(obs.last.penalty_brake);

    // Feedback recovers: mode stays latched.
    h.inputs.lamp_feedback = false;
    let obs = h.run(10);
    assert_eq!(obs.last.mode, OperationMode::Mfault);

    h.inputs.reset = true;
    h.run(1);
    h.inputs.reset = false;
    let obs = h.run(4);
    assert_ne!(obs.last.mode, OperationMode::Mfault);
}
