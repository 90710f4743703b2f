//! Vigilance timing end to end: warning progression, primary and gated
//! resets, priority blocking, and the consecutive-reset ceilings.

use vcu_common::input::InputId;
use vcu_common::tla::TlaKind;

use vcu_core::vigilance::timer::VigilanceStage;

use super::common::{CYCLE_TICKS, DEBOUNCE_TICKS, Harness};

#[test]
fn cycle_expires_through_both_warnings() {
    let mut h = Harness::new();
    h.enter_normal();

    // Margins absorb the ticks spent settling into NORMAL.
    let obs = h.run(CYCLE_TICKS - 500 - 50);
    assert!(!obs.last.first_warning);

    let obs = h.run(100);
    assert_eq!(obs.last.stage, Some(VigilanceStage::FirstWarning));
    assert!(obs.last.first_warning && !obs.last.second_warning);
    assert!(obs.last.warning_lamp);

    let obs = h.run(250);
    assert_eq!(obs.last.stage, Some(VigilanceStage::SecondWarning));

    let obs = h.run(300);
    assert_eq!(obs.last.stage, Some(VigilanceStage::Penalty));
    assert!(obs.last.penalty_brake);
}

#[test]
fn push_button_resets_from_any_stage() {
    let mut h = Harness::new();
    h.enter_normal();
    let obs = h.run(CYCLE_TICKS - 100);
    assert!(obs.last.second_warning);

    let obs = h.press(InputId::VigilancePushButton);
    assert!(obs.vpb_accepted);
    assert!(!obs.last.first_warning);

    // A fresh full cycle before the next penalty.
    let obs = h.run(CYCLE_TICKS - 100);
    assert!(!obs.penalty_seen);
}

#[test]
fn headlight_resets_only_once_per_run() {
    let mut h = Harness::new();
    h.enter_normal();

    // Toggle on: either-edge event, first of the run, accepted.
    h.set_level(InputId::Headlight, true);
    let obs = h.run(DEBOUNCE_TICKS + 2);
    assert!(obs.accepted[TlaKind::Headlight.index()]);

    // Past the activity timeout, the ceiling still ignores the second.
    h.run(60);
    h.set_level(InputId::Headlight, false);
    let obs = h.run(DEBOUNCE_TICKS + 2);
    assert!(!obs.accepted[TlaKind::Headlight.index()]);

    // An accepted reset of another kind breaks the run.
    let obs = h.press(InputId::VigilancePushButton);
    assert!(obs.vpb_accepted);
    h.run(60);
    h.set_level(InputId::Headlight, true);
    let obs = h.run(DEBOUNCE_TICKS + 2);
    assert!(obs.accepted[TlaKind::Headlight.index()]);
}

#[test]
fn repeat_within_activity_timeout_is_ignored() {
    let mut h = Harness::new();
    h.enter_normal();

    let obs = h.press(InputId::HornLow);
    assert!(obs.accepted[TlaKind::HornLow.index()]);
    // Second press well inside the 100-tick activity timeout.
    let obs = h.press(InputId::HornLow);
    assert!(!obs.accepted[TlaKind::HornLow.index()]);
    // After the timeout has run out, the horn counts again.
    h.run(120);
    let obs = h.press(InputId::HornLow);
    assert!(obs.accepted[TlaKind::HornLow.index()]);
}

#[test]
fn horn_ceiling_is_fifteen_consecutive() {
    let mut h = Harness::new();
    h.enter_normal();

    for n in 0..15 {
        let obs = h.press(InputId::HornLow);
        assert!(obs.accepted[TlaKind::HornLow.index()], "press {n}");
        h.run(120); // clear the activity timeout
    }
    let obs = h.press(InputId::HornLow);
    assert!(!obs.accepted[TlaKind::HornLow.index()]);

    // The button breaks the run; the horn counts again.
    let obs = h.press(InputId::VigilancePushButton);
    assert!(obs.vpb_accepted);
    h.run(120);
    let obs = h.press(InputId::HornLow);
    assert!(obs.accepted[TlaKind::HornLow.index()]);
}

#[test]
fn held_horn_blocks_secondary_activity() {
    let mut h = Harness::new();
    h.enter_normal();

    // Hold the horn lever down.
    h.set_level(InputId::HornLow, true);
    h.run(DEBOUNCE_TICKS + 2);

    // Each other kind individually fails to reset while the lever is
    // held, the horn-high lever included.
    let obs = h.press(InputId::SafetyBypassAck);
    assert!(!obs.accepted[TlaKind::SafetyBypass.index()]);
    let obs = h.press(InputId::WiperWasher);
    assert!(!obs.accepted[TlaKind::Wiper.index()]);
    let obs = h.press(InputId::HornHigh);
    assert!(!obs.accepted[TlaKind::HornHigh.index()]);

    // Headlight toggles while the horn is held: discarded outright.
    h.set_level(InputId::Headlight, true);
    let obs = h.run(DEBOUNCE_TICKS + 2);
    assert!(!obs.accepted[TlaKind::Headlight.index()]);

    // Release the horn: its own compound event is accepted.
    h.set_level(InputId::HornLow, false);
    let obs = h.run(DEBOUNCE_TICKS + 2);
    assert!(obs.accepted[TlaKind::HornLow.index()]);

    // The discarded headlight event was not queued, but a fresh toggle
    // counts now that nothing is held.
    let obs = h.run(60);
    assert!(!obs.accepted[TlaKind::Headlight.index()]);
    h.set_level(InputId::Headlight, false);
    let obs = h.run(DEBOUNCE_TICKS + 2);
    assert!(obs.accepted[TlaKind::Headlight.index()]);
}

#[test]
fn no_resets_while_suppressed() {
    let mut h = Harness::new();
    // Cab inactive: activity is ignored and the timer is held.
    let obs = h.press(InputId::HornLow);
    assert!(!obs.accepted[TlaKind::HornLow.index()]);
    let obs = h.run(3 * CYCLE_TICKS);
    assert!(!obs.penalty_seen);
}
