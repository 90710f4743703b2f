//! PWM demand supervision through the full core: movement activity,
//! transient masking with healing, and degraded operation.
//!
//! Runs at the production 64 kHz tick, where the nominal 2 ms period is
//! 128 ticks; only the input debounce is shortened to settle the cab
//! input quickly.

use vcu_common::config::VcuConfig;
use vcu_common::counter::SaturatingErrorCounter;
use vcu_common::fault::MinorFault;
use vcu_common::input::InputId;
use vcu_common::mode::OperationMode;
use vcu_common::tla::TlaKind;

use vcu_core::config::LoadedConfig;
use vcu_core::cycle::{TickInputs, TickOutputs, VcuCore};
use vcu_core::pwm::McPowerStatus;

const PERIOD: u64 = 128;

fn core() -> (VcuCore, TickInputs, u64) {
    let mut raw = VcuConfig::default();
    raw.timing.debounce_ns = 156_250; // 10 ticks
    let core = VcuCore::new(LoadedConfig::from_config(raw).unwrap());
    (core, TickInputs::default(), 0)
}

fn enter_normal(core: &mut VcuCore, inputs: &mut TickInputs, tick: &mut u64) {
    inputs.digital[InputId::CabActive.index()] = [true, true];
    let mut out = TickOutputs::default();
    for _ in 0..16 {
        out = core.tick(inputs);
        *tick += 1;
    }
    assert_eq!(out.mode, OperationMode::Normal);
}

/// Drive both channels (or just channel 1) for `n` ticks of a square
/// wave with the given high width, collecting what the core reports.
fn drive(
    core: &mut VcuCore,
    inputs: &mut TickInputs,
    tick: &mut u64,
    high: u64,
    n: u64,
    both: bool,
) -> (TickOutputs, bool) {
    let mut movement = false;
    let mut out = TickOutputs::default();
    for _ in 0..n {
        let level = *tick % PERIOD < high;
        inputs.pwm = [level, both && level];
        out = core.tick(inputs);
        movement |= out.accepted[TlaKind::McMovement.index()];
        *tick += 1;
    }
    (out, movement)
}

#[test]
fn demand_movement_is_task_linked_activity() {
    let (mut core, mut inputs, mut tick) = core();
    enter_normal(&mut core, &mut inputs, &mut tick);

    // 25% demand establishes the reference.
    let (out, movement) = drive(&mut core, &mut inputs, &mut tick, 32, 4 * PERIOD, true);
    assert_eq!(out.mc_power, McPowerStatus::Ok);
    assert!(!movement);

    // Step to 50%: a 25-point move, well past the 12.5% threshold.
    let (_, movement) = drive(&mut core, &mut inputs, &mut tick, 64, 3 * PERIOD, true);
    assert!(movement);

    // Holding 50% is not further movement.
    let (_, movement) = drive(&mut core, &mut inputs, &mut tick, 64, 3 * PERIOD, true);
    assert!(!movement);
}

#[test]
fn stalled_channel_degrades_the_pair() {
    let (mut core, mut inputs, mut tick) = core();
    let (out, _) = drive(&mut core, &mut inputs, &mut tick, 64, 4 * PERIOD, true);
    assert_eq!(out.mc_power, McPowerStatus::Ok);

    // Channel 2 freezes low; channel 1 keeps toggling.
    let (out, _) = drive(&mut core, &mut inputs, &mut tick, 64, 4 * PERIOD, false);
    assert_eq!(out.mc_power, McPowerStatus::Degraded);
}

#[test]
fn invalid_duty_masks_both_then_heals() {
    let (mut core, mut inputs, mut tick) = core();
    drive(&mut core, &mut inputs, &mut tick, 64, 4 * PERIOD, true);

    // 2% duty: valid period, invalid demand. Both channels accumulate
    // charges as the decoder falls over from one to the other.
    let (out, _) = drive(&mut core, &mut inputs, &mut tick, 2, 6 * PERIOD, true);
    assert_eq!(out.mc_power, McPowerStatus::NoPower);
    assert!(out.duty_pct.is_none());

    // Valid demand heals the transient masks cycle by cycle.
    let (out, _) = drive(&mut core, &mut inputs, &mut tick, 64, 8 * PERIOD, true);
    assert_eq!(out.mc_power, McPowerStatus::Ok);
}

#[test]
fn saturated_counters_mask_for_good() {
    let (mut core, mut inputs, mut tick) = core();
    drive(&mut core, &mut inputs, &mut tick, 64, 2 * PERIOD, true);

    // 2% duty charges both channels once per completed cycle; run the
    // 14-bit counters all the way to saturation.
    let bad_cycles = u64::from(SaturatingErrorCounter::MAX) + 8;
    let (out, _) = drive(&mut core, &mut inputs, &mut tick, 2, bad_cycles * PERIOD, true);
    assert_eq!(out.mc_power, McPowerStatus::NoPower);
    assert!(out.minor_fault.contains(MinorFault::PWM_CH1_MASKED));
    assert!(out.minor_fault.contains(MinorFault::PWM_CH2_MASKED));

    // Restored valid input no longer heals anything: the masks are
    // permanent and the demand stays unavailable.
    let (out, _) = drive(&mut core, &mut inputs, &mut tick, 64, 16 * PERIOD, true);
    assert_eq!(out.mc_power, McPowerStatus::NoPower);
    assert!(
        out.minor_fault
            .contains(MinorFault::PWM_CH1_MASKED | MinorFault::PWM_CH2_MASKED)
    );

    // Close one more clean cycle: it completes, but no channel is
    // trusted to decode the demand from.
    inputs.pwm = [true, true];
    let out = core.tick(&inputs);
    assert!(out.duty_pct.is_none());

    // Full system reset is the only path out.
    inputs.reset = true;
    core.tick(&inputs);
    inputs.reset = false;
    let (out, _) = drive(&mut core, &mut inputs, &mut tick, 64, 8 * PERIOD, true);
    assert_eq!(out.mc_power, McPowerStatus::Ok);
    assert!(!out.minor_fault.contains(MinorFault::PWM_CH1_MASKED));
}

#[test]
fn movement_ignored_outside_normal_mode() {
    let (mut core, mut inputs, mut tick) = core();
    // Cab inactive: SUPPRESSED, demand movement must not register.
    drive(&mut core, &mut inputs, &mut tick, 32, 4 * PERIOD, true);
    let (_, movement) = drive(&mut core, &mut inputs, &mut tick, 64, 3 * PERIOD, true);
    assert!(!movement);
}
