//! # VCU Supervision Core Library
//!
//! Cycle-accurate logical re-implementation of the railway Vehicle/
//! Vigilance Control Unit input-supervision and vigilance-timing core.
//! Provides a deterministic tick that qualifies noisy dual/single-channel
//! digital inputs and PWM-encoded analog demand, self-tests and
//! permanently masks failed channels, and drives the vigilance timing
//! state machine toward warnings and the penalty state.
//!
//! ## Tick phases
//!
//! 1. **Sample**: raw channel levels, PWM levels, analog comparators
//! 2. **Qualify**: debounce, dual-channel compare, self-test masking
//! 3. **Supervise**: PWM pipeline, speed decode, mode decode, vigilance
//! 4. **Aggregate**: minor/major faults, diagnostic and LED codes
//! 5. **Commit**: outputs become visible; shared registers (mode, masks,
//!    timer) read by other components only reflect the previous cycle
//!
//! All runtime state is fixed-size and pre-allocated; the tick performs
//! zero heap allocations.

#![deny(clippy::disallowed_types)]

pub mod config;
pub mod cycle;
pub mod fault;
pub mod input;
pub mod mode;
pub mod pwm;
pub mod speed;
pub mod vigilance;
