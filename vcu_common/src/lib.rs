//! VCU Common Library
//!
//! Shared types for the railway Vehicle/Vigilance Control Unit workspace:
//! operation modes, logical input descriptors, task-linked-activity kinds,
//! saturating/persistence counters, fault bitflags, and TOML configuration.
//!
//! # Module Structure
//!
//! - [`consts`] - Timing constants and counter widths
//! - [`counter`] - Saturating error counter and persistence filter
//! - [`input`] - Logical input identities and qualification kinds
//! - [`mode`] - Operation mode enum
//! - [`tla`] - Task-linked-activity kinds and per-kind limits
//! - [`fault`] - Minor/major fault, diagnostic and LED code bitflags
//! - [`config`] - TOML configuration structs with validation
//! - [`prelude`] - Common re-exports for convenience

pub mod config;
pub mod consts;
pub mod counter;
pub mod fault;
pub mod input;
pub mod mode;
pub mod prelude;
pub mod tla;
