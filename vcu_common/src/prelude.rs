//! Common re-exports for VCU workspace crates.

pub use crate::config::VcuConfig;
pub use crate::counter::{PersistenceCounter, SaturatingErrorCounter};
pub use crate::fault::{DiagnosticCode, LedCode, MajorFault, MinorFault, PwmFault};
pub use crate::input::{Channel, ChannelArity, InputId, InputSpec, Polarity, QualificationKind};
pub use crate::mode::OperationMode;
pub use crate::tla::TlaKind;
