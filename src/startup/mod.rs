//! Startup: probe the optional SDK, publish its availability, arm fault
//! containment.

mod ensure;
mod probe;

pub use ensure::{StartupContext, StartupState, StepStatus};
pub use probe::{probe, ProbeOutcome, ProbeReport};
