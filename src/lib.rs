//! Bootstrap layer for a hybrid app shell.
//!
//! Brings up an optional push SDK without requiring it to be present or
//! configured, contains the panics an unconfigured SDK causes later on, and
//! hands the resulting availability to the embedded web runtime.

pub mod availability;
pub mod config;
pub mod error;
pub mod fault;
pub mod handoff;
pub mod sdk;
pub mod startup;

pub use availability::Availability;
pub use config::ShellConfig;
pub use handoff::{RuntimeHandoff, WebRuntime};
pub use startup::{StartupContext, StartupState};
