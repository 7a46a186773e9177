//! Error types shared across the shell.
//!
//! Driver failures are plain values here. They only become faults when some
//! caller panics with one of them as the payload, which is what the fault
//! classifier inspects.

use std::path::PathBuf;

use thiserror::Error;

/// An operation was attempted while the subsystem was in the wrong state.
///
/// This is the "illegal state" kind the fault classifier looks for.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct IllegalState(pub String);

impl IllegalState {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }

    pub fn message(&self) -> &str {
        &self.0
    }
}

/// Errors raised by optional SDK drivers.
#[derive(Debug, Error)]
pub enum SdkError {
    /// The configuration artifact is not where the driver expects it
    #[error("configuration artifact not found: {}", path.display())]
    ConfigMissing { path: PathBuf },

    /// The configuration artifact exists but could not be read
    #[error("failed to read configuration artifact {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration artifact is malformed or incomplete
    #[error("invalid configuration artifact: {0}")]
    InvalidConfig(String),

    /// The driver's own state guard rejected the call
    #[error(transparent)]
    IllegalState(#[from] IllegalState),

    /// A previous panic left the driver state unusable
    #[error("driver state lock poisoned")]
    Poisoned,
}

impl SdkError {
    pub fn illegal_state(message: impl Into<String>) -> Self {
        SdkError::IllegalState(IllegalState::new(message))
    }

    pub fn is_illegal_state(&self) -> bool {
        matches!(self, SdkError::IllegalState(_))
    }
}

/// Errors resolving the shell configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not determine a configuration directory; pass --config-dir")]
    NoConfigDir,

    #[error("failed to read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("'{0}' is not a valid JavaScript identifier")]
    InvalidGlobal(String),
}

/// Errors reported by an embedded web runtime when evaluating a script.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HandoffError {
    #[error("script evaluation failed: {0}")]
    Evaluation(String),
}
