//! Fault records, classification and process-wide containment.
//!
//! A fault is a panic. Its causal chain is the `Error::source()` chain of the
//! panic payload when the payload is an error, or a single synthetic cause
//! for plain string panics.

use std::any::Any;
use std::error::Error;
use std::fmt;
use std::panic::PanicHookInfo;

use crate::error::{IllegalState, SdkError};

mod chain;
mod classifier;
mod policy;

pub use chain::{Disposition, FaultInterceptor, HandlerChain, Outcome};
pub use classifier::{FaultClassifier, UnconfiguredSdkInterceptor};
pub use policy::{arm, policy_state, Arming, PolicyState};

/// Substring the push SDK's use-before-init guard puts in its message.
pub const UNCONFIGURED_MARKER: &str = "Default PushApp is not initialized";

/// Type tag of a single cause in a causal chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultKind {
    /// Raised by a state guard (`IllegalState` or `SdkError::IllegalState`)
    IllegalState,
    /// Any other error value
    Error,
    /// Panic with a non-error payload
    Panic,
}

/// One link in a causal chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaultCause {
    pub kind: FaultKind,
    pub message: Option<String>,
}

impl FaultCause {
    pub fn new(kind: FaultKind, message: Option<String>) -> Self {
        Self { kind, message }
    }

    fn from_error(err: &(dyn Error + 'static)) -> Self {
        let illegal_state = err.downcast_ref::<IllegalState>().is_some()
            || err
                .downcast_ref::<SdkError>()
                .is_some_and(SdkError::is_illegal_state);

        let kind = if illegal_state {
            FaultKind::IllegalState
        } else {
            FaultKind::Error
        };

        Self::new(kind, Some(err.to_string()))
    }
}

/// A fault plus its causal chain, outermost cause first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FaultRecord {
    pub chain: Vec<FaultCause>,
    pub thread: Option<String>,
    pub location: Option<String>,
}

impl FaultRecord {
    pub fn from_causes(chain: Vec<FaultCause>) -> Self {
        Self {
            chain,
            ..Self::default()
        }
    }

    /// Walk `err` and every nested `source()` until the chain ends.
    pub fn from_error(err: &(dyn Error + 'static)) -> Self {
        let chain = std::iter::successors(Some(err), |e| (*e).source())
            .map(FaultCause::from_error)
            .collect();
        Self::from_causes(chain)
    }

    /// Build a record from a panic payload.
    pub fn from_payload(payload: &(dyn Any + Send)) -> Self {
        if let Some(err) = payload.downcast_ref::<SdkError>() {
            return Self::from_error(err);
        }
        if let Some(err) = payload.downcast_ref::<IllegalState>() {
            return Self::from_error(err);
        }
        if let Some(err) = payload.downcast_ref::<anyhow::Error>() {
            let chain = err.chain().map(FaultCause::from_error).collect();
            return Self::from_causes(chain);
        }
        if let Some(err) = payload.downcast_ref::<Box<dyn Error + Send + Sync>>() {
            return Self::from_error(&**err);
        }

        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            Some((*s).to_string())
        } else {
            payload.downcast_ref::<String>().cloned()
        };
        Self::from_causes(vec![FaultCause::new(FaultKind::Panic, message)])
    }

    /// Build a record for a panic observed by the panic hook.
    pub fn from_panic(info: &PanicHookInfo<'_>) -> Self {
        let mut record = Self::from_payload(info.payload());
        record.thread = std::thread::current().name().map(str::to_string);
        record.location = info.location().map(|l| l.to_string());
        record
    }
}

impl fmt::Display for FaultRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let outermost = self
            .chain
            .first()
            .and_then(|c| c.message.as_deref())
            .unwrap_or("<no message>");
        write!(f, "{}", outermost)?;
        if let Some(thread) = &self.thread {
            write!(f, " (thread '{}'", thread)?;
            if let Some(location) = &self.location {
                write!(f, " at {}", location)?;
            }
            write!(f, ")")?;
        }
        Ok(())
    }
}
