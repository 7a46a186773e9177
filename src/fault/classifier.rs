use tracing::error;

use super::chain::{Disposition, FaultInterceptor};
use super::{FaultKind, FaultRecord, UNCONFIGURED_MARKER};

/// Recognizes the "optional SDK used before initialization" signature.
///
/// Only an illegal-state cause whose message contains the marker counts, so
/// unrelated illegal-state faults still reach the crash reporter.
#[derive(Debug, Clone)]
pub struct FaultClassifier {
    marker: String,
}

impl FaultClassifier {
    pub fn new(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
        }
    }

    pub fn marker(&self) -> &str {
        &self.marker
    }

    pub fn matches(&self, fault: &FaultRecord) -> bool {
        fault.chain.iter().any(|cause| {
            cause.kind == FaultKind::IllegalState
                && cause
                    .message
                    .as_deref()
                    .is_some_and(|m| m.contains(self.marker.as_str()))
        })
    }
}

impl Default for FaultClassifier {
    fn default() -> Self {
        Self::new(UNCONFIGURED_MARKER)
    }
}

/// Interceptor that claims faults raised by an unconfigured optional SDK.
#[derive(Debug, Clone)]
pub struct UnconfiguredSdkInterceptor {
    classifier: FaultClassifier,
    /// Where the missing configuration artifact belongs, for the log line
    hint: String,
}

impl UnconfiguredSdkInterceptor {
    pub fn new(classifier: FaultClassifier, hint: impl Into<String>) -> Self {
        Self {
            classifier,
            hint: hint.into(),
        }
    }
}

impl FaultInterceptor for UnconfiguredSdkInterceptor {
    fn name(&self) -> &str {
        "unconfigured-sdk"
    }

    fn intercept(&self, fault: &FaultRecord) -> Disposition {
        if !self.classifier.matches(fault) {
            return Disposition::Pass;
        }

        error!(
            "Push SDK not configured - push notifications disabled. {}. Fault: {}",
            self.hint, fault
        );
        Disposition::Claimed
    }
}
