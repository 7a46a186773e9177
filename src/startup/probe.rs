//! One-shot probe of an optional SDK.
//!
//! ```text
//! resolve driver      -> Absent if no driver registered under the name
//! list instances      -> skip initialize if one already exists
//! initialize          -> InitFailed on error
//! default instance    -> VerifyFailed on error
//! ```
//!
//! Nothing escapes: driver errors and driver panics both end as an
//! unavailable report.

use std::any::Any;
use std::error::Error as _;
use std::panic::{self, AssertUnwindSafe};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::availability::Availability;
use crate::error::SdkError;
use crate::sdk::{OptionalSdk, ProcessContext, SdkInstance, SdkRegistry};

/// Why the probe ended the way it did. Diagnostics only; callers gate on
/// [`ProbeReport::availability`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum ProbeOutcome {
    Available { instance: String, project_id: String },
    /// No driver registered under the requested name
    Absent,
    InitFailed(String),
    VerifyFailed(String),
}

impl ProbeOutcome {
    pub fn is_available(&self) -> bool {
        matches!(self, ProbeOutcome::Available { .. })
    }
}

/// Result of probing an optional SDK
#[derive(Debug, Clone, Serialize)]
pub struct ProbeReport {
    pub sdk: String,
    pub outcome: ProbeOutcome,
    pub availability: Availability,
    pub session_id: Uuid,
    pub completed_at: DateTime<Utc>,
}

impl ProbeReport {
    fn new(sdk: &str, ctx: &ProcessContext, outcome: ProbeOutcome) -> Self {
        Self {
            sdk: sdk.to_string(),
            availability: Availability::new(outcome.is_available()),
            outcome,
            session_id: ctx.session_id,
            completed_at: Utc::now(),
        }
    }
}

enum StepError {
    Init(String),
    Verify(String),
}

/// Probe the SDK registered as `sdk_name`.
pub fn probe(registry: &SdkRegistry, sdk_name: &str, ctx: &ProcessContext) -> ProbeReport {
    let Some(driver) = registry.resolve(sdk_name) else {
        warn!(
            "Optional SDK '{}' is not part of this build. Push notifications will be disabled.",
            sdk_name
        );
        return ProbeReport::new(sdk_name, ctx, ProbeOutcome::Absent);
    };

    let attempt = panic::catch_unwind(AssertUnwindSafe(|| bring_up(driver.as_ref(), ctx)));

    let outcome = match attempt {
        Ok(Ok(instance)) => {
            info!(
                "Optional SDK '{}' initialized successfully (instance {}, project {})",
                sdk_name, instance.name, instance.project_id
            );
            ProbeOutcome::Available {
                instance: instance.name,
                project_id: instance.project_id,
            }
        }
        Ok(Err(StepError::Init(msg))) => {
            warn!(
                "Optional SDK '{}' not available: {}. Push notifications will be disabled.",
                sdk_name, msg
            );
            ProbeOutcome::InitFailed(msg)
        }
        Ok(Err(StepError::Verify(msg))) => {
            warn!(
                "Optional SDK '{}' failed verification: {}. Push notifications will be disabled.",
                sdk_name, msg
            );
            ProbeOutcome::VerifyFailed(msg)
        }
        Err(payload) => {
            let msg = format!("driver panicked: {}", panic_payload_to_string(&payload));
            warn!(
                "Optional SDK '{}' not available: {}. Push notifications will be disabled.",
                sdk_name, msg
            );
            ProbeOutcome::InitFailed(msg)
        }
    };

    ProbeReport::new(sdk_name, ctx, outcome)
}

fn bring_up(driver: &dyn OptionalSdk, ctx: &ProcessContext) -> Result<SdkInstance, StepError> {
    let existing = driver
        .list_initialized_instances(ctx)
        .map_err(|e| StepError::Init(describe(&e)))?;

    if existing.is_empty() {
        driver
            .initialize(ctx)
            .map_err(|e| StepError::Init(describe(&e)))?;
    }

    driver
        .default_instance()
        .map_err(|e| StepError::Verify(describe(&e)))
}

fn describe(err: &SdkError) -> String {
    let mut msg = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        msg.push_str(": ");
        msg.push_str(&cause.to_string());
        source = cause.source();
    }
    msg
}

fn panic_payload_to_string(payload: &Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else if let Some(e) = payload.downcast_ref::<SdkError>() {
        describe(e)
    } else {
        "unknown panic".to_string()
    }
}
