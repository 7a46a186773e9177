//! Startup sequence for the shell.
//!
//! ```text
//! probe()      // bring up the optional SDK, never fails
//! publish()    // write the process-wide availability flag
//! arm()        // install fault containment around the current panic hook
//! ```
//!
//! Everything runs synchronously on the startup thread so the flag is written
//! before anything reads it and the containment gap stays as small as it can.
//!
//! The probe runs at most once per process. Any later context reuses the
//! first report and never touches its own drivers.

use std::sync::OnceLock;

use serde::Serialize;
use tracing::{info, warn};

use super::probe::{probe, ProbeReport};
use crate::availability::{self, Availability};
use crate::config::ShellConfig;
use crate::fault::{self, FaultClassifier, PolicyState, UnconfiguredSdkInterceptor};

/// Report of the one probe this process runs
static PROBE_REPORT: OnceLock<ProbeReport> = OnceLock::new();
use crate::sdk::{ProcessContext, SdkRegistry};

/// State of each startup step
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    #[default]
    NotStarted,
    InProgress,
    Success,
    Failed(String),
}

impl StepStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, StepStatus::Success)
    }
}

/// What startup produced
#[derive(Debug, Clone, Serialize)]
pub struct StartupState {
    pub availability: Availability,
    pub report: ProbeReport,
    pub policy: PolicyState,
}

/// Startup context owning the configuration and driver registry.
///
/// # Example
/// ```ignore
/// let mut ctx = StartupContext::new(config);
/// let state = ctx.ensure_all();
/// let handoff = RuntimeHandoff::new(state.availability, &config.js_global);
/// ```
pub struct StartupContext {
    config: ShellConfig,
    process: ProcessContext,
    registry: SdkRegistry,
    probe_status: StepStatus,
    policy_status: StepStatus,
}

impl StartupContext {
    /// Create a context with every driver compiled into this build.
    pub fn new(config: ShellConfig) -> Self {
        let process = ProcessContext::new(&config.config_dir);
        let registry = SdkRegistry::discover(&process);
        Self::with_registry(config, process, registry)
    }

    pub fn with_registry(
        config: ShellConfig,
        process: ProcessContext,
        registry: SdkRegistry,
    ) -> Self {
        Self {
            config,
            process,
            registry,
            probe_status: StepStatus::NotStarted,
            policy_status: StepStatus::NotStarted,
        }
    }

    pub fn config(&self) -> &ShellConfig {
        &self.config
    }

    pub fn process(&self) -> &ProcessContext {
        &self.process
    }

    pub fn registry(&self) -> &SdkRegistry {
        &self.registry
    }

    /// Probe the configured optional SDK.
    ///
    /// An unavailable SDK marks the step failed but is not an error. Only the
    /// first call in a process probes; later calls return that report.
    pub fn ensure_probe(&mut self) -> ProbeReport {
        self.probe_once(&PROBE_REPORT)
    }

    fn probe_once(&mut self, slot: &OnceLock<ProbeReport>) -> ProbeReport {
        self.probe_status = StepStatus::InProgress;

        let mut probed = false;
        let report = slot
            .get_or_init(|| {
                probed = true;
                info!("🔌 Probing optional SDK '{}'...", self.config.sdk_name);
                probe(&self.registry, &self.config.sdk_name, &self.process)
            })
            .clone();

        if !probed {
            warn!(
                "Optional SDK was already probed in this process (session {}). Reusing that result.",
                report.session_id
            );
        }

        self.probe_status = if report.availability.is_available() {
            info!("✅ Optional SDK available");
            StepStatus::Success
        } else {
            warn!("⚠️  Optional SDK unavailable; push features disabled");
            StepStatus::Failed(format!("{:?}", report.outcome))
        };

        report
    }

    /// Arm process-wide fault containment.
    ///
    /// Fails the step when an earlier startup already armed it, since this
    /// context's hint is then never installed.
    pub fn ensure_policy(&mut self) -> PolicyState {
        info!("🛡️  Arming fault containment...");
        self.policy_status = StepStatus::InProgress;

        let hint = format!(
            "Add {} to {} to enable push",
            artifact_name(),
            self.config.config_dir.display()
        );
        let interceptor = UnconfiguredSdkInterceptor::new(FaultClassifier::default(), hint);

        self.policy_status = if fault::arm(interceptor).installed() {
            StepStatus::Success
        } else {
            StepStatus::Failed("fault containment was armed by an earlier startup".to_string())
        };
        fault::policy_state()
    }

    /// Run every startup step in order.
    ///
    /// The returned availability is the published process flag, so it always
    /// agrees with [`availability::is_available`].
    pub fn ensure_all(&mut self) -> StartupState {
        // Step 1: probe
        let report = self.ensure_probe();

        // Step 2: publish before anything else can read the flag
        availability::publish(report.availability);

        // Step 3: arm containment right after, on the same thread
        let policy = self.ensure_policy();

        StartupState {
            availability: availability::current(),
            report,
            policy,
        }
    }

    pub fn probe_status(&self) -> &StepStatus {
        &self.probe_status
    }

    pub fn policy_status(&self) -> &StepStatus {
        &self.policy_status
    }
}

#[cfg(feature = "push-sdk")]
fn artifact_name() -> &'static str {
    crate::sdk::push::CONFIG_ARTIFACT
}

#[cfg(not(feature = "push-sdk"))]
fn artifact_name() -> &'static str {
    "the SDK configuration artifact"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SdkError;
    use crate::sdk::{OptionalSdk, SdkInstance, DEFAULT_INSTANCE_NAME, PUSH_SDK_NAME};
    use crate::startup::ProbeOutcome;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_step_status() {
        let status = StepStatus::default();
        assert!(!status.is_success());
        assert!(StepStatus::Success.is_success());
        assert!(!StepStatus::Failed("absent".to_string()).is_success());
    }

    fn context(registry: SdkRegistry) -> StartupContext {
        let config = ShellConfig::with_dir("/nonexistent");
        let process = ProcessContext::new(&config.config_dir);
        StartupContext::with_registry(config, process, registry)
    }

    #[test]
    fn test_ensure_probe_with_empty_registry() {
        let mut ctx = context(SdkRegistry::new());

        assert_eq!(ctx.probe_status(), &StepStatus::NotStarted);
        let report = ctx.probe_once(&OnceLock::new());

        assert_eq!(report.outcome, ProbeOutcome::Absent);
        assert!(matches!(ctx.probe_status(), StepStatus::Failed(_)));
        assert_eq!(ctx.policy_status(), &StepStatus::NotStarted);
    }

    /// Driver that comes up and counts how often it is initialized
    #[derive(Default)]
    struct CountingSdk {
        init_calls: AtomicUsize,
    }

    impl OptionalSdk for CountingSdk {
        fn list_initialized_instances(
            &self,
            _ctx: &ProcessContext,
        ) -> Result<Vec<SdkInstance>, SdkError> {
            Ok(Vec::new())
        }

        fn initialize(&self, _ctx: &ProcessContext) -> Result<SdkInstance, SdkError> {
            self.init_calls.fetch_add(1, Ordering::SeqCst);
            self.default_instance()
        }

        fn default_instance(&self) -> Result<SdkInstance, SdkError> {
            Ok(SdkInstance {
                name: DEFAULT_INSTANCE_NAME.to_string(),
                project_id: "club-app".to_string(),
            })
        }
    }

    #[test]
    fn test_second_context_reuses_first_report() {
        let slot = OnceLock::new();

        let mut first = context(SdkRegistry::new());
        let first_report = first.probe_once(&slot);
        assert!(!first_report.availability.is_available());

        let sdk = Arc::new(CountingSdk::default());
        let mut registry = SdkRegistry::new();
        registry.register(PUSH_SDK_NAME, sdk.clone());
        let mut second = context(registry);
        let second_report = second.probe_once(&slot);

        assert_eq!(sdk.init_calls.load(Ordering::SeqCst), 0);
        assert_eq!(second_report.session_id, first_report.session_id);
        assert_eq!(second_report.outcome, ProbeOutcome::Absent);
        assert!(matches!(second.probe_status(), StepStatus::Failed(_)));
    }

    #[cfg(feature = "push-sdk")]
    #[test]
    fn test_ensure_probe_with_push_artifact() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(
            tmp.path().join(crate::sdk::push::CONFIG_ARTIFACT),
            r#"{"project_id": "club-app", "app_id": "1:1:android:1", "api_key": "k"}"#,
        )
        .unwrap();

        let mut ctx = StartupContext::new(ShellConfig::with_dir(tmp.path()));
        let report = ctx.probe_once(&OnceLock::new());

        assert!(report.availability.is_available());
        assert!(ctx.probe_status().is_success());
    }
}
