//! Handoff of the availability flag into the embedded web runtime.
//!
//! The web view signals readiness over a channel. On the first signal a single
//! `window.<global> = <bool>;` script is evaluated, fire-and-forget. Later
//! signals are ignored; if no signal ever arrives nothing is injected. The UI
//! treats a missing global as "unknown", so evaluation failures are only
//! logged.

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::availability::Availability;
use crate::error::HandoffError;

/// Script evaluation primitive of an embedded web runtime.
///
/// Implementations queue the script for asynchronous evaluation in the page's
/// global scope and return immediately.
pub trait WebRuntime: Send + Sync {
    fn evaluate_script(&self, script: &str) -> Result<(), HandoffError>;
}

/// Render the assignment injected into the web runtime
pub fn availability_script(js_global: &str, availability: Availability) -> String {
    format!("window.{} = {};", js_global, availability)
}

/// Delivers an [`Availability`] into a web runtime exactly once.
#[derive(Debug)]
pub struct RuntimeHandoff {
    availability: Availability,
    js_global: String,
    delivered: AtomicBool,
}

impl RuntimeHandoff {
    pub fn new(availability: Availability, js_global: impl Into<String>) -> Self {
        Self {
            availability,
            js_global: js_global.into(),
            delivered: AtomicBool::new(false),
        }
    }

    pub fn script(&self) -> String {
        availability_script(&self.js_global, self.availability)
    }

    pub fn is_delivered(&self) -> bool {
        self.delivered.load(Ordering::Acquire)
    }

    /// Handle a view-ready signal.
    ///
    /// Returns `true` if this call performed the injection. An evaluation
    /// error still counts as delivered: there is no retry.
    pub fn on_view_ready(&self, runtime: &dyn WebRuntime) -> bool {
        if self
            .delivered
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("View ready again; availability already handed off");
            return false;
        }

        let script = self.script();
        match runtime.evaluate_script(&script) {
            Ok(()) => info!("Handed SDK availability to web runtime: {}", script),
            Err(e) => debug!("Ignoring failed availability handoff ({}): {}", script, e),
        }
        true
    }

    /// Wait for view-ready signals on `ready` and hand off on the first one.
    ///
    /// The task ends when every sender is dropped. Its result tells whether
    /// the injection ever happened.
    pub fn spawn(
        self: Arc<Self>,
        mut ready: mpsc::UnboundedReceiver<()>,
        runtime: Arc<dyn WebRuntime>,
    ) -> JoinHandle<bool> {
        tokio::spawn(async move {
            while ready.recv().await.is_some() {
                self.on_view_ready(runtime.as_ref());
            }
            if !self.is_delivered() {
                debug!("View never became ready; availability was not handed off");
            }
            self.is_delivered()
        })
    }
}

/// Web runtime stand-in that prints scripts to stdout.
#[derive(Debug, Default)]
pub struct ConsoleRuntime;

impl WebRuntime for ConsoleRuntime {
    fn evaluate_script(&self, script: &str) -> Result<(), HandoffError> {
        let mut out = std::io::stdout().lock();
        writeln!(out, "[webview] {}", script)
            .and_then(|()| out.flush())
            .map_err(|e| HandoffError::Evaluation(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingRuntime {
        scripts: Mutex<Vec<String>>,
        fail: bool,
    }

    impl WebRuntime for RecordingRuntime {
        fn evaluate_script(&self, script: &str) -> Result<(), HandoffError> {
            self.scripts.lock().unwrap().push(script.to_string());
            if self.fail {
                Err(HandoffError::Evaluation("ReferenceError: window is not defined".to_string()))
            } else {
                Ok(())
            }
        }
    }

    #[test]
    fn test_availability_script() {
        assert_eq!(
            availability_script("__optionalSdkAvailable", Availability::UNAVAILABLE),
            "window.__optionalSdkAvailable = false;"
        );
        assert_eq!(
            availability_script("__pushReady", Availability::AVAILABLE),
            "window.__pushReady = true;"
        );
    }

    #[test]
    fn test_repeated_ready_injects_once() {
        let runtime = RecordingRuntime::default();
        let handoff = RuntimeHandoff::new(Availability::AVAILABLE, "__optionalSdkAvailable");

        assert!(handoff.on_view_ready(&runtime));
        assert!(!handoff.on_view_ready(&runtime));
        assert!(!handoff.on_view_ready(&runtime));

        assert_eq!(
            *runtime.scripts.lock().unwrap(),
            vec!["window.__optionalSdkAvailable = true;".to_string()]
        );
    }

    #[test]
    fn test_evaluation_failure_is_swallowed() {
        let runtime = RecordingRuntime {
            fail: true,
            ..RecordingRuntime::default()
        };
        let handoff = RuntimeHandoff::new(Availability::UNAVAILABLE, "__optionalSdkAvailable");

        assert!(handoff.on_view_ready(&runtime));
        assert!(handoff.is_delivered());
        assert!(!handoff.on_view_ready(&runtime));
        assert_eq!(runtime.scripts.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_console_runtime_evaluates() {
        let handoff = RuntimeHandoff::new(Availability::AVAILABLE, "__optionalSdkAvailable");
        assert!(ConsoleRuntime.evaluate_script(&handoff.script()).is_ok());
    }

    #[tokio::test]
    async fn test_spawn_delivers_after_ready() {
        let runtime = Arc::new(RecordingRuntime::default());
        let handoff = Arc::new(RuntimeHandoff::new(
            Availability::UNAVAILABLE,
            "__optionalSdkAvailable",
        ));
        let (tx, rx) = mpsc::unbounded_channel();

        let task = Arc::clone(&handoff).spawn(rx, runtime.clone());
        assert!(runtime.scripts.lock().unwrap().is_empty());

        tx.send(()).unwrap();
        tx.send(()).unwrap();
        drop(tx);

        assert!(task.await.unwrap());
        assert_eq!(
            *runtime.scripts.lock().unwrap(),
            vec!["window.__optionalSdkAvailable = false;".to_string()]
        );
    }

    #[tokio::test]
    async fn test_spawn_without_ready_injects_nothing() {
        let runtime = Arc::new(RecordingRuntime::default());
        let handoff = Arc::new(RuntimeHandoff::new(
            Availability::AVAILABLE,
            "__optionalSdkAvailable",
        ));
        let (tx, rx) = mpsc::unbounded_channel::<()>();

        let task = Arc::clone(&handoff).spawn(rx, runtime.clone());
        drop(tx);

        assert!(!task.await.unwrap());
        assert!(runtime.scripts.lock().unwrap().is_empty());
        assert!(!handoff.is_delivered());
    }
}
