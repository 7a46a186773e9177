//! Helpers shared by the boot scenario binaries. Each scenario publishes the
//! process-wide flag and arms the panic hook, so each lives in its own file.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;

use push_shell::error::HandoffError;
use push_shell::handoff::availability_script;
use push_shell::{availability, RuntimeHandoff, StartupContext, StartupState, WebRuntime};

#[derive(Default)]
pub struct RecordingRuntime {
    scripts: Mutex<Vec<String>>,
}

impl RecordingRuntime {
    pub fn scripts(&self) -> Vec<String> {
        self.scripts.lock().unwrap().clone()
    }
}

impl WebRuntime for RecordingRuntime {
    fn evaluate_script(&self, script: &str) -> Result<(), HandoffError> {
        self.scripts.lock().unwrap().push(script.to_string());
        Ok(())
    }
}

/// Run startup, fire view-ready `ready_signals` times and return what the web
/// runtime saw.
pub async fn boot(ctx: &mut StartupContext, ready_signals: usize) -> (StartupState, Vec<String>) {
    let state = ctx.ensure_all();
    assert!(availability::has_published());
    assert_eq!(state.availability, availability::current());

    let runtime = Arc::new(RecordingRuntime::default());
    let handoff = Arc::new(RuntimeHandoff::new(
        state.availability,
        ctx.config().js_global.clone(),
    ));
    let (tx, rx) = mpsc::unbounded_channel();
    let task = Arc::clone(&handoff).spawn(rx, runtime.clone());

    for _ in 0..ready_signals {
        tx.send(()).unwrap();
    }
    drop(tx);

    let delivered = task.await.unwrap();
    assert_eq!(delivered, ready_signals > 0);
    (state, runtime.scripts())
}

/// The one script a booted shell is expected to inject
pub fn expected_script(ctx: &StartupContext) -> String {
    availability_script(&ctx.config().js_global, availability::current())
}

#[cfg(feature = "push-sdk")]
pub fn write_artifact(dir: &std::path::Path) {
    std::fs::write(
        dir.join(push_shell::sdk::push::CONFIG_ARTIFACT),
        r#"{
            "project_id": "club-app",
            "app_id": "1:1234:android:abcd",
            "api_key": "AIzaTest",
            "sender_id": "1234"
        }"#,
    )
    .unwrap();
}
