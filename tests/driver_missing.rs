mod common;

use push_shell::sdk::{ProcessContext, SdkRegistry};
use push_shell::startup::{ProbeOutcome, StepStatus};
use push_shell::{availability, ShellConfig, StartupContext};

use common::{boot, expected_script};

#[tokio::test]
async fn driver_missing_from_build_hands_off_false() {
    let tmp = tempfile::tempdir().unwrap();
    let config = ShellConfig {
        js_global: "__pushReady".to_string(),
        ..ShellConfig::with_dir(tmp.path())
    };
    let process = ProcessContext::new(tmp.path());
    let mut ctx = StartupContext::with_registry(config, process, SdkRegistry::new());

    let (state, scripts) = boot(&mut ctx, 1).await;

    assert_eq!(state.report.outcome, ProbeOutcome::Absent);
    assert!(matches!(ctx.probe_status(), StepStatus::Failed(_)));
    assert!(!availability::is_available());
    assert_eq!(scripts, vec!["window.__pushReady = false;".to_string()]);
    assert_eq!(scripts, vec![expected_script(&ctx)]);
}
