#![cfg(feature = "push-sdk")]

mod common;

use push_shell::{availability, ShellConfig, StartupContext};

use common::{boot, write_artifact};

#[tokio::test]
async fn view_never_ready_injects_nothing() {
    let tmp = tempfile::tempdir().unwrap();
    write_artifact(tmp.path());
    let mut ctx = StartupContext::new(ShellConfig::with_dir(tmp.path()));

    let (state, scripts) = boot(&mut ctx, 0).await;

    assert!(state.availability.is_available());
    assert!(availability::is_available());
    assert!(scripts.is_empty());
}
