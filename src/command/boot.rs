use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::sync::mpsc;
use tracing::info;

use push_shell::handoff::ConsoleRuntime;
use push_shell::{RuntimeHandoff, ShellConfig, StartupContext};

pub async fn run_boot(
    config: ShellConfig,
    ready_after_ms: u64,
    never_ready: bool,
    late_use: bool,
) -> Result<()> {
    let js_global = config.js_global.clone();
    let mut ctx = StartupContext::new(config);
    let state = ctx.ensure_all();

    println!(
        "Startup complete: available={}, containment={:?}",
        state.availability, state.policy
    );
    info!(
        "Process {} session {}",
        ctx.process().pid,
        ctx.process().session_id
    );

    let worker = if late_use {
        spawn_late_use(&ctx)?
    } else {
        None
    };

    let handoff = Arc::new(RuntimeHandoff::new(state.availability, js_global));
    let (ready_tx, ready_rx) = mpsc::unbounded_channel();
    let task = Arc::clone(&handoff).spawn(ready_rx, Arc::new(ConsoleRuntime));

    if never_ready {
        info!("Simulated web view will never become ready");
    } else {
        tokio::time::sleep(Duration::from_millis(ready_after_ms)).await;
        // A closed receiver only means the handoff task is gone
        let _ = ready_tx.send(());
    }
    drop(ready_tx);

    let delivered = task.await.context("Handoff task failed")?;
    if !delivered {
        println!("⚠️  Availability was not handed off; the UI will treat it as unknown.");
    }

    if let Some(worker) = worker {
        match worker.join() {
            Ok(()) => println!("✅ Push worker finished"),
            Err(_) => println!("🛡️  Push worker stopped; its fault was contained"),
        }
    }

    Ok(())
}

/// Spawn a thread that uses the SDK without consulting availability, the way
/// a careless plugin would.
fn spawn_late_use(ctx: &StartupContext) -> Result<Option<JoinHandle<()>>> {
    let Some(driver) = ctx.registry().resolve(&ctx.config().sdk_name) else {
        println!("No '{}' driver in this build; skipping late use", ctx.config().sdk_name);
        return Ok(None);
    };

    let handle = std::thread::Builder::new()
        .name("push-registration".to_string())
        .spawn(move || {
            if let Err(e) = driver.default_instance() {
                std::panic::panic_any(e);
            }
        })
        .context("Failed to spawn push worker")?;

    Ok(Some(handle))
}
