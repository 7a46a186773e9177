use anyhow::{Context, Result};

use push_shell::startup::{ProbeOutcome, StartupContext};
use push_shell::ShellConfig;

pub async fn run_probe(config: ShellConfig, json: bool) -> Result<()> {
    let mut ctx = StartupContext::new(config);
    let report = ctx.ensure_probe();

    if json {
        let out = serde_json::to_string_pretty(&report).context("Failed to serialize probe report")?;
        println!("{}", out);
        return Ok(());
    }

    match &report.outcome {
        ProbeOutcome::Available {
            instance,
            project_id,
        } => {
            println!("✅ Optional SDK '{}' is available", report.sdk);
            println!("   Instance: {}", instance);
            println!("   Project: {}", project_id);
        }
        ProbeOutcome::Absent => {
            println!("❌ Optional SDK '{}' is not part of this build", report.sdk);
        }
        ProbeOutcome::InitFailed(msg) => {
            println!("❌ Optional SDK '{}' failed to initialize", report.sdk);
            println!("   {}", msg);
        }
        ProbeOutcome::VerifyFailed(msg) => {
            println!("❌ Optional SDK '{}' initialized but did not verify", report.sdk);
            println!("   {}", msg);
        }
    }

    Ok(())
}
