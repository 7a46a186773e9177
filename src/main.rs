use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

mod cli;
mod command;

use cli::{Cli, Commands};
use push_shell::ShellConfig;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = ShellConfig::resolve(cli.config_dir, cli.js_global)
        .context("Failed to resolve shell configuration")?;

    match cli.command {
        Some(Commands::Probe { json }) => {
            command::run_probe(config, json).await?;
        }
        Some(Commands::Boot {
            ready_after_ms,
            never_ready,
            late_use,
        }) => {
            command::run_boot(config, ready_after_ms, never_ready, late_use).await?;
        }
        Some(Commands::Status) => {
            command::run_status(config).await?;
        }
        None => {
            // No command specified, show help
            eprintln!("No command specified. Use --help for usage information.");
            eprintln!("Use 'push-shell boot' to run the startup sequence.");
        }
    }

    Ok(())
}
