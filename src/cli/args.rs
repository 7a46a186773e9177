use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// push-shell - optional push SDK bootstrap for the hybrid app shell
#[derive(Parser)]
#[command(name = "push-shell")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Directory holding shell.json and push-services.json
    #[arg(short = 'c', long, global = true)]
    pub config_dir: Option<PathBuf>,

    /// JavaScript global that receives the availability flag
    #[arg(long, global = true)]
    pub js_global: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Probe the optional SDK and report whether it is available
    Probe {
        /// Print the probe report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Run the full startup sequence against a simulated web view
    Boot {
        /// Delay before the simulated web view reports ready
        #[arg(long, default_value_t = 0, conflicts_with = "never_ready")]
        ready_after_ms: u64,

        /// Never report the web view as ready
        #[arg(long)]
        never_ready: bool,

        /// Use the SDK from a worker thread without checking availability
        #[arg(long)]
        late_use: bool,
    },
    /// Show configuration paths and whether the SDK artifact is present
    Status,
}
