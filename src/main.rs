// SPDX-License-Identifier: GPL-3.0-only

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod cli;

#[derive(Parser)]
#[command(name = "codescan")]
#[command(about = "Barcode scanning demo: camera negotiation and single-shot scan sessions")]
#[command(version)]
struct Cli {
    /// User-agent reported to the camera negotiator (overrides config)
    #[arg(long, global = true)]
    user_agent: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Negotiate camera access and list video input devices
    Devices,

    /// Run a single-shot scan session over image files
    Scan {
        /// Device id to bind (from 'codescan devices')
        #[arg(short, long)]
        device: Option<String>,

        /// Image files to scan as frames, in order
        #[arg(required = true)]
        input: Vec<PathBuf>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    // Set RUST_LOG environment variable to control log level
    // Examples: RUST_LOG=debug, RUST_LOG=codescan=debug, RUST_LOG=info
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(true)
        .with_level(true)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Devices => cli::list_devices(cli.user_agent),
        Commands::Scan { device, input } => cli::run_scan(device, input, cli.user_agent),
    }
}
