// SPDX-License-Identifier: GPL-3.0-only

use clap::{Parser, Subcommand};
use rtc_hwaccel::HwAccelConfig;

mod cli;

#[derive(Parser)]
#[command(name = "rtc-hwaccel")]
#[command(about = "Select hardware or software video coders for the media pipeline")]
#[command(version = env!("GIT_VERSION"))]
#[command(subcommand_required = false)]
struct Cli {
    /// Enable hardware acceleration
    #[arg(long = "hw-accel")]
    hw_accel: bool,

    /// Hardware backend to use (e.g. vaapi, va, nvenc, videotoolbox, v4l2, d3d11).
    /// Auto-detected from the platform when omitted.
    #[arg(long)]
    codec: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Probe every known hardware backend and the software coders
    List {
        /// Print the listing as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Set RUST_LOG to control log level
    // Examples: RUST_LOG=debug, RUST_LOG=rtc_hwaccel=info
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
        Some(Commands::List { json }) => cli::list_backends(json),
        None => cli::activate(&HwAccelConfig::new(cli.hw_accel, cli.codec)),
    }
}
