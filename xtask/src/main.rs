// Desktop/tooling crate: unwrap/expect/panic acceptable in non-embedded code.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod check;
mod decode;
mod flash;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "ramscope development tasks", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Flash the demo firmware to STM32H7 hardware via probe-rs
    Flash {
        /// Build and flash release version
        #[arg(short, long)]
        release: bool,
        /// Flash with the monitor compiled out
        #[arg(long)]
        no_monitor: bool,
    },
    /// Check embedded builds (monitor on and off), no_std crates, lints and formatting
    Check,
    /// Run all tests (unit, integration, compiled-out, and doc)
    Test {
        /// Run only unit tests
        #[arg(long)]
        unit: bool,
        /// Run only integration tests
        #[arg(long)]
        integration: bool,
    },
    /// Decode a captured telemetry stream (raw bytes from the serial port)
    Decode {
        /// Capture file, e.g. from `cat /dev/ttyACM0 > capture.bin`
        input: std::path::PathBuf,
        /// Print only the summary, not every frame
        #[arg(long)]
        summary: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Flash {
            release,
            no_monitor,
        } => flash::run(release, no_monitor),
        Commands::Check => check::run(),
        Commands::Test { unit, integration } => test::run(unit, integration),
        Commands::Decode { input, summary } => decode::run(&input, summary),
    }
}
