//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `rainbow_blink` library that handles:
//! - Command-line argument parsing
//! - Environment variable loading (.env file)
//! - Logger initialization
//! - User-facing output formatting
//!
//! All core functionality is implemented in the library crate.

use anyhow::{Context, Result};
use clap::Parser;
use std::process;

use rainbow_blink::app::print_run_summary;
use rainbow_blink::initialization::init_logger_with;
use rainbow_blink::{run_blinker, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // Load THINGSPEAK_API_KEY (and friends) from .env if present.
    // Current directory first, then next to the executable.
    if dotenvy::dotenv().is_err() {
        if let Ok(exe_path) = std::env::current_exe() {
            if let Some(exe_dir) = exe_path.parent() {
                let env_path = exe_dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                }
            }
        }
    }

    let config = Config::parse();

    let log_level = config.log_level.clone();
    let log_format = config.log_format.clone();
    init_logger_with(log_level.into(), log_format).context("Failed to initialize logger")?;

    match run_blinker(config).await {
        Ok(report) => {
            print_run_summary(report.requests_sent, report.accepted, report.elapsed_seconds);
            Ok(())
        }
        Err(e) => {
            eprintln!("rainbow_blink error: {:#}", e);
            process::exit(1);
        }
    }
}
