//! rainbow_blink library: drives the blink lights through the rainbow
//!
//! This library scrapes the blink site's CSRF token, posts one color per request
//! in rainbow order, keeps under the site's request quota (backing off for a
//! minute when it answers 429), refreshes the token on a fixed cadence and
//! reports its request counter to ThingSpeak.
//!
//! # Example
//!
//! ```no_run
//! use rainbow_blink::{run_blinker, Config};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config {
//!     thingspeak_api_key: Some("WRITE_KEY".to_string()),
//!     ..Default::default()
//! };
//!
//! // Runs until Ctrl-C
//! let report = run_blinker(config).await?;
//! println!("Sent {} requests, {} accepted", report.requests_sent, report.accepted);
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime.

pub mod app;
pub mod colors;
pub mod config;
pub mod dispatch;
pub mod error_handling;
pub mod initialization;
pub mod rate_limiter;
pub mod telemetry;
pub mod token;

// Re-export public API
pub use colors::{Color, ColorCursor, ColorSequencer, RAINBOW};
pub use config::{Config, LogFormat, LogLevel, RatePolicy};
pub use dispatch::{DispatchSettings, Dispatcher};
pub use error_handling::{BlinkOutcome, BlinkStats, ConfigError, TokenError};
pub use rate_limiter::RateLimiter;
pub use run::{run_blinker, RunReport};
pub use telemetry::TelemetryReporter;
pub use token::{extract_csrf_token, SecurityToken, TokenFetcher};

// Internal run module (wires configuration into a running dispatcher)
mod run {
    use std::sync::Arc;
    use std::time::Instant;

    use anyhow::{Context, Result};
    use log::info;
    use tokio_util::sync::CancellationToken;

    use crate::app::{print_outcome_statistics, shutdown_gracefully, spawn_interrupt_listener};
    use crate::config::Config;
    use crate::dispatch::Dispatcher;
    use crate::error_handling::{BlinkOutcome, BlinkStats};
    use crate::initialization::init_client;

    /// Results of a blink session.
    #[derive(Debug, Clone)]
    pub struct RunReport {
        /// Flash requests that reached the server
        pub requests_sent: u64,
        /// Flash requests the server accepted
        pub accepted: usize,
        /// Wall-clock duration of the session
        pub elapsed_seconds: f64,
    }

    /// Runs the blink loop until Ctrl-C.
    ///
    /// Validates `config`, builds the shared HTTP client and dispatcher, fetches
    /// the initial CSRF token and then dispatches batches of flash requests.
    ///
    /// # Errors
    ///
    /// Fails before dispatching anything if the configuration is invalid, the
    /// ThingSpeak API key is missing, the HTTP client cannot be built or the
    /// initial CSRF token cannot be fetched. Once running, per-request failures
    /// are logged and counted, never returned.
    pub async fn run_blinker(config: Config) -> Result<RunReport> {
        // Includes the API key, so a missing key fails before any network traffic
        config.validate().context("Invalid configuration")?;

        let client = init_client(&config).context("Failed to initialize HTTP client")?;
        let stats = Arc::new(BlinkStats::new());
        let mut dispatcher = Dispatcher::from_config(&config, client, Arc::clone(&stats))
            .context("Failed to set up the dispatcher")?;

        let site_url = config.site_url()?;
        if let Err(e) = dispatcher.prime().await {
            dispatcher.shutdown().await;
            return Err(e).with_context(|| format!("Failed to fetch CSRF token from {site_url}"));
        }

        let start_time = Instant::now();
        let cancel = CancellationToken::new();
        let interrupt_listener = spawn_interrupt_listener(cancel.clone());

        info!("Flashing the rainbow at {} (Ctrl-C to stop)", site_url);
        dispatcher.run_until_cancelled(&cancel).await;

        shutdown_gracefully(cancel, &mut dispatcher, Some(interrupt_listener)).await;

        print_outcome_statistics(&stats);

        Ok(RunReport {
            requests_sent: dispatcher.request_count(),
            accepted: stats.count(BlinkOutcome::Accepted),
            elapsed_seconds: start_time.elapsed().as_secs_f64(),
        })
    }
}
