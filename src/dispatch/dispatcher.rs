//! The blink dispatch loop.

use std::sync::Arc;
use std::time::Instant;

use log::{debug, info, warn};
use serde::Serialize;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use url::Url;

use super::settings::DispatchSettings;
use crate::app::log_progress;
use crate::colors::{Color, ColorCursor, ColorSequencer};
use crate::config::{Config, CSRF_HEADER};
use crate::error_handling::{
    categorize_flash_error, categorize_flash_status, BlinkOutcome, BlinkStats, ConfigError,
    TokenError,
};
use crate::initialization::init_rate_limiter;
use crate::rate_limiter::RateLimiter;
use crate::telemetry::TelemetryReporter;
use crate::token::{SecurityToken, TokenFetcher};

#[derive(Serialize)]
struct FlashRequest {
    color: Color,
}

/// Owns all session state and sends flash requests one at a time.
///
/// Requests are strictly serialized: each cycle waits for the rate limiter,
/// optionally refreshes the CSRF token, sends one color and only then returns.
/// Token, counter, color cursor and rate budget are plain fields mutated
/// through `&mut self`.
pub struct Dispatcher {
    client: Arc<reqwest::Client>,
    flash_url: Url,
    limiter: RateLimiter,
    fetcher: TokenFetcher,
    telemetry: TelemetryReporter,
    settings: DispatchSettings,
    stats: Arc<BlinkStats>,
    colors: ColorSequencer,
    token: Option<SecurityToken>,
    /// Set after a 500; forces a refresh before the next request.
    refresh_pending: bool,
    /// Request count at which the cadence refresh last ran.
    refreshed_at: Option<u64>,
    request_count: u64,
    reports: Vec<JoinHandle<()>>,
}

impl Dispatcher {
    /// Creates a dispatcher from its parts. No token is held until `prime`
    /// or `set_token` is called. Zero cadences in `settings` are raised to 1.
    #[allow(clippy::too_many_arguments)] // All arguments are necessary for dispatcher setup
    pub fn new(
        client: Arc<reqwest::Client>,
        flash_url: Url,
        limiter: RateLimiter,
        fetcher: TokenFetcher,
        telemetry: TelemetryReporter,
        settings: DispatchSettings,
        stats: Arc<BlinkStats>,
    ) -> Self {
        Dispatcher {
            client,
            flash_url,
            limiter,
            fetcher,
            telemetry,
            settings: settings.clamped(),
            stats,
            colors: ColorSequencer::new(),
            token: None,
            refresh_pending: false,
            refreshed_at: None,
            request_count: 0,
            reports: Vec::new(),
        }
    }

    /// Builds a dispatcher with every endpoint and cadence taken from `config`.
    ///
    /// Must be called inside a Tokio runtime (the bucket policy spawns its
    /// refill task).
    pub fn from_config(
        config: &Config,
        client: Arc<reqwest::Client>,
        stats: Arc<BlinkStats>,
    ) -> Result<Self, ConfigError> {
        let limiter = init_rate_limiter(config)?;
        let fetcher = TokenFetcher::new(Arc::clone(&client), config.site_url()?);
        let telemetry =
            TelemetryReporter::new(Arc::clone(&client), config.telemetry_url()?, config.api_key()?);
        Ok(Dispatcher::new(
            client,
            config.flash_url()?,
            limiter,
            fetcher,
            telemetry,
            DispatchSettings::from(config),
            stats,
        ))
    }

    /// Fetches the initial token and sends the baseline (zero) telemetry report.
    ///
    /// # Errors
    ///
    /// Returns the `TokenError` if the token page cannot be fetched or carries no
    /// token. At startup this is fatal: without a token no request can succeed.
    pub async fn prime(&mut self) -> Result<(), TokenError> {
        let token = self.fetcher.fetch().await?;
        info!("CSRF token acquired from {}", self.fetcher.page_url());
        self.token = Some(token);
        self.spawn_report(self.request_count);
        Ok(())
    }

    /// Replaces the held token without fetching.
    pub fn set_token(&mut self, token: SecurityToken) {
        self.token = Some(token);
    }

    pub fn token(&self) -> Option<&SecurityToken> {
        self.token.as_ref()
    }

    /// Requests that reached the server so far.
    pub fn request_count(&self) -> u64 {
        self.request_count
    }

    pub fn color_cursor(&self) -> ColorCursor {
        self.colors.cursor()
    }

    pub fn stats(&self) -> &Arc<BlinkStats> {
        &self.stats
    }

    pub fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    pub fn settings(&self) -> DispatchSettings {
        self.settings
    }

    fn refresh_due(&self) -> bool {
        if self.token.is_none() || self.refresh_pending {
            return true;
        }
        self.request_count > 0
            && self.request_count % self.settings.token_refresh_every == 0
            && self.refreshed_at != Some(self.request_count)
    }

    async fn refresh_token(&mut self) {
        info!("Fetching a new CSRF token");
        match self.fetcher.fetch().await {
            Ok(token) => self.token = Some(token),
            Err(e) => {
                // Never keep sending with a token we could not confirm
                warn!(
                    "Could not refresh CSRF token ({}); skipping flash requests until one is available",
                    e
                );
                self.token = None;
            }
        }
        self.refresh_pending = false;
        self.refreshed_at = Some(self.request_count);
    }

    fn spawn_report(&mut self, count: u64) {
        self.reports.retain(|handle| !handle.is_finished());
        self.reports.push(self.telemetry.report(count));
    }

    /// Runs one dispatch cycle and returns its outcome.
    ///
    /// 1. wait for the rate limiter (including any cool-down)
    /// 2. refresh the token if the cadence, a missing token or a prior 500 asks for it
    /// 3. send the next color, or skip if no token is held
    /// 4. on 429 enter the cool-down; on 500 schedule a token refresh
    /// 5. report the counter every `telemetry_every` sent requests
    pub async fn dispatch_once(&mut self) -> BlinkOutcome {
        self.limiter.acquire().await;

        if self.refresh_due() {
            self.refresh_token().await;
        }

        let outcome = match self.token.clone() {
            Some(token) => self.send_flash(&token).await,
            None => {
                warn!("No CSRF token held; skipping this flash request");
                BlinkOutcome::SkippedNoToken
            }
        };

        self.stats.record(outcome);
        outcome
    }

    async fn send_flash(&mut self, token: &SecurityToken) -> BlinkOutcome {
        let color = self.colors.next_color();
        let result = self
            .client
            .post(self.flash_url.clone())
            .header(CSRF_HEADER, token.as_str())
            .json(&FlashRequest { color })
            .send()
            .await;

        let outcome = match result {
            Ok(response) => {
                let status = response.status();
                let outcome = categorize_flash_status(status);
                if outcome == BlinkOutcome::Rejected {
                    warn!("Flash request for {} rejected with HTTP {}", color, status);
                }
                outcome
            }
            Err(e) => {
                warn!("Flash request for {} failed: {}", color, e);
                categorize_flash_error(&e)
            }
        };

        if !outcome.was_sent() {
            return outcome;
        }
        self.request_count += 1;

        match outcome {
            BlinkOutcome::Accepted => {
                debug!("Flashed {} (request #{})", color, self.request_count);
            }
            BlinkOutcome::RateLimited => {
                self.limiter.enter_cooldown();
            }
            BlinkOutcome::InvalidToken => {
                warn!("Whoops, we got a 500 error - the CSRF token is probably invalid; refreshing it");
                self.refresh_pending = true;
            }
            _ => {}
        }

        if self.request_count % self.settings.telemetry_every == 0 {
            self.spawn_report(self.request_count);
        }
        outcome
    }

    /// Runs `count` dispatch cycles back to back and returns how many were accepted.
    pub async fn run_batch(&mut self, count: usize) -> usize {
        let mut accepted = 0;
        for _ in 0..count {
            if self.dispatch_once().await == BlinkOutcome::Accepted {
                accepted += 1;
            }
        }
        accepted
    }

    /// Runs batches of `batch_size` until `cancel` fires.
    ///
    /// Cancellation is observed between and during cycles, so a pending
    /// cool-down does not delay shutdown.
    pub async fn run_until_cancelled(&mut self, cancel: &CancellationToken) {
        let start_time = Instant::now();
        let batch_size = self.settings.batch_size;
        loop {
            for _ in 0..batch_size {
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => {
                        info!("Dispatch loop stopping");
                        return;
                    }
                    _ = self.dispatch_once() => {}
                }
            }
            log_progress(start_time, self.request_count, &self.stats);
        }
    }

    /// Telemetry reports spawned but not yet finished.
    pub fn pending_reports(&self) -> usize {
        self.reports.iter().filter(|handle| !handle.is_finished()).count()
    }

    /// Waits for outstanding telemetry reports to finish.
    pub async fn flush_telemetry(&mut self) {
        for handle in self.reports.drain(..) {
            let _ = handle.await;
        }
    }

    /// Drains telemetry and stops the rate limiter's background work.
    pub async fn shutdown(&mut self) {
        self.flush_telemetry().await;
        self.limiter.shutdown();
    }
}
