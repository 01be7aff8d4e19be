//! Rate limiter combining a pacing policy with the 429 cool-down.

use std::time::Duration;

use tokio::time::Instant;

use super::cooldown::Cooldown;
use super::pacing::{BucketPacer, TickerPacer};
use crate::config::RatePolicy;
use crate::error_handling::ConfigError;

enum Pacer {
    Ticker(TickerPacer),
    Bucket(BucketPacer),
}

/// Gates outbound flash requests.
///
/// `acquire` first waits out any active cool-down, then waits for the pacing
/// policy to grant a permit. The cool-down stalls every later `acquire`, so a
/// 429 pauses the whole dispatch loop rather than a single request.
///
/// Owned by the dispatcher and driven through `&mut self`; there is exactly one
/// consumer.
pub struct RateLimiter {
    pacer: Pacer,
    cooldown: Cooldown,
    quota: u32,
    window: Duration,
    granted: u64,
}

impl RateLimiter {
    /// Creates a rate limiter allowing `quota` requests per `window`.
    ///
    /// The bucket policy spawns its refill task, so this must be called inside
    /// a Tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ZeroSetting` if `quota` or `window` is zero, and
    /// `ConfigError::RateTooHigh` if the ticker interval would be zero.
    pub fn new(
        policy: RatePolicy,
        quota: u32,
        window: Duration,
        cooldown: Duration,
    ) -> Result<Self, ConfigError> {
        if quota == 0 {
            return Err(ConfigError::ZeroSetting("rate_quota"));
        }
        if window.is_zero() {
            return Err(ConfigError::ZeroSetting("rate_window"));
        }

        let pacer = match policy {
            RatePolicy::Ticker => {
                let period = window / quota;
                if period.is_zero() {
                    return Err(ConfigError::RateTooHigh { quota, window });
                }
                Pacer::Ticker(TickerPacer::new(period))
            }
            RatePolicy::Bucket => Pacer::Bucket(BucketPacer::start(quota as usize, window)),
        };

        Ok(RateLimiter {
            pacer,
            cooldown: Cooldown::new(cooldown),
            quota,
            window,
            granted: 0,
        })
    }

    /// Blocks until a request may be sent.
    pub async fn acquire(&mut self) {
        self.cooldown.wait().await;
        match &mut self.pacer {
            Pacer::Ticker(ticker) => ticker.acquire().await,
            Pacer::Bucket(bucket) => bucket.acquire().await,
        }
        self.granted += 1;
    }

    /// Enters the fixed cool-down after the remote site signalled a rate limit.
    ///
    /// Returns the instant at which requests may resume.
    pub fn enter_cooldown(&mut self) -> Instant {
        let deadline = self.cooldown.start();
        log::warn!(
            "Whoops, we hit the rate limit - cooling off for {}s",
            self.cooldown.duration().as_secs()
        );
        deadline
    }

    /// Time left in the current cool-down, if any.
    pub fn cooldown_remaining(&self) -> Option<Duration> {
        self.cooldown.remaining()
    }

    pub fn policy(&self) -> RatePolicy {
        match self.pacer {
            Pacer::Ticker(_) => RatePolicy::Ticker,
            Pacer::Bucket(_) => RatePolicy::Bucket,
        }
    }

    pub fn quota(&self) -> u32 {
        self.quota
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Interval between permits under the ticker policy.
    pub fn ticker_period(&self) -> Option<Duration> {
        match &self.pacer {
            Pacer::Ticker(ticker) => Some(ticker.period()),
            Pacer::Bucket(_) => None,
        }
    }

    /// Permits left in the current window under the bucket policy.
    pub fn available_budget(&self) -> Option<usize> {
        match &self.pacer {
            Pacer::Ticker(_) => None,
            Pacer::Bucket(bucket) => Some(bucket.available()),
        }
    }

    /// Total permits granted since creation.
    pub fn granted(&self) -> u64 {
        self.granted
    }

    /// Stops background work (the bucket refill task).
    pub fn shutdown(&self) {
        if let Pacer::Bucket(bucket) = &self.pacer {
            bucket.shutdown();
        }
    }
}
