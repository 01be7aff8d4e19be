//! Rate limiter initialization.

use log::info;

use crate::config::{Config, RatePolicy};
use crate::error_handling::ConfigError;
use crate::rate_limiter::RateLimiter;

/// Builds the rate limiter described by `config`.
///
/// Must be called inside a Tokio runtime: the bucket policy spawns its
/// refill task immediately.
///
/// # Errors
///
/// Returns `ConfigError::ZeroSetting` for a zero quota or window.
pub fn init_rate_limiter(config: &Config) -> Result<RateLimiter, ConfigError> {
    let limiter = RateLimiter::new(
        config.rate_policy,
        config.rate_quota,
        config.rate_window(),
        config.cooldown(),
    )?;

    match config.rate_policy {
        RatePolicy::Ticker => info!(
            "Rate limiting: {} requests per {}s (one every {:.2}s), {}s cool-down after 429",
            config.rate_quota,
            config.rate_window_secs,
            limiter
                .ticker_period()
                .map(|p| p.as_secs_f64())
                .unwrap_or_default(),
            config.cooldown_secs
        ),
        RatePolicy::Bucket => info!(
            "Rate limiting: bucket of {} requests refilled every {}s, {}s cool-down after 429",
            config.rate_quota, config.rate_window_secs, config.cooldown_secs
        ),
    }

    Ok(limiter)
}
