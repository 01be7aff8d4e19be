//! Configuration types and CLI options.
//!
//! This module defines enums and structs used for command-line argument parsing
//! and configuration.

use std::time::Duration;

use clap::{Parser, ValueEnum};
use url::Url;

use crate::app::normalize_base_url;
use crate::config::constants::*;
use crate::error_handling::ConfigError;

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// Controls how log messages are formatted:
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// How outbound flash requests are paced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum RatePolicy {
    /// One permit per `window / quota`, strictly serialized.
    Ticker,
    /// `quota` permits per window, refilled to `quota` at every window boundary.
    Bucket,
}

impl RatePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            RatePolicy::Ticker => "ticker",
            RatePolicy::Bucket => "bucket",
        }
    }
}

/// Runtime configuration.
///
/// Parsed from the command line with environment-variable fallbacks (a `.env`
/// file is loaded by the binary before parsing). Can also be constructed
/// programmatically via `Default`.
///
/// # Examples
///
/// ```no_run
/// use rainbow_blink::Config;
///
/// let config = Config {
///     thingspeak_api_key: Some("XXXXXXXXXXXXXXXX".to_string()),
///     rate_quota: 10,
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone, Parser)]
#[command(
    name = "rainbow_blink",
    version,
    about = "Cycles the blink lights through the rainbow without tripping the site's rate limit"
)]
pub struct Config {
    /// ThingSpeak write API key used to report the request counter
    #[arg(long, env = "THINGSPEAK_API_KEY", hide_env_values = true)]
    pub thingspeak_api_key: Option<String>,

    /// Base URL of the blink site (token page; `flash` is resolved against it)
    #[arg(long, env = "BLINK_SITE_URL", default_value = DEFAULT_SITE_URL)]
    pub site_url: String,

    /// ThingSpeak update endpoint
    #[arg(long, env = "THINGSPEAK_UPDATE_URL", default_value = DEFAULT_TELEMETRY_URL)]
    pub telemetry_url: String,

    /// Pacing policy for flash requests
    #[arg(long, value_enum, default_value_t = RatePolicy::Ticker)]
    pub rate_policy: RatePolicy,

    /// Flash requests allowed per window
    #[arg(long, default_value_t = DEFAULT_RATE_QUOTA)]
    pub rate_quota: u32,

    /// Length of the pacing window in seconds
    #[arg(long, default_value_t = DEFAULT_RATE_WINDOW_SECS)]
    pub rate_window_secs: u64,

    /// Pause in seconds after the site answers 429
    #[arg(long, default_value_t = DEFAULT_COOLDOWN_SECS)]
    pub cooldown_secs: u64,

    /// Fetch a fresh CSRF token every N sent requests
    #[arg(long, default_value_t = DEFAULT_TOKEN_REFRESH_EVERY)]
    pub token_refresh_every: u64,

    /// Report the request counter every N sent requests
    #[arg(long, default_value_t = DEFAULT_TELEMETRY_EVERY)]
    pub telemetry_every: u64,

    /// Requests per batch of the dispatch loop
    #[arg(long, default_value_t = DEFAULT_BATCH_SIZE)]
    pub batch_size: usize,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_seconds: u64,

    /// HTTP User-Agent header value
    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Log level
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Log format
    #[arg(long, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            thingspeak_api_key: None,
            site_url: DEFAULT_SITE_URL.to_string(),
            telemetry_url: DEFAULT_TELEMETRY_URL.to_string(),
            rate_policy: RatePolicy::Ticker,
            rate_quota: DEFAULT_RATE_QUOTA,
            rate_window_secs: DEFAULT_RATE_WINDOW_SECS,
            cooldown_secs: DEFAULT_COOLDOWN_SECS,
            token_refresh_every: DEFAULT_TOKEN_REFRESH_EVERY,
            telemetry_every: DEFAULT_TELEMETRY_EVERY,
            batch_size: DEFAULT_BATCH_SIZE,
            timeout_seconds: DEFAULT_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
        }
    }
}

impl Config {
    /// Returns the ThingSpeak API key, or `MissingApiKey` if it is unset or blank.
    pub fn api_key(&self) -> Result<&str, ConfigError> {
        match self.thingspeak_api_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => Ok(key),
            _ => Err(ConfigError::MissingApiKey),
        }
    }

    /// Parsed site URL, always ending in `/` so `flash` joins beneath it.
    pub fn site_url(&self) -> Result<Url, ConfigError> {
        normalize_base_url(&self.site_url, true)
    }

    pub fn flash_url(&self) -> Result<Url, ConfigError> {
        let site = self.site_url()?;
        site.join(FLASH_PATH)
            .map_err(|source| ConfigError::InvalidUrl {
                url: format!("{site}{FLASH_PATH}"),
                source,
            })
    }

    pub fn telemetry_url(&self) -> Result<Url, ConfigError> {
        normalize_base_url(&self.telemetry_url, false)
    }

    pub fn rate_window(&self) -> Duration {
        Duration::from_secs(self.rate_window_secs)
    }

    pub fn cooldown(&self) -> Duration {
        Duration::from_secs(self.cooldown_secs)
    }

    /// Checks every setting once so that misconfiguration aborts at startup
    /// instead of surfacing in the middle of the dispatch loop.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.api_key()?;
        self.flash_url()?;
        self.telemetry_url()?;
        if self.rate_quota == 0 {
            return Err(ConfigError::ZeroSetting("rate_quota"));
        }
        if self.rate_window_secs == 0 {
            return Err(ConfigError::ZeroSetting("rate_window_secs"));
        }
        if self.rate_policy == RatePolicy::Ticker && (self.rate_window() / self.rate_quota).is_zero()
        {
            return Err(ConfigError::RateTooHigh {
                quota: self.rate_quota,
                window: self.rate_window(),
            });
        }
        if self.token_refresh_every == 0 {
            return Err(ConfigError::ZeroSetting("token_refresh_every"));
        }
        if self.telemetry_every == 0 {
            return Err(ConfigError::ZeroSetting("telemetry_every"));
        }
        if self.batch_size == 0 {
            return Err(ConfigError::ZeroSetting("batch_size"));
        }
        Ok(())
    }
}
