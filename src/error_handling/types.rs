//! Error type definitions.
//!
//! This module defines the error types used at startup and by the token fetcher,
//! plus the outcome categories tracked for every dispatched flash request.

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use reqwest::StatusCode;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),
}

/// Error types for invalid or missing configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The ThingSpeak API key was not provided.
    #[error("THINGSPEAK_API_KEY is not set (add it to .env or pass --thingspeak-api-key)")]
    MissingApiKey,

    /// A configured URL could not be parsed.
    #[error("Invalid URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// A configured URL uses a scheme other than http/https.
    #[error("Unsupported URL scheme '{scheme}' in '{url}' (expected http or https)")]
    UnsupportedScheme { url: String, scheme: String },

    /// A configured URL is longer than we accept.
    #[error("URL exceeds maximum length ({len} > {max})")]
    UrlTooLong { len: usize, max: usize },

    /// A count or duration that must be positive was zero.
    #[error("{0} must be greater than zero")]
    ZeroSetting(&'static str),

    /// The ticker interval `window / quota` rounds down to zero.
    #[error("rate_quota {quota} is too high for a {window:?} window: requests would be spaced 0ns apart")]
    RateTooHigh { quota: u32, window: std::time::Duration },
}

/// Error types for CSRF token retrieval.
#[derive(Error, Debug)]
pub enum TokenError {
    /// The token page could not be fetched or read.
    #[error("Token page request failed: {0}")]
    Request(#[from] ReqwestError),

    /// The token page answered with a non-success status.
    #[error("Token page returned HTTP {0}")]
    Status(StatusCode),

    /// The page was fetched but carries no usable `csrf-token` meta tag.
    #[error("No csrf-token meta tag found on the token page")]
    NotFound,
}

/// How a single dispatch cycle ended.
///
/// Every call to the dispatcher produces exactly one outcome, which is
/// counted in `BlinkStats`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum BlinkOutcome {
    /// 2xx: the lights changed color.
    Accepted,
    /// 429: the site's own limiter rejected us; a cool-down follows.
    RateLimited,
    /// 500: almost always a stale or invalid CSRF token.
    InvalidToken,
    /// Any other non-success status.
    Rejected,
    /// The request never produced a response (connect error, timeout, ...).
    TransportError,
    /// No usable token was held, so nothing was sent.
    SkippedNoToken,
}

impl std::fmt::Display for BlinkOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl BlinkOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            BlinkOutcome::Accepted => "Accepted",
            BlinkOutcome::RateLimited => "Rate limited (429)",
            BlinkOutcome::InvalidToken => "Invalid CSRF token (500)",
            BlinkOutcome::Rejected => "Rejected (other status)",
            BlinkOutcome::TransportError => "Transport error",
            BlinkOutcome::SkippedNoToken => "Skipped (no CSRF token)",
        }
    }

    /// Whether the request reached the server (and therefore counts toward
    /// the request counter).
    pub fn was_sent(&self) -> bool {
        !matches!(
            self,
            BlinkOutcome::TransportError | BlinkOutcome::SkippedNoToken
        )
    }

    /// Whether the outcome is a failure worth counting as an error.
    pub fn is_error(&self) -> bool {
        !matches!(self, BlinkOutcome::Accepted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_all_outcomes_have_string_representation() {
        for outcome in BlinkOutcome::iter() {
            let str_repr = outcome.as_str();
            assert!(
                !str_repr.is_empty(),
                "{:?} should have non-empty string",
                outcome
            );
            assert_eq!(outcome.to_string(), str_repr);
        }
    }

    #[test]
    fn test_was_sent() {
        assert!(BlinkOutcome::Accepted.was_sent());
        assert!(BlinkOutcome::RateLimited.was_sent());
        assert!(BlinkOutcome::InvalidToken.was_sent());
        assert!(BlinkOutcome::Rejected.was_sent());
        assert!(!BlinkOutcome::TransportError.was_sent());
        assert!(!BlinkOutcome::SkippedNoToken.was_sent());
    }

    #[test]
    fn test_only_accepted_is_not_an_error() {
        let errors: Vec<_> = BlinkOutcome::iter().filter(|o| !o.is_error()).collect();
        assert_eq!(errors, vec![BlinkOutcome::Accepted]);
    }

    #[test]
    fn test_config_error_messages() {
        assert!(ConfigError::MissingApiKey
            .to_string()
            .contains("THINGSPEAK_API_KEY"));
        assert_eq!(
            ConfigError::ZeroSetting("rate_quota").to_string(),
            "rate_quota must be greater than zero"
        );
        assert!(ConfigError::RateTooHigh {
            quota: u32::MAX,
            window: std::time::Duration::from_secs(1),
        }
        .to_string()
        .contains("4294967295"));
    }

    #[test]
    fn test_token_error_messages() {
        assert_eq!(
            TokenError::Status(StatusCode::SERVICE_UNAVAILABLE).to_string(),
            "Token page returned HTTP 503 Service Unavailable"
        );
        assert!(TokenError::NotFound.to_string().contains("csrf-token"));
    }
}
