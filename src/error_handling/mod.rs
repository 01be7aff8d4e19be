//! Error handling and dispatch statistics.
//!
//! This module provides:
//! - Error type definitions (initialization, configuration, token retrieval)
//! - Outcome categorization for flash responses
//! - Thread-safe outcome counters
//!
//! Only configuration and the initial token fetch are fatal. Rate limiting,
//! invalid tokens and transport failures are outcomes: they are logged,
//! counted and handled inside the dispatch loop.

mod categorization;
mod stats;
mod types;

// Re-export public API
pub use categorization::{categorize_flash_error, categorize_flash_status};
pub use stats::BlinkStats;
pub use types::{BlinkOutcome, ConfigError, InitializationError, TokenError};

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;
    use strum::IntoEnumIterator;

    #[test]
    fn test_every_outcome_is_counted() {
        let stats = BlinkStats::new();
        for outcome in BlinkOutcome::iter() {
            stats.record(outcome);
        }
        assert_eq!(stats.total(), BlinkOutcome::iter().count());
    }

    #[test]
    fn test_categorized_status_feeds_stats() {
        let stats = BlinkStats::new();
        for status in [
            StatusCode::OK,
            StatusCode::TOO_MANY_REQUESTS,
            StatusCode::OK,
            StatusCode::INTERNAL_SERVER_ERROR,
        ] {
            stats.record(categorize_flash_status(status));
        }
        assert_eq!(stats.count(BlinkOutcome::Accepted), 2);
        assert_eq!(stats.count(BlinkOutcome::RateLimited), 1);
        assert_eq!(stats.count(BlinkOutcome::InvalidToken), 1);
        assert_eq!(stats.total_sent(), 4);
    }
}
