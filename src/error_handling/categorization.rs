//! Flash response categorization.

use reqwest::StatusCode;

use super::types::BlinkOutcome;
use crate::config::{HTTP_STATUS_INTERNAL_SERVER_ERROR, HTTP_STATUS_TOO_MANY_REQUESTS};

/// Maps the status of a flash response to a `BlinkOutcome`.
///
/// The blink site answers 429 when its own limiter trips and 500 when the CSRF
/// token it was handed is no longer valid; everything else is either a success
/// or a rejection we only count.
pub fn categorize_flash_status(status: StatusCode) -> BlinkOutcome {
    match status.as_u16() {
        HTTP_STATUS_TOO_MANY_REQUESTS => BlinkOutcome::RateLimited,
        HTTP_STATUS_INTERNAL_SERVER_ERROR => BlinkOutcome::InvalidToken,
        _ if status.is_success() => BlinkOutcome::Accepted,
        _ => BlinkOutcome::Rejected,
    }
}

/// Maps a failed flash request to a `BlinkOutcome`.
///
/// A `reqwest::Error` that still carries a status (only produced by
/// `error_for_status`) is categorized like a response; anything else never
/// reached the server.
pub fn categorize_flash_error(error: &reqwest::Error) -> BlinkOutcome {
    match error.status() {
        Some(status) => categorize_flash_status(status),
        None => BlinkOutcome::TransportError,
    }
}
