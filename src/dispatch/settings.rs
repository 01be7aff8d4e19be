//! Dispatch cadence settings.

use crate::config::{
    Config, DEFAULT_BATCH_SIZE, DEFAULT_TELEMETRY_EVERY, DEFAULT_TOKEN_REFRESH_EVERY,
};

/// How often the dispatcher refreshes its token and reports telemetry.
///
/// All counts are in requests that reached the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchSettings {
    /// Refresh the CSRF token before the next request every N sent requests.
    pub token_refresh_every: u64,
    /// Report the request counter every N sent requests.
    pub telemetry_every: u64,
    /// Requests per batch of the long-running loop.
    pub batch_size: usize,
}

impl Default for DispatchSettings {
    fn default() -> Self {
        DispatchSettings {
            token_refresh_every: DEFAULT_TOKEN_REFRESH_EVERY,
            telemetry_every: DEFAULT_TELEMETRY_EVERY,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

impl DispatchSettings {
    /// Raises every zero cadence to 1.
    ///
    /// The dispatcher takes counts modulo these values, so a zero must never
    /// reach it, whichever way the settings were built.
    pub fn clamped(self) -> Self {
        DispatchSettings {
            token_refresh_every: self.token_refresh_every.max(1),
            telemetry_every: self.telemetry_every.max(1),
            batch_size: self.batch_size.max(1),
        }
    }
}

impl From<&Config> for DispatchSettings {
    fn from(config: &Config) -> Self {
        DispatchSettings {
            token_refresh_every: config.token_refresh_every,
            telemetry_every: config.telemetry_every,
            batch_size: config.batch_size,
        }
        .clamped()
    }
}
