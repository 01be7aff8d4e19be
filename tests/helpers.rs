// Shared test helpers for building dispatchers against a mock blink site.
//
// The mock server plays both the blink site (token page at `/`, flash endpoint at
// `/flash`) and ThingSpeak (`/update`).

#![allow(dead_code)] // Each test file uses a different subset

use std::sync::Arc;
use std::time::Duration;

use httptest::Server;
use url::Url;

use rainbow_blink::{
    BlinkStats, DispatchSettings, Dispatcher, RatePolicy, RateLimiter, TelemetryReporter,
    TokenFetcher,
};

pub const TEST_API_KEY: &str = "TESTKEY";

/// Cool-down used by the mock scenarios (the real one is a minute).
pub const TEST_COOLDOWN: Duration = Duration::from_millis(300);

/// A token page the way the blink site renders it.
pub fn token_page(token: &str) -> String {
    format!(
        r#"<!DOCTYPE html><html><head><meta charset="utf-8"><meta name="csrf-token" content="{token}"><title>Blink</title></head><body></body></html>"#
    )
}

pub fn test_client() -> Arc<reqwest::Client> {
    Arc::new(
        reqwest::Client::builder()
            .timeout(Duration::from_secs(5))
            .build()
            .expect("Failed to create HTTP client"),
    )
}

/// A limiter fast enough that pacing never dominates a test.
pub fn fast_limiter() -> RateLimiter {
    RateLimiter::new(
        RatePolicy::Ticker,
        1000,
        Duration::from_secs(1),
        TEST_COOLDOWN,
    )
    .expect("valid limiter settings")
}

/// Builds a dispatcher whose every endpoint points at `server`.
pub fn dispatcher_for(server: &Server, settings: DispatchSettings) -> Dispatcher {
    dispatcher_with_limiter(server, settings, fast_limiter())
}

/// Like `dispatcher_for`, with a caller-supplied rate limiter.
pub fn dispatcher_with_limiter(
    server: &Server,
    settings: DispatchSettings,
    limiter: RateLimiter,
) -> Dispatcher {
    let client = test_client();
    let site = Url::parse(&server.url_str("/")).expect("server URL parses");
    let flash = site.join("flash").expect("flash URL joins");
    let telemetry = Url::parse(&server.url_str("/update")).expect("telemetry URL parses");
    Dispatcher::new(
        Arc::clone(&client),
        flash,
        limiter,
        TokenFetcher::new(Arc::clone(&client), site),
        TelemetryReporter::new(Arc::clone(&client), telemetry, TEST_API_KEY),
        settings,
        Arc::new(BlinkStats::new()),
    )
}
