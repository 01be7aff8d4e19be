//! Client-side rate limiting for flash requests.
//!
//! The blink site allows 20 requests per minute. This module paces our own
//! requests to stay under that quota and enforces a fixed cool-down whenever
//! the site answers 429 anyway:
//! - Ticker policy: one permit every `window / quota`
//! - Bucket policy: `quota` permits per sliding window, each returned `window` after use
//! - Cool-down: a flat pause (60s by default) with no backoff growth or jitter

mod cooldown;
mod limiter;
mod pacing;

pub use limiter::RateLimiter;
