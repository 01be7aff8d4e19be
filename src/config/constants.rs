//! Configuration constants.
//!
//! This module defines the defaults used throughout the application: endpoints,
//! the pacing quota, the cool-down length and the refresh/report cadences.

// Endpoints
/// Home page of the blink site; its markup carries the CSRF meta tag.
pub const DEFAULT_SITE_URL: &str = "http://blink.mattstauffer.com/";
/// Path (relative to the site URL) that accepts color-change requests.
pub const FLASH_PATH: &str = "flash";
/// ThingSpeak channel update endpoint used for the request counter.
pub const DEFAULT_TELEMETRY_URL: &str = "https://api.thingspeak.com/update";

// Token scraping
/// `name` attribute of the meta tag holding the CSRF token.
pub const CSRF_META_NAME: &str = "csrf-token";
/// Header that carries the CSRF token on every flash request.
pub const CSRF_HEADER: &str = "X-CSRF-TOKEN";

// Rate limiting
/// Requests the site accepts per window.
pub const DEFAULT_RATE_QUOTA: u32 = 20;
/// Pacing window in seconds.
/// One second longer than the site's minute to absorb clock variance on the host.
pub const DEFAULT_RATE_WINDOW_SECS: u64 = 61;
/// Fixed pause after the site answers 429 Too Many Requests.
pub const DEFAULT_COOLDOWN_SECS: u64 = 60;

// Cadences
/// Refresh the CSRF token every N sent requests so it never expires under us.
pub const DEFAULT_TOKEN_REFRESH_EVERY: u64 = 49;
/// Report the request counter every N sent requests.
pub const DEFAULT_TELEMETRY_EVERY: u64 = 7;
/// Requests per batch of the dispatch loop (one full rainbow).
pub const DEFAULT_BATCH_SIZE: usize = 7;

// HTTP client
/// Per-request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
/// Default User-Agent string for HTTP requests.
///
/// Users can override this via the `--user-agent` CLI flag.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

// HTTP status codes (for clarity and consistency)
pub const HTTP_STATUS_TOO_MANY_REQUESTS: u16 = 429;
pub const HTTP_STATUS_INTERNAL_SERVER_ERROR: u16 = 500;
