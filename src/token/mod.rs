//! CSRF token handling.
//!
//! The blink site only accepts flash requests that carry the CSRF token
//! embedded in its home page as `<meta name="csrf-token" content="...">`.
//! This module scrapes that token; the dispatcher decides when to refresh it.

mod extract;
mod fetch;

pub use extract::{extract_csrf_token, SecurityToken};
pub use fetch::TokenFetcher;
