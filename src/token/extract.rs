//! CSRF token extraction from page markup.

use scraper::{Html, Selector};
use std::sync::LazyLock;

use crate::config::CSRF_META_NAME;

static CSRF_META_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    let selector = format!("meta[name='{}']", CSRF_META_NAME);
    Selector::parse(&selector).unwrap_or_else(|e| {
        log::error!("Failed to parse csrf meta selector '{}': {}", selector, e);
        // Known-valid selector that matches nothing, so extraction reports "not found"
        Selector::parse("*:not(*)").expect("fallback selector '*:not(*)' always parses")
    })
});

/// An opaque CSRF token scraped from the blink site.
///
/// No expiry is tracked; the dispatcher replaces it on a request-count cadence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecurityToken(String);

impl SecurityToken {
    pub fn new(value: impl Into<String>) -> Self {
        SecurityToken(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Extracts the CSRF token from an HTML document.
///
/// Returns the `content` attribute of the first `<meta name="csrf-token">`
/// element exactly as written. A missing tag, a tag without `content`, or an
/// empty `content` all yield `None`.
pub fn extract_csrf_token(html: &str) -> Option<SecurityToken> {
    let document = Html::parse_document(html);
    let element = document.select(&CSRF_META_SELECTOR).next()?;
    match element.value().attr("content") {
        Some(content) if !content.is_empty() => Some(SecurityToken::new(content)),
        _ => {
            log::debug!("csrf-token meta tag present but has no content");
            None
        }
    }
}
