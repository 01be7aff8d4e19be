//! Endpoint URL validation and normalization.

use url::Url;

use crate::error_handling::ConfigError;

/// Maximum accepted URL length (2048 characters), matching common browser and server limits.
const MAX_URL_LENGTH: usize = 2048;

/// Validates and normalizes a configured endpoint URL.
///
/// Adds an `https://` prefix if no scheme is given, then requires a
/// syntactically valid http/https URL. With `as_base`, the path is forced to end
/// in `/` so relative paths (e.g. `flash`) join beneath it rather than
/// replacing its last segment.
///
/// # Errors
///
/// `UrlTooLong`, `InvalidUrl` or `UnsupportedScheme` as appropriate.
pub fn normalize_base_url(url: &str, as_base: bool) -> Result<Url, ConfigError> {
    let url = url.trim();
    if url.len() > MAX_URL_LENGTH {
        return Err(ConfigError::UrlTooLong {
            len: url.len(),
            max: MAX_URL_LENGTH,
        });
    }

    // Normalize: add https:// prefix if no scheme is present
    let normalized = if url.contains("://") {
        url.to_string()
    } else {
        format!("https://{url}")
    };

    let mut parsed = Url::parse(&normalized).map_err(|source| ConfigError::InvalidUrl {
        url: url.to_string(),
        source,
    })?;

    match parsed.scheme() {
        "http" | "https" => {}
        scheme => {
            return Err(ConfigError::UnsupportedScheme {
                url: url.to_string(),
                scheme: scheme.to_string(),
            })
        }
    }

    if as_base && !parsed.path().ends_with('/') {
        let path = format!("{}/", parsed.path());
        parsed.set_path(&path);
    }

    Ok(parsed)
}
