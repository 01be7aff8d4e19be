//! Logger initialization.
//!
//! This module provides functions to initialize the logger with custom formatting.

use std::io::Write;

use crate::config::LogFormat;
use crate::error_handling::InitializationError;
use colored::*;
use log::LevelFilter;

/// Initializes the logger with the specified level and format.
///
/// Configures `env_logger` with custom formatting. Supports both plain text
/// (with colors and emojis) and JSON formats for structured logging.
///
/// The logger reads from the `RUST_LOG` environment variable by default, but
/// the provided `level` parameter will override it.
///
/// # Errors
///
/// Returns `InitializationError::LoggerError` if a logger is already installed.
///
/// # Examples
///
/// ```bash
/// # Per-module filtering via RUST_LOG
/// RUST_LOG=rainbow_blink=debug,reqwest=info rainbow_blink
///
/// # CLI args take precedence
/// rainbow_blink --log-level debug --log-format json
/// ```
pub fn init_logger_with(level: LevelFilter, format: LogFormat) -> Result<(), InitializationError> {
    colored::control::set_override(true);

    let mut builder = env_logger::Builder::from_default_env();
    builder.filter_level(level);
    // scraper's parser stack logs every recovered markup quirk on the token page
    builder.filter_module("html5ever", LevelFilter::Error);
    builder.filter_module("selectors", LevelFilter::Warn);
    builder.filter_module("reqwest", LevelFilter::Info);
    builder.filter_module("rainbow_blink", level);

    match format {
        LogFormat::Json => builder.format(|buf, record| {
            let line = serde_json::json!({
                "ts": chrono::Utc::now().timestamp_millis(),
                "level": record.level().as_str(),
                "target": record.target(),
                "msg": record.args().to_string(),
            });
            writeln!(buf, "{line}")
        }),
        LogFormat::Plain => builder.format(|buf, record| {
            let (marker, level) = level_style(record.level());
            writeln!(
                buf,
                "{} {} {} [{}] {}",
                chrono::Local::now().format("%H:%M:%S"),
                marker,
                record.target().cyan(),
                level,
                record.args()
            )
        }),
    };

    // try_init so a second call (tests) reports an error instead of panicking
    builder.try_init().map_err(InitializationError::from)?;

    Ok(())
}

fn level_style(level: log::Level) -> (&'static str, ColoredString) {
    let label = level.as_str();
    match level {
        log::Level::Error => ("❌", label.red()),
        log::Level::Warn => ("⚠️", label.yellow()),
        log::Level::Info => ("🌈", label.green()),
        log::Level::Debug => ("🔍", label.blue()),
        log::Level::Trace => ("🔬", label.purple()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_style_labels() {
        for level in [log::Level::Error, log::Level::Warn, log::Level::Info] {
            let (marker, label) = level_style(level);
            assert!(!marker.is_empty());
            assert!(label.to_string().contains(level.as_str()));
        }
    }

    #[test]
    fn test_init_logger_does_not_panic_when_called_twice() {
        let first = init_logger_with(LevelFilter::Info, LogFormat::Plain);
        let second = init_logger_with(LevelFilter::Debug, LogFormat::Json);
        // At most one call can install the global logger
        assert!(first.is_err() || second.is_err());
        if let Err(e) = second {
            assert!(matches!(e, InitializationError::LoggerError(_)));
        }
    }
}
