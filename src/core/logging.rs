//! Logging setup and credential redaction
//!
//! Structured `tracing` output, JSON by default so each cycle's rates,
//! differential and ledger count can be picked up by a log shipper.
//!
//! | Variable     | Default           | Effect                         |
//! |--------------|-------------------|--------------------------------|
//! | `RUST_LOG`   | `funding_arb=info`| Filter directives              |
//! | `LOG_FORMAT` | `json`            | `pretty` for local development |
//!
//! ```rust,ignore
//! use funding_arb::core::logging::{init_logging, sanitize};
//!
//! init_logging();
//! tracing::info!(api_key = %sanitize(&key), "Venue B client ready");
//! // api_key = "abcd...REDACTED"
//! ```

use std::env;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing_subscriber::{fmt as ts_fmt, prelude::*, EnvFilter};

static LOGGING_INITIALIZED: AtomicBool = AtomicBool::new(false);

/// Filter used when `RUST_LOG` is unset or unparsable
pub const DEFAULT_LOG_LEVEL: &str = "funding_arb=info";

/// Redacting display wrapper for credentials
///
/// Values longer than 8 characters keep a 4 character prefix so two keys can
/// still be told apart in logs; shorter values are fully hidden.
#[derive(Clone)]
pub struct SanitizedValue<'a>(&'a str);

impl<'a> SanitizedValue<'a> {
    pub fn new(value: &'a str) -> Self {
        Self(value)
    }
}

impl fmt::Display for SanitizedValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.chars().count() > 8 {
            let prefix: String = self.0.chars().take(4).collect();
            write!(f, "{}...REDACTED", prefix)
        } else {
            write!(f, "REDACTED")
        }
    }
}

impl fmt::Debug for SanitizedValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SanitizedValue(***)")
    }
}

pub fn sanitize(value: &str) -> SanitizedValue<'_> {
    SanitizedValue::new(value)
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level_filter: String,
    pub use_pretty_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level_filter: DEFAULT_LOG_LEVEL.to_string(),
            use_pretty_format: false,
        }
    }
}

impl LoggingConfig {
    /// Read `RUST_LOG` and `LOG_FORMAT`
    pub fn from_env() -> Self {
        let level_filter = env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string());
        let use_pretty_format = env::var("LOG_FORMAT")
            .map(|v| v.eq_ignore_ascii_case("pretty"))
            .unwrap_or(false);
        Self {
            level_filter,
            use_pretty_format,
        }
    }
}

/// Install the global subscriber from environment; later calls are no-ops
pub fn init_logging() {
    init_logging_with_config(LoggingConfig::from_env());
}

pub fn init_logging_with_config(config: LoggingConfig) {
    if LOGGING_INITIALIZED.swap(true, Ordering::SeqCst) {
        return;
    }

    let env_filter =
        EnvFilter::try_new(&config.level_filter).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL));

    if config.use_pretty_format {
        tracing_subscriber::registry()
            .with(ts_fmt::layer().pretty().with_target(true).with_file(false))
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(ts_fmt::layer().json().with_target(true).with_current_span(true))
            .with(env_filter)
            .init();
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_long_value_keeps_prefix() {
        assert_eq!(sanitize("k3yAbCdEfGhIjK").to_string(), "k3yA...REDACTED");
    }

    #[test]
    fn test_short_value_fully_redacted() {
        assert_eq!(sanitize("abc").to_string(), "REDACTED");
        assert_eq!(sanitize("12345678").to_string(), "REDACTED");
        assert_eq!(sanitize("").to_string(), "REDACTED");
    }

    #[test]
    fn test_multibyte_prefix_does_not_split_chars() {
        assert_eq!(sanitize("ééééééééé").to_string(), "éééé...REDACTED");
    }

    #[test]
    fn test_debug_never_shows_value() {
        assert_eq!(format!("{:?}", sanitize("super-secret-value")), "SanitizedValue(***)");
    }

    #[test]
    fn test_default_config() {
        let config = LoggingConfig::default();
        assert_eq!(config.level_filter, "funding_arb=info");
        assert!(!config.use_pretty_format);
    }

    #[test]
    #[serial]
    fn test_config_from_env() {
        env::set_var("RUST_LOG", "funding_arb=debug");
        env::set_var("LOG_FORMAT", "Pretty");
        let config = LoggingConfig::from_env();
        env::remove_var("RUST_LOG");
        env::remove_var("LOG_FORMAT");

        assert_eq!(config.level_filter, "funding_arb=debug");
        assert!(config.use_pretty_format);
    }
}
