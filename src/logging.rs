//! Structured logging for the tuner, built on `tracing`.
//!
//! The tuner itself only emits events; the bootstrap orchestrator decides
//! where they go by installing a subscriber, either through [`init_logging`]
//! or its own registry.

use crate::error::TunerError;
use serde::{Deserialize, Serialize};
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error, off
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format: json, text (default: text)
    #[serde(default = "default_format")]
    pub format: String,

    /// Enable colored output (text format only)
    #[serde(default = "default_true")]
    pub color: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_format() -> String {
    "text".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_format(),
            color: default_true(),
        }
    }
}

/// Initialize process-wide logging.
///
/// The `CASSETTE_LOG` environment variable overrides the configured level
/// filter.
pub fn init_logging(config: Option<&LoggingConfig>) -> Result<(), TunerError> {
    let filter = EnvFilter::try_from_env("CASSETTE_LOG")
        .unwrap_or_else(|_| EnvFilter::new(config.map(|c| c.level.as_str()).unwrap_or("info")));

    let format = config.map(|c| c.format.as_str()).unwrap_or("text");
    if format != "json" && format != "text" {
        return Err(TunerError::Settings(format!(
            "Invalid log format: {} (must be 'json' or 'text')",
            format
        )));
    }

    let base_subscriber = Registry::default().with(filter);

    if format == "json" {
        base_subscriber
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_timer(ChronoUtc::rfc_3339()),
            )
            .init();
    } else {
        let use_color = config.map(|c| c.color).unwrap_or(true);
        base_subscriber
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_ansi(use_color),
            )
            .init();
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_logging_config() {
        let config = LoggingConfig::default();
        assert_eq!(config.level, "info");
        assert_eq!(config.format, "text");
        assert!(config.color);
    }

    #[test]
    fn test_invalid_format_is_rejected() {
        let config = LoggingConfig {
            format: "xml".to_string(),
            ..LoggingConfig::default()
        };
        assert!(matches!(
            init_logging(Some(&config)),
            Err(TunerError::Settings(_))
        ));
    }
}
