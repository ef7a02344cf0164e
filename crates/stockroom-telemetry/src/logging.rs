//! Structured logging.
//!
//! Installs a `tracing-subscriber` registry with an [`EnvFilter`] and either
//! JSON or pretty output. `RUST_LOG`, when set, overrides the configured level.
//!
//! # Example
//!
//! ```rust,ignore
//! use stockroom_telemetry::{init_logging, LogConfig};
//!
//! init_logging(&LogConfig::default())?;
//! tracing::info!(addr = "0.0.0.0:5000", "server listening");
//! ```

use crate::error::TelemetryError;
use crate::TelemetryResult;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Whether logging is enabled.
    pub enabled: bool,

    /// Filter directive (e.g. `"info"` or `"stockroom_server=debug,info"`).
    pub level: String,

    /// Whether to output JSON.
    pub json_format: bool,

    /// Whether to include file/line info.
    pub file_line_info: bool,

    /// Whether to include the target (module path).
    pub include_target: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: "info".to_string(),
            json_format: true,
            file_line_info: false,
            include_target: true,
        }
    }
}

/// Builds the filter: `RUST_LOG` if set, otherwise `level`.
///
/// # Errors
///
/// Returns `TelemetryError::InvalidFilter` if `level` cannot be parsed.
pub fn create_env_filter(level: &str) -> TelemetryResult<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(level).map_err(|e| TelemetryError::InvalidFilter(format!("{level}: {e}")))
}

/// Initializes the global logging subscriber.
///
/// Does nothing when `config.enabled` is false.
///
/// # Errors
///
/// Returns `TelemetryError` if the filter is invalid or a global subscriber
/// is already installed.
pub fn init_logging(config: &LogConfig) -> TelemetryResult<()> {
    if !config.enabled {
        return Ok(());
    }

    let filter = create_env_filter(&config.level)?;

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_file(config.file_line_info)
        .with_line_number(config.file_line_info)
        .with_target(config.include_target);

    let fmt_layer = if config.json_format {
        fmt_layer.json().with_filter(filter).boxed()
    } else {
        fmt_layer.pretty().with_filter(filter).boxed()
    };

    tracing_subscriber::registry()
        .with(fmt_layer)
        .try_init()
        .map_err(|e| TelemetryError::LoggingInit(e.to_string()))
}
