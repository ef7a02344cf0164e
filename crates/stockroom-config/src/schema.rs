//! Configuration sections.

use serde::{Deserialize, Serialize};

/// HTTP server settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerSection {
    /// Address to bind, `host:port`.
    pub http_addr: String,
    /// Seconds to wait for in-flight requests on shutdown.
    pub shutdown_timeout_secs: u64,
    /// Per-request timeout in milliseconds.
    pub request_timeout_ms: u64,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            http_addr: "0.0.0.0:5000".to_string(),
            shutdown_timeout_secs: 30,
            request_timeout_ms: 30_000,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// One JSON object per line.
    #[default]
    Json,
    /// Human-readable multi-line output.
    Pretty,
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingSection {
    /// Whether logging is installed at all.
    pub enabled: bool,
    /// Default level filter (`RUST_LOG` takes precedence).
    pub level: String,
    /// Output format.
    pub format: LogFormat,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            enabled: true,
            level: "info".to_string(),
            format: LogFormat::Json,
        }
    }
}

/// Error rendering settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ErrorsSection {
    /// Send internal error messages to clients.
    pub expose_internal_errors: bool,
    /// Message sent in place of a masked internal error.
    pub internal_error_message: String,
}

impl Default for ErrorsSection {
    fn default() -> Self {
        Self {
            expose_internal_errors: false,
            internal_error_message: "Internal server error".to_string(),
        }
    }
}

/// Optional seed data for the in-memory collaborators.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DataSection {
    /// Path to a JSON seed file.
    pub seed_path: Option<String>,
}
