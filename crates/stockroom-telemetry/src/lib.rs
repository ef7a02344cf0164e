//! # Stockroom Telemetry
//!
//! Logging initialisation for Stockroom binaries. Library crates only emit
//! `tracing` events; this crate decides where they go.

#![doc(html_root_url = "https://docs.rs/stockroom-telemetry/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod error;
pub mod logging;

pub use error::TelemetryError;
pub use logging::{create_env_filter, init_logging, LogConfig};

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;
