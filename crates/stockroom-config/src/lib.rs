//! Typed configuration for the Stockroom server.
//!
//! - TOML and JSON configuration files
//! - `.env` files via `dotenvy`
//! - Environment variable overrides (`STOCKROOM__SECTION__KEY`)
//! - Strict parsing: unknown sections and fields are errors
//!
//! # Configuration File Format
//!
//! ```toml
//! [server]
//! http_addr = "0.0.0.0:5000"
//! shutdown_timeout_secs = 30
//! request_timeout_ms = 30000
//!
//! [logging]
//! enabled = true
//! level = "info"
//! format = "json"
//!
//! [errors]
//! expose_internal_errors = false
//! internal_error_message = "Internal server error"
//!
//! [data]
//! seed_path = "seed.json"
//! ```

#![doc(html_root_url = "https://docs.rs/stockroom-config/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod error;
mod loader;
mod schema;

pub use config::StockroomConfig;
pub use error::ConfigError;
pub use loader::{ConfigLoader, DEFAULT_ENV_PREFIX};
pub use schema::{DataSection, ErrorsSection, LogFormat, LoggingSection, ServerSection};
