//! # Stockroom
//!
//! A catalogue API for categories, products and suppliers. Every route runs a
//! fixed chain of stages: existence resolvers, payload validators and a
//! terminal handler, with failures rendered as one JSON error envelope.
//!
//! ```text
//! Request → App (route, parse body) → Chain [guards… → handler] → Response
//!                                          ↓ Fail / panic
//!                                     ErrorRenderer → { "error": { … } }
//! ```
//!
//! This crate wires the workspace together:
//!
//! - [`build_app`] turns a [`StockroomConfig`] and a set of collaborators into an [`App`]
//! - [`load_services`] builds in-memory collaborators, seeded if `data.seed_path` is set
//! - [`run`] starts logging and serves HTTP until SIGINT/SIGTERM
//!
//! ## Example
//!
//! ```
//! use stockroom::{build_app, Services, StockroomConfig};
//!
//! let app = build_app(&StockroomConfig::default(), &Services::in_memory()).unwrap();
//! assert_eq!(app.router().len(), 12);
//! ```

#![doc(html_root_url = "https://docs.rs/stockroom/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

use std::time::Duration;

use thiserror::Error;

/// Re-export of core types.
pub use stockroom_core as core;

/// Re-export of the chain machinery and stages.
pub use stockroom_middleware as middleware;

/// Re-export of the resource controllers and collaborators.
pub use stockroom_catalog as catalog;

/// Re-export of the dispatcher and HTTP server.
pub use stockroom_server as server;

/// Re-export of configuration loading.
pub use stockroom_config as config;

/// Re-export of logging initialisation.
pub use stockroom_telemetry as telemetry;

pub use stockroom_catalog::{SeedData, Services};
pub use stockroom_config::{ConfigLoader, StockroomConfig};
pub use stockroom_server::{App, Server};

use stockroom_catalog::SeedError;
use stockroom_config::{ConfigError, LogFormat};
use stockroom_middleware::stages::ErrorRenderer;
use stockroom_server::{ServerConfig, ServerError};
use stockroom_telemetry::{LogConfig, TelemetryError};

/// Crate version, reported by `stockroom --version`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Failure while starting or running the service.
#[derive(Debug, Error)]
pub enum StartupError {
    /// Configuration could not be loaded or is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Logging could not be installed.
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),

    /// Seed data could not be loaded.
    #[error(transparent)]
    Seed(#[from] SeedError),

    /// The route table or the server failed.
    #[error(transparent)]
    Server(#[from] ServerError),
}

/// Builds the error renderer from the `errors` section.
#[must_use]
pub fn error_renderer(config: &StockroomConfig) -> ErrorRenderer {
    ErrorRenderer::new()
        .expose_internal_errors(config.errors.expose_internal_errors)
        .internal_error_message(config.errors.internal_error_message.clone())
}

/// Builds the server settings from the `server` section.
#[must_use]
pub fn server_config(config: &StockroomConfig) -> ServerConfig {
    ServerConfig::builder()
        .http_addr(config.server.http_addr.clone())
        .shutdown_timeout(Duration::from_secs(config.server.shutdown_timeout_secs))
        .request_timeout(Duration::from_millis(config.server.request_timeout_ms))
        .build()
}

/// Builds the logging settings from the `logging` section.
#[must_use]
pub fn log_config(config: &StockroomConfig) -> LogConfig {
    LogConfig {
        enabled: config.logging.enabled,
        level: config.logging.level.clone(),
        json_format: config.logging.format == LogFormat::Json,
        file_line_info: config.logging.format == LogFormat::Pretty,
        ..LogConfig::default()
    }
}

/// Builds the dispatcher with every catalogue route.
pub fn build_app(config: &StockroomConfig, services: &Services) -> Result<App, ServerError> {
    stockroom_catalog::routes(services)
        .into_iter()
        .fold(App::builder(), |builder, route| {
            let (method, path, chain) = route.into_parts();
            builder.route(method, path, chain)
        })
        .error_renderer(error_renderer(config))
        .build()
}

/// Builds the in-memory collaborators, seeded from `data.seed_path` when set.
pub fn load_services(config: &StockroomConfig) -> Result<Services, StartupError> {
    let Some(path) = config.data.seed_path.as_deref() else {
        return Ok(Services::in_memory());
    };

    let seed = SeedData::from_path(path)?;
    tracing::info!(path, records = seed.len(), "loaded seed data");
    Services::from_seed(seed).map_err(|e| StartupError::Seed(e.into()))
}

/// Installs logging, builds the app and serves until SIGINT or SIGTERM.
pub async fn run(config: StockroomConfig) -> Result<(), StartupError> {
    stockroom_telemetry::init_logging(&log_config(&config))?;

    let services = load_services(&config)?;
    let app = build_app(&config, &services)?;

    tracing::info!(version = VERSION, addr = %config.server.http_addr, "starting stockroom");
    Server::new(server_config(&config), app).run().await?;
    Ok(())
}
