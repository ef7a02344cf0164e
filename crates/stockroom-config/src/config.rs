//! Root configuration type.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

use crate::{ConfigError, DataSection, ErrorsSection, LogFormat, LoggingSection, ServerSection};

/// Complete Stockroom configuration.
///
/// Use [`ConfigLoader`](crate::ConfigLoader) to load it from files and the
/// environment.
///
/// # Example
///
/// ```
/// use stockroom_config::StockroomConfig;
///
/// let config = StockroomConfig::default();
/// assert_eq!(config.server.http_addr, "0.0.0.0:5000");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct StockroomConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerSection,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingSection,

    /// Error rendering configuration.
    #[serde(default)]
    pub errors: ErrorsSection,

    /// Seed data configuration.
    #[serde(default)]
    pub data: DataSection,
}

impl StockroomConfig {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if:
    /// - The server address is not a socket address
    /// - The request timeout is zero
    /// - The log level is not a known level
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.http_addr.parse::<SocketAddr>().is_err() {
            return Err(ConfigError::invalid_value(
                "server.http_addr",
                format!("invalid socket address: {}", self.server.http_addr),
            ));
        }

        if self.server.request_timeout_ms == 0 {
            return Err(ConfigError::invalid_value(
                "server.request_timeout_ms",
                "must be greater than zero",
            ));
        }

        let level = self.logging.level.to_lowercase();
        if !["trace", "debug", "info", "warn", "error"].contains(&level.as_str()) {
            return Err(ConfigError::invalid_value(
                "logging.level",
                format!("unknown level: {}", self.logging.level),
            ));
        }

        Ok(())
    }

    /// Returns the parsed server address.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if the address does not parse.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.server.http_addr.parse().map_err(|_| {
            ConfigError::invalid_value(
                "server.http_addr",
                format!("invalid socket address: {}", self.server.http_addr),
            )
        })
    }

    /// Local development preset: pretty debug logs and exposed internal errors.
    ///
    /// ```
    /// use stockroom_config::{LogFormat, StockroomConfig};
    ///
    /// let config = StockroomConfig::development();
    /// assert_eq!(config.logging.format, LogFormat::Pretty);
    /// assert!(config.errors.expose_internal_errors);
    /// ```
    #[must_use]
    pub fn development() -> Self {
        let mut config = Self::default();
        config.server.http_addr = "127.0.0.1:5000".to_string();
        config.logging.level = "debug".to_string();
        config.logging.format = LogFormat::Pretty;
        config.errors.expose_internal_errors = true;
        config
    }

    /// Production preset: JSON info logs and masked internal errors.
    #[must_use]
    pub fn production() -> Self {
        let mut config = Self::default();
        config.logging.level = "info".to_string();
        config.logging.format = LogFormat::Json;
        config.errors.expose_internal_errors = false;
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = StockroomConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.socket_addr().unwrap().port(), 5000);
    }

    #[test]
    fn test_presets_are_valid() {
        assert!(StockroomConfig::development().validate().is_ok());
        assert!(StockroomConfig::production().validate().is_ok());
    }

    #[test]
    fn test_invalid_address() {
        let mut config = StockroomConfig::default();
        config.server.http_addr = "localhost".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("server.http_addr"));
        assert!(config.socket_addr().is_err());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let mut config = StockroomConfig::default();
        config.server.request_timeout_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unknown_log_level_rejected() {
        let mut config = StockroomConfig::default();
        config.logging.level = "chatty".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unknown_section_rejected() {
        let result: Result<StockroomConfig, _> = toml::from_str("[metrics]\nenabled = true");
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result: Result<StockroomConfig, _> = toml::from_str("[server]\nmax_connections = 5");
        assert!(result.is_err());
    }
}
