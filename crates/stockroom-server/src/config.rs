//! Server configuration types.
//!
//! ```rust
//! use stockroom_server::ServerConfig;
//! use std::time::Duration;
//!
//! let config = ServerConfig::builder()
//!     .http_addr("127.0.0.1:5000")
//!     .request_timeout(Duration::from_secs(5))
//!     .build();
//!
//! assert_eq!(config.http_addr(), "127.0.0.1:5000");
//! assert_eq!(config.request_timeout(), Duration::from_secs(5));
//! ```

use std::net::SocketAddr;
use std::time::Duration;

/// Default HTTP bind address.
pub const DEFAULT_HTTP_ADDR: &str = "0.0.0.0:5000";

/// Default shutdown timeout in seconds.
pub const DEFAULT_SHUTDOWN_TIMEOUT_SECS: u64 = 30;

/// Default request timeout in milliseconds.
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 30_000;

/// Server configuration.
///
/// Use [`ServerConfig::builder()`] to construct instances.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// HTTP server bind address (e.g., "0.0.0.0:5000")
    http_addr: String,

    /// How long to wait for in-flight connections on shutdown
    shutdown_timeout: Duration,

    /// Upper bound for reading the body and for running the chain
    request_timeout: Duration,
}

impl ServerConfig {
    /// Creates a new server configuration builder.
    #[must_use]
    pub fn builder() -> ServerConfigBuilder {
        ServerConfigBuilder::default()
    }

    /// Returns the HTTP bind address.
    #[must_use]
    pub fn http_addr(&self) -> &str {
        &self.http_addr
    }

    /// Parses and returns the HTTP address as a `SocketAddr`.
    pub fn socket_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        self.http_addr.parse()
    }

    /// Returns the graceful shutdown timeout.
    #[must_use]
    pub fn shutdown_timeout(&self) -> Duration {
        self.shutdown_timeout
    }

    /// Returns the request timeout.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Builder for [`ServerConfig`].
#[derive(Debug, Clone)]
pub struct ServerConfigBuilder {
    http_addr: String,
    shutdown_timeout: Duration,
    request_timeout: Duration,
}

impl ServerConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            http_addr: DEFAULT_HTTP_ADDR.to_string(),
            shutdown_timeout: Duration::from_secs(DEFAULT_SHUTDOWN_TIMEOUT_SECS),
            request_timeout: Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS),
        }
    }

    /// Sets the HTTP bind address.
    #[must_use]
    pub fn http_addr(mut self, addr: impl Into<String>) -> Self {
        self.http_addr = addr.into();
        self
    }

    /// Sets the graceful shutdown timeout.
    #[must_use]
    pub fn shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.shutdown_timeout = timeout;
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Builds the configuration.
    #[must_use]
    pub fn build(self) -> ServerConfig {
        ServerConfig {
            http_addr: self.http_addr,
            shutdown_timeout: self.shutdown_timeout,
            request_timeout: self.request_timeout,
        }
    }
}

impl Default for ServerConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.http_addr(), DEFAULT_HTTP_ADDR);
        assert_eq!(config.shutdown_timeout(), Duration::from_secs(30));
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_socket_addr_parses() {
        let config = ServerConfig::builder().http_addr("127.0.0.1:8081").build();
        let addr = config.socket_addr().unwrap();
        assert_eq!(addr.port(), 8081);
    }

    #[test]
    fn test_socket_addr_rejects_garbage() {
        let config = ServerConfig::builder().http_addr("not-an-address").build();
        assert!(config.socket_addr().is_err());
    }
}
