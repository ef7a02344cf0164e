//! Server error types.

use thiserror::Error;

/// Result type alias using [`ServerError`].
pub type ServerResult<T> = Result<T, ServerError>;

/// Errors raised while building the route table or running the server.
#[derive(Debug, Error)]
pub enum ServerError {
    /// A path template could not be parsed.
    #[error("Invalid route template '{template}': {reason}")]
    InvalidRoute {
        /// The offending template.
        template: String,
        /// What is wrong with it.
        reason: String,
    },

    /// The same method and template were registered twice.
    #[error("Duplicate route: {method} {template}")]
    DuplicateRoute {
        /// The HTTP method.
        method: http::Method,
        /// The path template.
        template: String,
    },

    /// Failed to bind to the configured address.
    #[error("Bind error: {0}")]
    Bind(String),

    /// I/O error during server operation.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
