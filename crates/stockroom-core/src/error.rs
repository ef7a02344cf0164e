//! Error signals for the Stockroom request pipeline.
//!
//! [`ApiError`] is the value a chain stage raises to abort the remaining
//! stages. It carries an [`ErrorCategory`] (which maps onto an HTTP status
//! code) and a human-readable message. The error-rendering stage turns it into
//! an [`ErrorEnvelope`] for the client.
//!
//! | `ErrorCategory` | Status | Code |
//! |---|---|---|
//! | `Validation` | 400 | `BAD_REQUEST` |
//! | `NotFound` | 404 | `NOT_FOUND` |
//! | `MethodNotAllowed` | 405 | `METHOD_NOT_ALLOWED` |
//! | `Internal` | 500 | `INTERNAL_ERROR` |

use http::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias using [`ApiError`].
pub type ApiResult<T> = Result<T, ApiError>;

/// Classification of an error signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Malformed, missing or unrecognized fields. The client must fix the payload.
    Validation,
    /// A referenced entity or path does not exist. The client must fix the identifier.
    NotFound,
    /// The path exists but does not accept the request method.
    MethodNotAllowed,
    /// Unexpected collaborator failure. Not fixable by the client.
    Internal,
}

impl ErrorCategory {
    /// Returns the HTTP status code for this category.
    #[must_use]
    pub const fn default_status_code(&self) -> StatusCode {
        match self {
            Self::Validation => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the machine-readable code used in error envelopes.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Validation => "BAD_REQUEST",
            Self::NotFound => "NOT_FOUND",
            Self::MethodNotAllowed => "METHOD_NOT_ALLOWED",
            Self::Internal => "INTERNAL_ERROR",
        }
    }

    /// Returns `true` if the client can fix the request to avoid this error.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        !matches!(self, Self::Internal)
    }
}

/// The error signal raised by a chain stage.
///
/// Once raised, no later stage of the same chain executes; only the
/// error-rendering stage sees it.
///
/// # Example
///
/// ```
/// use stockroom_core::{ApiError, ErrorCategory};
///
/// let error = ApiError::validation("supplier_email must be included");
/// assert_eq!(error.category(), ErrorCategory::Validation);
/// assert_eq!(error.message(), "supplier_email must be included");
/// ```
#[derive(Error, Debug)]
pub enum ApiError {
    /// The request payload failed validation.
    #[error("Validation error: {message}")]
    Validation {
        /// Human-readable error message.
        message: String,
    },

    /// A referenced entity or path does not exist.
    #[error("Not found: {message}")]
    NotFound {
        /// Human-readable error message.
        message: String,
        /// The kind of resource that was looked up, if known.
        resource_type: Option<String>,
    },

    /// The path does not accept the request method.
    #[error("Method not allowed: {message}")]
    MethodNotAllowed {
        /// Human-readable error message.
        message: String,
    },

    /// Unexpected failure.
    #[error("Internal error: {message}")]
    Internal {
        /// Human-readable error message (not exposed to clients by default).
        message: String,
        /// The underlying error.
        #[source]
        source: Option<anyhow::Error>,
    },
}

impl ApiError {
    /// Creates a bad-request error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Creates a not-found error.
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
            resource_type: None,
        }
    }

    /// Creates the not-found error raised by an existence resolver.
    ///
    /// The message is `"<Resource> cannot be found"`.
    ///
    /// ```
    /// use stockroom_core::ApiError;
    ///
    /// let error = ApiError::resource_not_found("Supplier");
    /// assert_eq!(error.message(), "Supplier cannot be found");
    /// ```
    #[must_use]
    pub fn resource_not_found(resource_type: impl Into<String>) -> Self {
        let resource_type = resource_type.into();
        Self::NotFound {
            message: format!("{resource_type} cannot be found"),
            resource_type: Some(resource_type),
        }
    }

    /// Creates a method-not-allowed error.
    #[must_use]
    pub fn method_not_allowed(message: impl Into<String>) -> Self {
        Self::MethodNotAllowed {
            message: message.into(),
        }
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
            source: None,
        }
    }

    /// Creates an internal error wrapping an underlying failure.
    ///
    /// The message defaults to the failure's display text.
    pub fn internal_from(source: impl Into<anyhow::Error>) -> Self {
        let source = source.into();
        Self::Internal {
            message: source.to_string(),
            source: Some(source),
        }
    }

    /// Returns the error category.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::Validation { .. } => ErrorCategory::Validation,
            Self::NotFound { .. } => ErrorCategory::NotFound,
            Self::MethodNotAllowed { .. } => ErrorCategory::MethodNotAllowed,
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        self.category().default_status_code()
    }

    /// Returns the bare message, without the category prefix used by `Display`.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Validation { message }
            | Self::NotFound { message, .. }
            | Self::MethodNotAllowed { message }
            | Self::Internal { message, .. } => message,
        }
    }

    /// Converts this error to a serializable error envelope.
    #[must_use]
    pub fn to_envelope(&self, request_id: Option<&str>) -> ErrorEnvelope {
        let category = self.category();
        ErrorEnvelope {
            error: ErrorDetail {
                code: category.code().to_string(),
                message: self.message().to_string(),
                category,
            },
            request_id: request_id.map(ToString::to_string),
        }
    }
}

/// Serializable error envelope for HTTP responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    /// The error details.
    pub error: ErrorDetail,
    /// The request ID for correlation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

/// Error detail within an envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Machine-readable error code.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Error category.
    pub category: ErrorCategory,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error() {
        let error = ApiError::validation("Invalid field(s): foo");
        assert_eq!(error.category(), ErrorCategory::Validation);
        assert_eq!(error.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(error.message(), "Invalid field(s): foo");
        assert!(error.to_string().contains("Invalid field(s): foo"));
    }

    #[test]
    fn test_resource_not_found() {
        let error = ApiError::resource_not_found("Product");
        assert_eq!(error.category(), ErrorCategory::NotFound);
        assert_eq!(error.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(error.message(), "Product cannot be found");
        assert!(matches!(
            error,
            ApiError::NotFound { resource_type: Some(ref rt), .. } if rt == "Product"
        ));
    }

    #[test]
    fn test_internal_from_keeps_source_message() {
        let error = ApiError::internal_from(anyhow::anyhow!("connection reset"));
        assert_eq!(error.category(), ErrorCategory::Internal);
        assert_eq!(error.message(), "connection reset");
        assert!(std::error::Error::source(&error).is_some());
    }

    #[test]
    fn test_method_not_allowed() {
        let error = ApiError::method_not_allowed("PATCH not allowed for /suppliers");
        assert_eq!(error.status_code(), StatusCode::METHOD_NOT_ALLOWED);
        assert!(error.category().is_client_error());
    }

    #[test]
    fn test_error_envelope_serialization() {
        let error = ApiError::not_found("Path not found: /nowhere");
        let envelope = error.to_envelope(Some("req-456"));

        let json = serde_json::to_string(&envelope).expect("serialization should work");
        assert!(json.contains("\"code\":\"NOT_FOUND\""));
        assert!(json.contains("\"message\":\"Path not found: /nowhere\""));
        assert!(json.contains("\"request_id\":\"req-456\""));
        assert!(json.contains("\"category\":\"not_found\""));
    }

    #[test]
    fn test_envelope_omits_missing_request_id() {
        let envelope = ApiError::internal("boom").to_envelope(None);
        let json = serde_json::to_value(&envelope).unwrap();
        assert!(json.get("request_id").is_none());
        assert_eq!(json["error"]["code"], "INTERNAL_ERROR");
    }

    #[test]
    fn test_all_categories_have_error_status_codes() {
        let categories = [
            ErrorCategory::Validation,
            ErrorCategory::NotFound,
            ErrorCategory::MethodNotAllowed,
            ErrorCategory::Internal,
        ];

        for category in categories {
            let status = category.default_status_code();
            assert!(
                status.is_client_error() || status.is_server_error(),
                "Category {:?} should map to error status code, got {}",
                category,
                status
            );
            assert_eq!(status.is_client_error(), category.is_client_error());
        }
    }
}
