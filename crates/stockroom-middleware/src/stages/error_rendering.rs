//! Error rendering.
//!
//! The final stage for every failed chain. It converts an [`ApiError`] into
//! the standard JSON error envelope:
//!
//! ```json
//! {
//!     "error": {
//!         "code": "BAD_REQUEST",
//!         "message": "supplier_name must be included",
//!         "category": "validation"
//!     },
//!     "request_id": "0190a5e2-..."
//! }
//! ```
//!
//! Internal errors are logged in full and, unless configured otherwise,
//! their message is replaced by a generic one before reaching the client.

use crate::types::{Response, ResponseExt};
use stockroom_core::{ApiError, ErrorCategory, RequestId};

const DEFAULT_INTERNAL_MESSAGE: &str = "Internal server error";

/// Renders error signals as JSON responses.
#[derive(Debug, Clone)]
pub struct ErrorRenderer {
    expose_internal_errors: bool,
    internal_error_message: String,
}

impl Default for ErrorRenderer {
    fn default() -> Self {
        Self {
            expose_internal_errors: false,
            internal_error_message: DEFAULT_INTERNAL_MESSAGE.to_string(),
        }
    }
}

impl ErrorRenderer {
    /// Creates a renderer with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether internal error messages are sent to clients.
    #[must_use]
    pub fn expose_internal_errors(mut self, expose: bool) -> Self {
        self.expose_internal_errors = expose;
        self
    }

    /// Sets the message sent in place of masked internal errors.
    #[must_use]
    pub fn internal_error_message(mut self, message: impl Into<String>) -> Self {
        self.internal_error_message = message.into();
        self
    }

    /// Builds the error response for `error`.
    pub fn render(&self, request_id: RequestId, error: &ApiError) -> Response {
        let request_id = request_id.to_string();
        let category = error.category();

        if category == ErrorCategory::Internal {
            let source = std::error::Error::source(error).map(ToString::to_string);
            tracing::error!(
                request_id = %request_id,
                error = %error,
                source = ?source,
                "request failed"
            );
        } else {
            tracing::debug!(
                request_id = %request_id,
                category = ?category,
                message = error.message(),
                "request rejected"
            );
        }

        let mut envelope = error.to_envelope(Some(&request_id));
        if category == ErrorCategory::Internal && !self.expose_internal_errors {
            envelope.error.message.clone_from(&self.internal_error_message);
        }

        Response::json_error(error.status_code(), &envelope)
    }
}
