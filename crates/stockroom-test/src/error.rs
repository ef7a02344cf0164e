//! Test error types.

use thiserror::Error;

/// Errors that can occur while driving a test request.
#[derive(Debug, Error)]
pub enum TestError {
    /// Response body reading failed.
    #[error("Body read error: {0}")]
    BodyRead(String),

    /// JSON serialization or deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
