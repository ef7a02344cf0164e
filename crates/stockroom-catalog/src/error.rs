//! Collaborator error types.

use std::path::PathBuf;
use stockroom_core::ApiError;
use thiserror::Error;

/// Result type alias for collaborator operations.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Failure reported by a persistence collaborator.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The record handed to the collaborator cannot be stored.
    #[error("{0}")]
    InvalidRecord(String),

    /// The record to modify no longer exists.
    #[error("{resource} {id} does not exist")]
    NotFound {
        /// Resource display name.
        resource: &'static str,
        /// Identifier that was looked up.
        id: String,
    },

    /// The backing store cannot be reached.
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// Any other failure.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<ServiceError> for ApiError {
    fn from(error: ServiceError) -> Self {
        match error {
            ServiceError::InvalidRecord(message) => Self::validation(message),
            ServiceError::NotFound { resource, .. } => Self::resource_not_found(resource),
            ServiceError::Unavailable(_) | ServiceError::Other(_) => Self::internal_from(error),
        }
    }
}

/// Failure while loading seed data.
#[derive(Debug, Error)]
pub enum SeedError {
    /// The seed file could not be read.
    #[error("failed to read seed file {path}: {source}")]
    Io {
        /// Path of the seed file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The seed file is not valid seed JSON.
    #[error("invalid seed data: {0}")]
    Parse(#[from] serde_json::Error),

    /// A seed record was rejected by the store.
    #[error("invalid seed record: {0}")]
    Store(#[from] ServiceError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockroom_core::ErrorCategory;

    #[test]
    fn test_invalid_record_is_validation() {
        let error: ApiError = ServiceError::InvalidRecord("payload must be a JSON object".into()).into();
        assert_eq!(error.category(), ErrorCategory::Validation);
        assert_eq!(error.message(), "payload must be a JSON object");
    }

    #[test]
    fn test_not_found_keeps_resource_name() {
        let error: ApiError = ServiceError::NotFound {
            resource: "Supplier",
            id: "3".into(),
        }
        .into();
        assert_eq!(error.category(), ErrorCategory::NotFound);
        assert_eq!(error.message(), "Supplier cannot be found");
    }

    #[test]
    fn test_unavailable_is_internal_with_source() {
        let error: ApiError = ServiceError::Unavailable("pool exhausted".into()).into();
        assert_eq!(error.category(), ErrorCategory::Internal);
        assert_eq!(error.message(), "storage unavailable: pool exhausted");
        assert!(std::error::Error::source(&error).is_some());
    }
}
