//! # Stockroom Core
//!
//! Core types shared by every Stockroom crate:
//!
//! - [`ApiError`] - The error signal raised by chain stages
//! - [`ErrorCategory`] - Classification of an error signal (bad request, not found, ...)
//! - [`RequestContext`] - Immutable per-request parameters and parsed body
//! - [`RequestId`] - UUID v7 request identifier
//! - [`Resource`] - Static descriptor of an API resource
//! - [`Record`] - An opaque entity record (a JSON object)

#![doc(html_root_url = "https://docs.rs/stockroom-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod context;
mod error;
mod resource;

pub use context::{Params, RequestContext, RequestId};
pub use error::{ApiError, ApiResult, ErrorCategory, ErrorDetail, ErrorEnvelope};
pub use resource::Resource;

/// An entity record as exchanged with the persistence collaborators.
///
/// Records are opaque to the request pipeline apart from their identifier
/// field and whichever fields validators inspect.
pub type Record = serde_json::Map<String, serde_json::Value>;
