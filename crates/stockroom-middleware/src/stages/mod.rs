//! Reusable chain stages.
//!
//! - [`properties`] - Allow-list and required-field validators for request payloads
//! - [`exists`] - Existence resolver that loads an entity by route parameter
//! - [`error_rendering`] - Converts error signals into JSON error envelopes

pub mod error_rendering;
pub mod exists;
pub mod properties;

pub use error_rendering::ErrorRenderer;
pub use exists::Exists;
pub use properties::{HasOnlyValidProperties, HasProperties};
