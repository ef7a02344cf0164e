//! Seed data for the in-memory collaborators.
//!
//! A seed file is a JSON object with optional `categories`, `products` and
//! `suppliers` arrays of records:
//!
//! ```json
//! {
//!     "categories": [{ "category_id": 1, "category_name": "Tools" }],
//!     "suppliers": [{ "supplier_id": 1, "supplier_name": "Acme" }]
//! }
//! ```

use crate::error::SeedError;
use serde::Deserialize;
use std::path::Path;
use stockroom_core::Record;

/// Initial records per resource.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SeedData {
    /// Category records.
    pub categories: Vec<Record>,
    /// Product records.
    pub products: Vec<Record>,
    /// Supplier records.
    pub suppliers: Vec<Record>,
}

impl SeedData {
    /// Parses seed data from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, SeedError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads seed data from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SeedError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| SeedError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Returns the total number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.categories.len() + self.products.len() + self.suppliers.len()
    }

    /// Returns true if there are no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
