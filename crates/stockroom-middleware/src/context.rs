//! Per-request shared state passed between chain stages.

use std::collections::HashMap;

use stockroom_core::{ApiError, Record};

/// Records resolved by earlier stages, keyed by resource key.
///
/// An existence resolver stores the record it found (for example under
/// `"supplier"`) and later stages in the same chain read it back. A fresh
/// `Locals` is created for every request.
#[derive(Debug, Clone, Default)]
pub struct Locals {
    entries: HashMap<String, Record>,
}

impl Locals {
    /// Creates empty shared state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a record, returning the previous record under the same key.
    pub fn insert(&mut self, key: impl Into<String>, record: Record) -> Option<Record> {
        self.entries.insert(key.into(), record)
    }

    /// Returns the record stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Record> {
        self.entries.get(key)
    }

    /// Returns the record stored under `key`, or an internal error when an
    /// earlier stage did not resolve it.
    pub fn require(&self, key: &str) -> Result<&Record, ApiError> {
        self.entries
            .get(key)
            .ok_or_else(|| ApiError::internal(format!("no '{key}' was resolved for this request")))
    }

    /// Returns true if a record is stored under `key`.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Returns the number of stored records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing has been stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
