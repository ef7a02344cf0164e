//! Persistence collaborator interfaces.
//!
//! Controllers never touch storage directly. Each resource is backed by a
//! [`ResourceService`]; products additionally expose the aggregate queries
//! of [`ProductsService`]. Implementations are shared across requests behind
//! an `Arc` and must be safe to call concurrently.

use crate::error::ServiceResult;
use serde_json::Value;
use stockroom_core::Record;
use stockroom_middleware::BoxFuture;

/// CRUD operations for one resource.
pub trait ResourceService: Send + Sync + 'static {
    /// Returns every record.
    fn list(&self) -> BoxFuture<'_, ServiceResult<Vec<Record>>>;

    /// Returns the record with the given identifier, if any.
    ///
    /// Identifiers come straight from the request path, so an identifier
    /// that cannot name any record yields `Ok(None)` rather than an error.
    fn read<'a>(&'a self, id: &'a str) -> BoxFuture<'a, ServiceResult<Option<Record>>>;

    /// Stores a new record built from `payload` and returns it with its identifier.
    fn create(&self, payload: Value) -> BoxFuture<'_, ServiceResult<Record>>;

    /// Updates the record identified inside `record` and returns the stored result.
    fn update(&self, record: Record) -> BoxFuture<'_, ServiceResult<Record>>;

    /// Removes the record with the given identifier, returning how many were removed.
    fn delete(&self, id: Value) -> BoxFuture<'_, ServiceResult<u64>>;
}

/// Product collaborator with aggregate queries.
pub trait ProductsService: ResourceService {
    /// Number of products with no stock left.
    fn list_out_of_stock_count(&self) -> BoxFuture<'_, ServiceResult<Vec<Record>>>;

    /// Minimum, maximum and average product price per supplier.
    fn list_price_summary(&self) -> BoxFuture<'_, ServiceResult<Vec<Record>>>;

    /// Total stocked weight per product.
    fn list_total_weight_by_product(&self) -> BoxFuture<'_, ServiceResult<Vec<Record>>>;
}
