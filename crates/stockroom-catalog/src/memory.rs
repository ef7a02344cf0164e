//! In-memory collaborator.
//!
//! [`MemoryStore`] keeps one resource's records in a `BTreeMap` keyed by
//! numeric identifier, behind a tokio `RwLock`. It backs the binary when no
//! database is configured and the end-to-end tests.

use crate::error::{ServiceError, ServiceResult};
use crate::service::{ProductsService, ResourceService};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use stockroom_core::{Record, Resource};
use stockroom_middleware::BoxFuture;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct Table {
    rows: BTreeMap<i64, Record>,
    last_id: i64,
}

impl Table {
    fn following_id(&self, resource: Resource) -> ServiceResult<i64> {
        self.last_id.checked_add(1).ok_or_else(|| {
            ServiceError::Unavailable(format!("{} identifiers exhausted", resource.name()))
        })
    }

    fn next_id(&mut self, resource: Resource) -> ServiceResult<i64> {
        self.last_id = self.following_id(resource)?;
        Ok(self.last_id)
    }
}

/// Records of one resource held in memory.
///
/// # Example
///
/// ```
/// use stockroom_catalog::{suppliers, MemoryStore, ResourceService};
/// use serde_json::json;
///
/// # tokio_test::block_on(async {
/// let store = MemoryStore::new(suppliers::SUPPLIER);
/// let created = store.create(json!({ "supplier_name": "Acme" })).await.unwrap();
/// assert_eq!(created["supplier_id"], 1);
///
/// let found = store.read("1").await.unwrap().unwrap();
/// assert_eq!(found["supplier_name"], "Acme");
/// # });
/// ```
#[derive(Debug)]
pub struct MemoryStore {
    resource: Resource,
    table: RwLock<Table>,
}

impl MemoryStore {
    /// Creates an empty store for `resource`.
    #[must_use]
    pub fn new(resource: Resource) -> Self {
        Self {
            resource,
            table: RwLock::new(Table::default()),
        }
    }

    /// Creates a store pre-populated with `records`.
    ///
    /// Records carrying an identifier keep it; the others are numbered after
    /// the highest identifier seen so far.
    pub fn with_records(
        resource: Resource,
        records: impl IntoIterator<Item = Record>,
    ) -> ServiceResult<Self> {
        let mut table = Table::default();
        for record in records {
            let id = match record.get(resource.id_field()) {
                Some(value) => parse_id(value).ok_or_else(|| {
                    ServiceError::InvalidRecord(format!(
                        "{} must be an integer, got {value}",
                        resource.id_field()
                    ))
                })?,
                None => table.following_id(resource)?,
            };
            if table.rows.contains_key(&id) {
                return Err(ServiceError::InvalidRecord(format!(
                    "duplicate {} {id}",
                    resource.id_field()
                )));
            }
            table.last_id = table.last_id.max(id);
            table.rows.insert(id, with_id(resource, id, record));
        }

        Ok(Self {
            resource,
            table: RwLock::new(table),
        })
    }

    /// Returns the resource this store holds.
    #[must_use]
    pub const fn resource(&self) -> &Resource {
        &self.resource
    }

    /// Returns the number of stored records.
    pub async fn len(&self) -> usize {
        self.table.read().await.rows.len()
    }

    /// Returns true if no records are stored.
    pub async fn is_empty(&self) -> bool {
        self.table.read().await.rows.is_empty()
    }
}

impl ResourceService for MemoryStore {
    fn list(&self) -> BoxFuture<'_, ServiceResult<Vec<Record>>> {
        Box::pin(async move { Ok(self.table.read().await.rows.values().cloned().collect()) })
    }

    fn read<'a>(&'a self, id: &'a str) -> BoxFuture<'a, ServiceResult<Option<Record>>> {
        Box::pin(async move {
            let Ok(id) = id.parse::<i64>() else {
                return Ok(None);
            };
            Ok(self.table.read().await.rows.get(&id).cloned())
        })
    }

    fn create(&self, payload: Value) -> BoxFuture<'_, ServiceResult<Record>> {
        Box::pin(async move {
            let Value::Object(fields) = payload else {
                return Err(ServiceError::InvalidRecord(format!(
                    "{} payload must be a JSON object",
                    self.resource.name()
                )));
            };

            let mut table = self.table.write().await;
            let id = table.next_id(self.resource)?;
            let record = with_id(self.resource, id, fields);
            table.rows.insert(id, record.clone());
            tracing::debug!(resource = self.resource.name(), id, "record created");
            Ok(record)
        })
    }

    fn update(&self, record: Record) -> BoxFuture<'_, ServiceResult<Record>> {
        Box::pin(async move {
            let id_field = self.resource.id_field();
            let id = record.get(id_field).and_then(parse_id).ok_or_else(|| {
                ServiceError::InvalidRecord(format!("{id_field} must be an integer"))
            })?;

            let mut table = self.table.write().await;
            let row = table.rows.get_mut(&id).ok_or_else(|| ServiceError::NotFound {
                resource: self.resource.name(),
                id: id.to_string(),
            })?;
            for (field, value) in record {
                if field != id_field {
                    row.insert(field, value);
                }
            }
            tracing::debug!(resource = self.resource.name(), id, "record updated");
            Ok(row.clone())
        })
    }

    fn delete(&self, id: Value) -> BoxFuture<'_, ServiceResult<u64>> {
        Box::pin(async move {
            let Some(id) = parse_id(&id) else {
                return Ok(0);
            };
            let removed = self.table.write().await.rows.remove(&id);
            tracing::debug!(
                resource = self.resource.name(),
                id,
                removed = removed.is_some(),
                "record deleted"
            );
            Ok(u64::from(removed.is_some()))
        })
    }
}

/// Aggregate queries over product records.
///
/// Implemented for every store, but only meaningful for one holding products.
impl ProductsService for MemoryStore {
    fn list_out_of_stock_count(&self) -> BoxFuture<'_, ServiceResult<Vec<Record>>> {
        Box::pin(async move {
            let table = self.table.read().await;
            Ok(out_of_stock_count(table.rows.values()))
        })
    }

    fn list_price_summary(&self) -> BoxFuture<'_, ServiceResult<Vec<Record>>> {
        Box::pin(async move {
            let table = self.table.read().await;
            Ok(price_summary(table.rows.values()))
        })
    }

    fn list_total_weight_by_product(&self) -> BoxFuture<'_, ServiceResult<Vec<Record>>> {
        Box::pin(async move {
            let table = self.table.read().await;
            Ok(total_weight_by_product(table.rows.values()))
        })
    }
}

/// Rebuilds `fields` with the identifier as the first field.
fn with_id(resource: Resource, id: i64, fields: Record) -> Record {
    let mut record = Record::with_capacity(fields.len() + 1);
    record.insert(resource.id_field().to_string(), Value::from(id));
    record.extend(
        fields
            .into_iter()
            .filter(|(field, _)| field != resource.id_field()),
    );
    record
}

/// Reads an identifier stored either as a JSON integer or a numeric string.
fn parse_id(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

/// Reads a number stored either as a JSON number or a numeric string.
fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

fn field_number(record: &Record, field: &str) -> Option<f64> {
    record.get(field).and_then(number)
}

fn into_record(value: Value) -> Record {
    match value {
        Value::Object(record) => record,
        _ => Record::new(),
    }
}

fn out_of_stock_count<'r>(products: impl Iterator<Item = &'r Record>) -> Vec<Record> {
    let count = products
        .filter(|product| {
            field_number(product, "product_quantity_in_stock")
                .is_some_and(|qty| qty.abs() < f64::EPSILON)
        })
        .count();

    if count == 0 {
        Vec::new()
    } else {
        vec![into_record(json!({ "out_of_stock": true, "count": count }))]
    }
}

fn price_summary<'r>(products: impl Iterator<Item = &'r Record>) -> Vec<Record> {
    let mut prices: BTreeMap<i64, Vec<f64>> = BTreeMap::new();
    for product in products {
        let supplier = product.get("supplier_id").and_then(parse_id);
        let price = field_number(product, "product_price");
        if let (Some(supplier), Some(price)) = (supplier, price) {
            prices.entry(supplier).or_default().push(price);
        }
    }

    prices
        .into_iter()
        .map(|(supplier_id, prices)| {
            let min = prices.iter().copied().fold(f64::INFINITY, f64::min);
            let max = prices.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            let avg = prices.iter().sum::<f64>() / prices.len() as f64;
            into_record(json!({
                "supplier_id": supplier_id,
                "min": min,
                "max": max,
                "avg": avg,
            }))
        })
        .collect()
}

fn total_weight_by_product<'r>(products: impl Iterator<Item = &'r Record>) -> Vec<Record> {
    let mut totals: BTreeMap<(String, String), f64> = BTreeMap::new();
    for product in products {
        let Some(sku) = product.get("product_sku").and_then(Value::as_str) else {
            continue;
        };
        let title = product
            .get("product_title")
            .and_then(Value::as_str)
            .unwrap_or_default();
        let weight = field_number(product, "product_weight_in_lbs").unwrap_or(0.0);
        let quantity = field_number(product, "product_quantity_in_stock").unwrap_or(0.0);

        *totals
            .entry((sku.to_string(), title.to_string()))
            .or_insert(0.0) += weight * quantity;
    }

    totals
        .into_iter()
        .map(|((sku, title), total)| {
            into_record(json!({
                "product_sku": sku,
                "product_title": title,
                "total_weight_in_lbs": total,
            }))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::products::PRODUCT;
    use crate::suppliers::SUPPLIER;

    fn record(value: Value) -> Record {
        into_record(value)
    }

    fn product(id: i64, supplier: i64, sku: &str, price: f64, weight: f64, qty: i64) -> Record {
        record(json!({
            "product_id": id,
            "supplier_id": supplier,
            "product_sku": sku,
            "product_title": format!("Item {sku}"),
            "product_price": price,
            "product_weight_in_lbs": weight,
            "product_quantity_in_stock": qty,
        }))
    }

    fn products() -> MemoryStore {
        MemoryStore::with_records(
            PRODUCT,
            [
                product(1, 2, "A-1", 10.0, 2.0, 3),
                product(2, 1, "B-2", 4.0, 1.5, 0),
                product(3, 2, "C-3", 20.0, 0.5, 10),
                product(4, 1, "D-4", 6.0, 1.0, 0),
            ],
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_create_assigns_sequential_ids() {
        let store = MemoryStore::new(SUPPLIER);
        let first = store.create(json!({ "supplier_name": "Acme" })).await.unwrap();
        let second = store.create(json!({ "supplier_name": "Globex" })).await.unwrap();

        assert_eq!(first["supplier_id"], 1);
        assert_eq!(second["supplier_id"], 2);
        assert_eq!(first.keys().next().map(String::as_str), Some("supplier_id"));
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn test_create_rejects_non_object_payload() {
        let store = MemoryStore::new(SUPPLIER);
        let error = store.create(json!(["not", "an", "object"])).await.unwrap_err();
        assert!(matches!(error, ServiceError::InvalidRecord(_)));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_read_unknown_and_non_numeric_ids() {
        let store = MemoryStore::new(SUPPLIER);
        store.create(json!({ "supplier_name": "Acme" })).await.unwrap();

        assert!(store.read("1").await.unwrap().is_some());
        assert!(store.read("2").await.unwrap().is_none());
        assert!(store.read("abc").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_merges_fields() {
        let store = MemoryStore::new(SUPPLIER);
        store
            .create(json!({ "supplier_name": "Acme", "supplier_city": "Oslo" }))
            .await
            .unwrap();

        let updated = store
            .update(record(json!({ "supplier_id": 1, "supplier_name": "Acme AS" })))
            .await
            .unwrap();
        assert_eq!(updated["supplier_name"], "Acme AS");
        assert_eq!(updated["supplier_city"], "Oslo");
    }

    #[tokio::test]
    async fn test_update_missing_record() {
        let store = MemoryStore::new(SUPPLIER);
        let error = store
            .update(record(json!({ "supplier_id": 5, "supplier_name": "Ghost" })))
            .await
            .unwrap_err();
        assert!(matches!(error, ServiceError::NotFound { resource: "Supplier", .. }));
    }

    #[tokio::test]
    async fn test_delete_reports_removed_count() {
        let store = MemoryStore::new(SUPPLIER);
        store.create(json!({ "supplier_name": "Acme" })).await.unwrap();

        assert_eq!(store.delete(json!(1)).await.unwrap(), 1);
        assert_eq!(store.delete(json!(1)).await.unwrap(), 0);
        assert!(store.is_empty().await);
    }

    #[test]
    fn test_with_records_keeps_ids_and_continues_numbering() {
        let store = MemoryStore::with_records(
            SUPPLIER,
            [
                record(json!({ "supplier_id": 7, "supplier_name": "Acme" })),
                record(json!({ "supplier_name": "Globex" })),
            ],
        )
        .unwrap();
        let table = store.table.try_read().unwrap();
        let ids: Vec<i64> = table.rows.keys().copied().collect();
        assert_eq!(ids, vec![7, 8]);
    }

    #[test]
    fn test_with_records_rejects_duplicates() {
        let result = MemoryStore::with_records(
            SUPPLIER,
            [
                record(json!({ "supplier_id": 1 })),
                record(json!({ "supplier_id": "1" })),
            ],
        );
        assert!(matches!(result, Err(ServiceError::InvalidRecord(_))));
    }

    #[tokio::test]
    async fn test_create_after_largest_id_fails_cleanly() {
        let store =
            MemoryStore::with_records(SUPPLIER, [record(json!({ "supplier_id": i64::MAX }))])
                .unwrap();

        let error = store.create(json!({ "supplier_name": "Next" })).await.unwrap_err();
        assert!(matches!(error, ServiceError::Unavailable(_)));
        assert_eq!(store.len().await, 1);
        assert!(store.read(&i64::MAX.to_string()).await.unwrap().is_some());
    }

    #[test]
    fn test_with_records_rejects_id_after_largest() {
        let result = MemoryStore::with_records(
            SUPPLIER,
            [
                record(json!({ "supplier_id": i64::MAX })),
                record(json!({ "supplier_name": "no id" })),
            ],
        );
        assert!(matches!(result, Err(ServiceError::Unavailable(_))));
    }

    #[tokio::test]
    async fn test_out_of_stock_count() {
        let rows = products().list_out_of_stock_count().await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["out_of_stock"], true);
        assert_eq!(rows[0]["count"], 2);
    }

    #[tokio::test]
    async fn test_out_of_stock_count_ignores_negative_stock() {
        let store = MemoryStore::with_records(
            PRODUCT,
            [product(1, 1, "A-1", 1.0, 1.0, -2), product(2, 1, "B-2", 1.0, 1.0, 0)],
        )
        .unwrap();
        let rows = store.list_out_of_stock_count().await.unwrap();
        assert_eq!(rows[0]["count"], 1);
    }

    #[tokio::test]
    async fn test_out_of_stock_count_empty_when_all_stocked() {
        let store =
            MemoryStore::with_records(PRODUCT, [product(1, 1, "A-1", 1.0, 1.0, 5)]).unwrap();
        assert!(store.list_out_of_stock_count().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_price_summary_per_supplier() {
        let rows = products().list_price_summary().await.unwrap();
        assert_eq!(rows.len(), 2);

        assert_eq!(rows[0]["supplier_id"], 1);
        assert_eq!(rows[0]["min"], 4.0);
        assert_eq!(rows[0]["max"], 6.0);
        assert_eq!(rows[0]["avg"], 5.0);

        assert_eq!(rows[1]["supplier_id"], 2);
        assert_eq!(rows[1]["min"], 10.0);
        assert_eq!(rows[1]["max"], 20.0);
        assert_eq!(rows[1]["avg"], 15.0);
    }

    #[tokio::test]
    async fn test_total_weight_by_product() {
        let rows = products().list_total_weight_by_product().await.unwrap();
        assert_eq!(rows.len(), 4);

        assert_eq!(rows[0]["product_sku"], "A-1");
        assert_eq!(rows[0]["product_title"], "Item A-1");
        assert_eq!(rows[0]["total_weight_in_lbs"], 6.0);
        assert_eq!(rows[2]["product_sku"], "C-3");
        assert_eq!(rows[2]["total_weight_in_lbs"], 5.0);
    }
}
