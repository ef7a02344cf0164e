//! Recording collaborators.
//!
//! [`RecordingService`] wraps a [`MemoryStore`] and logs every call it
//! receives, so tests can assert both what a handler passed to the
//! collaborator and that a rejected request never reached it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde_json::Value;
use stockroom_catalog::{
    categories, products, suppliers, MemoryStore, ProductsService, ResourceService, SeedData,
    ServiceError, ServiceResult, Services,
};
use stockroom_core::Record;
use stockroom_middleware::BoxFuture;
use tokio::sync::Mutex;

/// A collaborator call, with the arguments it received.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    /// `list()`
    List,
    /// `read(id)`
    Read(String),
    /// `create(payload)`
    Create(Value),
    /// `update(record)`
    Update(Record),
    /// `delete(id)`
    Delete(Value),
    /// `list_out_of_stock_count()`
    OutOfStockCount,
    /// `list_price_summary()`
    PriceSummary,
    /// `list_total_weight_by_product()`
    TotalWeightByProduct,
}

/// A collaborator that records calls before delegating to a [`MemoryStore`].
///
/// ```
/// use stockroom_catalog::{suppliers, MemoryStore, ResourceService};
/// use stockroom_test::{Call, RecordingService};
///
/// # tokio_test::block_on(async {
/// let service = RecordingService::new(MemoryStore::new(suppliers::SUPPLIER));
/// service.read("1").await.unwrap();
///
/// assert_eq!(service.calls().await, vec![Call::Read("1".into())]);
/// # });
/// ```
#[derive(Debug)]
pub struct RecordingService {
    inner: MemoryStore,
    calls: Mutex<Vec<Call>>,
    delete_result: Option<u64>,
    unavailable: AtomicBool,
}

impl RecordingService {
    /// Wraps `inner`.
    #[must_use]
    pub fn new(inner: MemoryStore) -> Self {
        Self {
            inner,
            calls: Mutex::new(Vec::new()),
            delete_result: None,
            unavailable: AtomicBool::new(false),
        }
    }

    /// Makes `delete` report `count` removed records instead of the real count.
    #[must_use]
    pub fn with_delete_result(mut self, count: u64) -> Self {
        self.delete_result = Some(count);
        self
    }

    /// When set, every call is still recorded but then fails with
    /// [`ServiceError::Unavailable`].
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Returns the wrapped store.
    #[must_use]
    pub fn store(&self) -> &MemoryStore {
        &self.inner
    }

    /// Returns every recorded call in order.
    pub async fn calls(&self) -> Vec<Call> {
        self.calls.lock().await.clone()
    }

    /// Returns the payloads passed to `create`.
    pub async fn creates(&self) -> Vec<Value> {
        self.calls
            .lock()
            .await
            .iter()
            .filter_map(|call| match call {
                Call::Create(payload) => Some(payload.clone()),
                _ => None,
            })
            .collect()
    }

    /// Returns the records passed to `update`.
    pub async fn updates(&self) -> Vec<Record> {
        self.calls
            .lock()
            .await
            .iter()
            .filter_map(|call| match call {
                Call::Update(record) => Some(record.clone()),
                _ => None,
            })
            .collect()
    }

    async fn record(&self, call: Call) -> ServiceResult<()> {
        self.calls.lock().await.push(call);
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(ServiceError::Unavailable(format!(
                "{} store offline",
                self.inner.resource().name()
            )));
        }
        Ok(())
    }
}

impl ResourceService for RecordingService {
    fn list(&self) -> BoxFuture<'_, ServiceResult<Vec<Record>>> {
        Box::pin(async move {
            self.record(Call::List).await?;
            self.inner.list().await
        })
    }

    fn read<'a>(&'a self, id: &'a str) -> BoxFuture<'a, ServiceResult<Option<Record>>> {
        Box::pin(async move {
            self.record(Call::Read(id.to_string())).await?;
            self.inner.read(id).await
        })
    }

    fn create(&self, payload: Value) -> BoxFuture<'_, ServiceResult<Record>> {
        Box::pin(async move {
            self.record(Call::Create(payload.clone())).await?;
            self.inner.create(payload).await
        })
    }

    fn update(&self, record: Record) -> BoxFuture<'_, ServiceResult<Record>> {
        Box::pin(async move {
            self.record(Call::Update(record.clone())).await?;
            self.inner.update(record).await
        })
    }

    fn delete(&self, id: Value) -> BoxFuture<'_, ServiceResult<u64>> {
        Box::pin(async move {
            self.record(Call::Delete(id.clone())).await?;
            let removed = self.inner.delete(id).await?;
            Ok(self.delete_result.unwrap_or(removed))
        })
    }
}

impl ProductsService for RecordingService {
    fn list_out_of_stock_count(&self) -> BoxFuture<'_, ServiceResult<Vec<Record>>> {
        Box::pin(async move {
            self.record(Call::OutOfStockCount).await?;
            self.inner.list_out_of_stock_count().await
        })
    }

    fn list_price_summary(&self) -> BoxFuture<'_, ServiceResult<Vec<Record>>> {
        Box::pin(async move {
            self.record(Call::PriceSummary).await?;
            self.inner.list_price_summary().await
        })
    }

    fn list_total_weight_by_product(&self) -> BoxFuture<'_, ServiceResult<Vec<Record>>> {
        Box::pin(async move {
            self.record(Call::TotalWeightByProduct).await?;
            self.inner.list_total_weight_by_product().await
        })
    }
}

/// One recording collaborator per resource.
#[derive(Debug, Clone)]
pub struct RecordingServices {
    /// Category collaborator.
    pub categories: Arc<RecordingService>,
    /// Product collaborator.
    pub products: Arc<RecordingService>,
    /// Supplier collaborator.
    pub suppliers: Arc<RecordingService>,
}

impl RecordingServices {
    /// Empty recording collaborators.
    #[must_use]
    pub fn new() -> Self {
        Self {
            categories: Arc::new(RecordingService::new(MemoryStore::new(categories::CATEGORY))),
            products: Arc::new(RecordingService::new(MemoryStore::new(products::PRODUCT))),
            suppliers: Arc::new(RecordingService::new(MemoryStore::new(suppliers::SUPPLIER))),
        }
    }

    /// Recording collaborators pre-populated from seed data.
    pub fn from_seed(seed: SeedData) -> ServiceResult<Self> {
        Ok(Self {
            categories: Arc::new(RecordingService::new(MemoryStore::with_records(
                categories::CATEGORY,
                seed.categories,
            )?)),
            products: Arc::new(RecordingService::new(MemoryStore::with_records(
                products::PRODUCT,
                seed.products,
            )?)),
            suppliers: Arc::new(RecordingService::new(MemoryStore::with_records(
                suppliers::SUPPLIER,
                seed.suppliers,
            )?)),
        })
    }

    /// Replaces the supplier collaborator, for tests that need a customised one.
    #[must_use]
    pub fn with_suppliers(mut self, suppliers: RecordingService) -> Self {
        self.suppliers = Arc::new(suppliers);
        self
    }

    /// Returns the collaborators as the trait objects the controllers use.
    #[must_use]
    pub fn services(&self) -> Services {
        Services {
            categories: Arc::clone(&self.categories) as Arc<dyn ResourceService>,
            products: Arc::clone(&self.products) as Arc<dyn ProductsService>,
            suppliers: Arc::clone(&self.suppliers) as Arc<dyn ResourceService>,
        }
    }
}

impl Default for RecordingServices {
    fn default() -> Self {
        Self::new()
    }
}
