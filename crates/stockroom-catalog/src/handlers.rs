//! Stage constructors shared by every resource.
//!
//! Each function returns a [`Stage`] ready to be added to a chain with
//! [`ChainBuilder::guard_async`](stockroom_middleware::ChainBuilder::guard_async)
//! or [`ChainBuilder::handler`](stockroom_middleware::ChainBuilder::handler).

use crate::error::ServiceResult;
use crate::service::ResourceService;
use http::StatusCode;
use serde_json::Value;
use std::sync::Arc;
use stockroom_core::{ApiError, Record, Resource};
use stockroom_middleware::stages::Exists;
use stockroom_middleware::{BoxFuture, FnStage, Locals, Outcome, Response, ResponseExt, Stage};

/// Finishes a chain with `{"data": <data>}`.
fn respond(status: StatusCode, data: Value) -> Result<Outcome, ApiError> {
    Ok(Outcome::Responded(Response::data(status, data)))
}

fn rows(records: Vec<Record>) -> Value {
    Value::Array(records.into_iter().map(Value::Object).collect())
}

/// Resolves the record named by the resource's route parameter into shared state.
pub fn exists<S>(resource: Resource, service: Arc<S>) -> impl Stage
where
    S: ResourceService + ?Sized,
{
    Exists::new(
        resource,
        move |id: &str| -> BoxFuture<'static, ServiceResult<Option<Record>>> {
            let service = Arc::clone(&service);
            let id = id.to_string();
            Box::pin(async move { service.read(&id).await })
        },
    )
}

/// Responds with the records returned by `query`.
///
/// Used for the plain collection listing as well as the product aggregates.
pub fn list_with<S, F>(name: &'static str, service: Arc<S>, query: F) -> impl Stage
where
    S: ?Sized + Send + Sync + 'static,
    F: for<'s> Fn(&'s S) -> BoxFuture<'s, ServiceResult<Vec<Record>>> + Send + Sync + 'static,
{
    let query = Arc::new(query);
    FnStage::new(name, move |_ctx, _locals| {
        let service = Arc::clone(&service);
        let query = Arc::clone(&query);
        Box::pin(async move {
            let records = (*query)(&*service).await?;
            respond(StatusCode::OK, rows(records))
        })
    })
}

/// Responds with every record of the resource.
pub fn list<S>(service: Arc<S>) -> impl Stage
where
    S: ResourceService + ?Sized,
{
    list_with("list", service, S::list)
}

/// Responds with the record resolved by an earlier [`exists`] stage.
pub fn read(resource: Resource) -> impl Stage {
    FnStage::new("read", move |_ctx, locals| {
        let record = locals.require(resource.key()).cloned();
        Box::pin(async move { respond(StatusCode::OK, Value::Object(record?)) })
    })
}

/// Creates a record from the request payload and responds `201 Created`.
pub fn create<S>(service: Arc<S>) -> impl Stage
where
    S: ResourceService + ?Sized,
{
    FnStage::new("create", move |ctx, _locals| {
        let service = Arc::clone(&service);
        let payload = ctx
            .body()
            .get("data")
            .cloned()
            .unwrap_or_else(|| Value::Object(Record::new()));
        Box::pin(async move {
            let created = service.create(payload).await?;
            respond(StatusCode::CREATED, Value::Object(created))
        })
    })
}

/// Updates the resolved record with the request payload.
///
/// The resolved record's identifier always replaces any identifier in the
/// payload.
pub fn update<S>(resource: Resource, service: Arc<S>) -> impl Stage
where
    S: ResourceService + ?Sized,
{
    FnStage::new("update", move |ctx, locals| {
        let service = Arc::clone(&service);
        let resolved_id = resolved_id(resource, locals);
        let mut record = ctx.payload().cloned().unwrap_or_default();
        Box::pin(async move {
            record.insert(resource.id_field().to_string(), resolved_id?);
            let updated = service.update(record).await?;
            respond(StatusCode::OK, Value::Object(updated))
        })
    })
}

/// Deletes the resolved record and responds `204 No Content`.
pub fn destroy<S>(resource: Resource, service: Arc<S>) -> impl Stage
where
    S: ResourceService + ?Sized,
{
    FnStage::new("destroy", move |_ctx, locals| {
        let service = Arc::clone(&service);
        let resolved_id = resolved_id(resource, locals);
        Box::pin(async move {
            service.delete(resolved_id?).await?;
            Ok(Outcome::Responded(Response::no_content()))
        })
    })
}

fn resolved_id(resource: Resource, locals: &Locals) -> Result<Value, ApiError> {
    Ok(locals
        .require(resource.key())?
        .get(resource.id_field())
        .cloned()
        .unwrap_or(Value::Null))
}
