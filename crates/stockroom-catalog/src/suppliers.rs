//! Supplier routes.
//!
//! Suppliers are the only writable resource. Create and update payloads
//! are checked against [`VALID_PROPERTIES`] and [`REQUIRED_PROPERTIES`]
//! before the collaborator is called.

use crate::handlers;
use crate::routes::RouteDef;
use crate::service::ResourceService;
use http::Method;
use std::sync::Arc;
use stockroom_core::Resource;
use stockroom_middleware::stages::{HasOnlyValidProperties, HasProperties};
use stockroom_middleware::Chain;

/// The supplier resource.
pub const SUPPLIER: Resource = Resource::new("Supplier", "supplier", "supplier_id", "supplierId");

/// Fields a supplier payload may contain.
pub const VALID_PROPERTIES: &[&str] = &[
    "supplier_name",
    "supplier_address_line_1",
    "supplier_address_line_2",
    "supplier_city",
    "supplier_state",
    "supplier_zip",
    "supplier_phone",
    "supplier_email",
    "supplier_notes",
    "supplier_type_of_goods",
];

/// Fields a supplier payload must contain, checked in this order.
pub const REQUIRED_PROPERTIES: &[&str] = &["supplier_name", "supplier_email"];

fn has_only_valid_properties() -> HasOnlyValidProperties {
    HasOnlyValidProperties::new(VALID_PROPERTIES.iter().copied())
}

fn has_required_properties() -> HasProperties {
    HasProperties::new(REQUIRED_PROPERTIES.iter().copied())
}

/// `GET /suppliers`
pub fn list_chain<S: ResourceService + ?Sized>(service: Arc<S>) -> Chain {
    Chain::builder().handler(handlers::list(service))
}

/// `POST /suppliers`
pub fn create_chain<S: ResourceService + ?Sized>(service: Arc<S>) -> Chain {
    Chain::builder()
        .guard(has_only_valid_properties())
        .guard(has_required_properties())
        .handler(handlers::create(service))
}

/// `GET /suppliers/{supplierId}`
pub fn read_chain<S: ResourceService + ?Sized>(service: Arc<S>) -> Chain {
    Chain::builder()
        .guard_async(handlers::exists(SUPPLIER, service))
        .handler(handlers::read(SUPPLIER))
}

/// `PUT /suppliers/{supplierId}`
pub fn update_chain<S: ResourceService + ?Sized>(service: Arc<S>) -> Chain {
    Chain::builder()
        .guard_async(handlers::exists(SUPPLIER, Arc::clone(&service)))
        .guard(has_only_valid_properties())
        .guard(has_required_properties())
        .handler(handlers::update(SUPPLIER, service))
}

/// `DELETE /suppliers/{supplierId}`
pub fn delete_chain<S: ResourceService + ?Sized>(service: Arc<S>) -> Chain {
    Chain::builder()
        .guard_async(handlers::exists(SUPPLIER, Arc::clone(&service)))
        .handler(handlers::destroy(SUPPLIER, service))
}

/// Every supplier route.
pub fn routes<S: ResourceService + ?Sized>(service: Arc<S>) -> Vec<RouteDef> {
    vec![
        RouteDef::new(Method::GET, "/suppliers", list_chain(Arc::clone(&service))),
        RouteDef::new(Method::POST, "/suppliers", create_chain(Arc::clone(&service))),
        RouteDef::new(
            Method::GET,
            "/suppliers/{supplierId}",
            read_chain(Arc::clone(&service)),
        ),
        RouteDef::new(
            Method::PUT,
            "/suppliers/{supplierId}",
            update_chain(Arc::clone(&service)),
        ),
        RouteDef::new(Method::DELETE, "/suppliers/{supplierId}", delete_chain(service)),
    ]
}
