//! Product routes, including the aggregate reports.

use crate::handlers;
use crate::routes::RouteDef;
use crate::service::ProductsService;
use http::Method;
use std::sync::Arc;
use stockroom_core::Resource;
use stockroom_middleware::Chain;

/// The product resource.
pub const PRODUCT: Resource = Resource::new("Product", "product", "product_id", "productId");

/// `GET /products`
pub fn list_chain<S: ProductsService + ?Sized>(service: Arc<S>) -> Chain {
    Chain::builder().handler(handlers::list(service))
}

/// `GET /products/{productId}`
pub fn read_chain<S: ProductsService + ?Sized>(service: Arc<S>) -> Chain {
    Chain::builder()
        .guard_async(handlers::exists(PRODUCT, service))
        .handler(handlers::read(PRODUCT))
}

/// `GET /products/out-of-stock-count`
pub fn out_of_stock_count_chain<S: ProductsService + ?Sized>(service: Arc<S>) -> Chain {
    Chain::builder().handler(handlers::list_with(
        "out_of_stock_count",
        service,
        S::list_out_of_stock_count,
    ))
}

/// `GET /products/price-summary`
pub fn price_summary_chain<S: ProductsService + ?Sized>(service: Arc<S>) -> Chain {
    Chain::builder().handler(handlers::list_with(
        "price_summary",
        service,
        S::list_price_summary,
    ))
}

/// `GET /products/total-weight-by-product`
pub fn total_weight_by_product_chain<S: ProductsService + ?Sized>(service: Arc<S>) -> Chain {
    Chain::builder().handler(handlers::list_with(
        "total_weight_by_product",
        service,
        S::list_total_weight_by_product,
    ))
}

/// Every product route. Report paths precede `/products/{productId}`.
pub fn routes<S: ProductsService + ?Sized>(service: Arc<S>) -> Vec<RouteDef> {
    vec![
        RouteDef::new(Method::GET, "/products", list_chain(Arc::clone(&service))),
        RouteDef::new(
            Method::GET,
            "/products/out-of-stock-count",
            out_of_stock_count_chain(Arc::clone(&service)),
        ),
        RouteDef::new(
            Method::GET,
            "/products/price-summary",
            price_summary_chain(Arc::clone(&service)),
        ),
        RouteDef::new(
            Method::GET,
            "/products/total-weight-by-product",
            total_weight_by_product_chain(Arc::clone(&service)),
        ),
        RouteDef::new(Method::GET, "/products/{productId}", read_chain(service)),
    ]
}
