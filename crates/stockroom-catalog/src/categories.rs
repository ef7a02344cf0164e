//! Category routes.

use crate::handlers;
use crate::routes::RouteDef;
use crate::service::ResourceService;
use http::Method;
use std::sync::Arc;
use stockroom_core::Resource;
use stockroom_middleware::Chain;

/// The category resource.
pub const CATEGORY: Resource = Resource::new("Category", "category", "category_id", "categoryId");

/// `GET /categories`
pub fn list_chain<S: ResourceService + ?Sized>(service: Arc<S>) -> Chain {
    Chain::builder().handler(handlers::list(service))
}

/// `GET /categories/{categoryId}`
pub fn read_chain<S: ResourceService + ?Sized>(service: Arc<S>) -> Chain {
    Chain::builder()
        .guard_async(handlers::exists(CATEGORY, service))
        .handler(handlers::read(CATEGORY))
}

/// Every category route.
pub fn routes<S: ResourceService + ?Sized>(service: Arc<S>) -> Vec<RouteDef> {
    vec![
        RouteDef::new(Method::GET, "/categories", list_chain(Arc::clone(&service))),
        RouteDef::new(Method::GET, "/categories/{categoryId}", read_chain(service)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStore;
    use http::StatusCode;
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use stockroom_core::{ErrorCategory, Params, Record, RequestContext};
    use stockroom_middleware::Response;

    fn store() -> Arc<MemoryStore> {
        let records = [
            json!({ "category_id": 1, "category_name": "Tools" }),
            json!({ "category_id": 2, "category_name": "Paint" }),
        ]
        .into_iter()
        .filter_map(|v| v.as_object().cloned())
        .collect::<Vec<Record>>();
        Arc::new(MemoryStore::with_records(CATEGORY, records).unwrap())
    }

    async fn body(response: Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn read_ctx(id: &str) -> RequestContext {
        let params: Params = [("categoryId", id)].into_iter().collect();
        RequestContext::new(Method::GET, format!("/categories/{id}")).with_params(params)
    }

    #[tokio::test]
    async fn test_list_wraps_collection() {
        let response = list_chain(store())
            .run(&RequestContext::new(Method::GET, "/categories"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body(response).await;
        assert_eq!(body["data"].as_array().unwrap().len(), 2);
        assert_eq!(body["data"][1]["category_name"], "Paint");
    }

    #[tokio::test]
    async fn test_read_known_category() {
        let response = read_chain(store()).run(&read_ctx("2")).await.unwrap();
        assert_eq!(
            body(response).await,
            json!({ "data": { "category_id": 2, "category_name": "Paint" } })
        );
    }

    #[tokio::test]
    async fn test_read_unknown_category() {
        let error = read_chain(store()).run(&read_ctx("9")).await.unwrap_err();
        assert_eq!(error.category(), ErrorCategory::NotFound);
        assert_eq!(error.message(), "Category cannot be found");
    }

    #[test]
    fn test_routes() {
        let routes = routes(store());
        let paths: Vec<&str> = routes.iter().map(RouteDef::path).collect();
        assert_eq!(paths, vec!["/categories", "/categories/{categoryId}"]);
    }
}
