//! # Stockroom Middleware
//!
//! Ordered middleware chains for the Stockroom resource API.
//!
//! Every route is served by a [`Chain`]: zero or more guard stages followed
//! by exactly one terminal stage that produces the response. Stages run
//! strictly in declaration order and each one finishes before the next begins.
//!
//! ```text
//! Request → guard → guard → ... → handler → Response
//!              │       │            │
//!              └───────┴─── Fail ───┴──→ ErrorRenderer → error envelope
//! ```
//!
//! A stage reports one of three [`Outcome`]s:
//!
//! | Outcome | Effect |
//! |---------|--------|
//! | `Continue` | Run the next stage |
//! | `Fail(ApiError)` | Skip every remaining stage and render the error |
//! | `Responded(Response)` | Finish the chain with this response |
//!
//! Asynchronous stages are written against [`Stage`], whose futures may fail
//! with any error convertible into [`ApiError`](stockroom_core::ApiError).
//! The chain builder wraps them in an [`ErrorBoundary`], which turns such a
//! failure into `Outcome::Fail` instead of letting it escape the chain.
//!
//! ## Example
//!
//! ```
//! use stockroom_core::RequestContext;
//! use stockroom_middleware::stages::HasProperties;
//! use stockroom_middleware::{Chain, FnStage, Outcome, Response, ResponseExt};
//! use http::{Method, StatusCode};
//! use serde_json::json;
//!
//! # tokio_test::block_on(async {
//! let chain = Chain::builder()
//!     .guard(HasProperties::new(["supplier_name"]))
//!     .handler(FnStage::new("create", |_ctx, _locals| {
//!         Box::pin(async { Ok(Response::data(StatusCode::CREATED, json!({ "supplier_id": 1 })).into()) })
//!     }));
//!
//! let ctx = RequestContext::new(Method::POST, "/suppliers")
//!     .with_body(json!({ "data": { "supplier_name": "Acme" } }));
//! let response = chain.run(&ctx).await.unwrap();
//! assert_eq!(response.status(), StatusCode::CREATED);
//! # });
//! ```

#![doc(html_root_url = "https://docs.rs/stockroom-middleware/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod boundary;
pub mod chain;
pub mod context;
pub mod middleware;
pub mod stages;
pub mod types;

pub use boundary::{ErrorBoundary, FnStage, Stage};
pub use chain::{BoxedMiddleware, Chain, ChainBuilder};
pub use context::Locals;
pub use middleware::{BoxFuture, FnMiddleware, Middleware, Outcome};
pub use types::{Response, ResponseExt};
