//! # Stockroom Test
//!
//! In-memory testing for Stockroom applications. Requests go through the full
//! [`App`](stockroom_server::App) dispatch (routing, body parsing, chains and
//! error rendering) without binding a socket.
//!
//! - [`TestClient`] - Fluent request builder driving an `App`
//! - [`TestResponse`] - Collected response with JSON helpers and assertions
//! - [`RecordingService`] - Collaborator that records every call before delegating
//!   to an in-memory store
//!
//! ## Example
//!
//! ```
//! use http::{Method, StatusCode};
//! use stockroom_middleware::{Chain, FnStage, Response, ResponseExt};
//! use stockroom_server::App;
//! use stockroom_test::TestClient;
//!
//! # tokio_test::block_on(async {
//! let chain = Chain::builder().handler(FnStage::new("hello", |_, _| {
//!     Box::pin(async { Ok(Response::data(StatusCode::OK, "hi".into()).into()) })
//! }));
//! let app = App::builder().route(Method::GET, "/hello", chain).build().unwrap();
//! let client = TestClient::new(app);
//!
//! let response = client.get("/hello").send().await;
//! response.assert_status(StatusCode::OK);
//! assert_eq!(response.data().unwrap(), "hi");
//! # });
//! ```

#![doc(html_root_url = "https://docs.rs/stockroom-test/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod client;
mod error;
mod recording;
mod response;

pub use client::{TestClient, TestRequest};
pub use error::TestError;
pub use recording::{Call, RecordingService, RecordingServices};
pub use response::TestResponse;
