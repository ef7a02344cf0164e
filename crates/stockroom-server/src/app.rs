//! Socket-free request dispatch.
//!
//! [`App`] owns the route table and the error renderer. Given a method, path
//! and raw body it produces exactly one response:
//!
//! 1. `GET /health` answers directly.
//! 2. Unknown paths fail with 404 `"Path not found: <path>"`.
//! 3. Known paths with the wrong method fail with 405
//!    `"<METHOD> not allowed for <path>"` and an `Allow` header.
//! 4. The body is parsed as JSON (an empty body is `null`); malformed JSON
//!    fails with 400.
//! 5. The matched chain runs inside a panic boundary. A panicking stage
//!    becomes a 500.
//!
//! Every failure goes through the [`ErrorRenderer`], and every response
//! carries an `x-request-id` header.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;
use futures_util::FutureExt;
use http::header::{HeaderValue, ALLOW};
use http::{Method, StatusCode};
use serde_json::{json, Value};
use stockroom_core::{ApiError, Params, RequestContext, RequestId};
use stockroom_middleware::stages::ErrorRenderer;
use stockroom_middleware::{Chain, Response, ResponseExt};

use crate::error::ServerResult;
use crate::router::{RouteMatch, Router};

/// Response header carrying the request identifier.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

const HEALTH_PATH: &str = "/health";

pub(crate) fn set_request_id_header(response: &mut Response, request_id: RequestId) {
    if let Ok(value) = HeaderValue::from_str(&request_id.to_string()) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
}

/// The request dispatcher.
///
/// # Example
///
/// ```rust
/// use bytes::Bytes;
/// use http::{Method, StatusCode};
/// use stockroom_server::App;
///
/// # tokio_test::block_on(async {
/// let app = App::builder().build().unwrap();
///
/// let response = app.dispatch(Method::GET, "/nowhere", Bytes::new()).await;
/// assert_eq!(response.status(), StatusCode::NOT_FOUND);
/// # });
/// ```
#[derive(Debug)]
pub struct App {
    router: Router,
    renderer: ErrorRenderer,
}

impl App {
    /// Creates a new app builder.
    #[must_use]
    pub fn builder() -> AppBuilder {
        AppBuilder::default()
    }

    /// Returns the route table.
    #[must_use]
    pub fn router(&self) -> &Router {
        &self.router
    }

    /// Returns the error renderer.
    #[must_use]
    pub fn error_renderer(&self) -> &ErrorRenderer {
        &self.renderer
    }

    /// Dispatches one request and returns its response.
    pub async fn dispatch(&self, method: Method, path: &str, body: Bytes) -> Response {
        self.dispatch_with_id(RequestId::new(), method, path, body).await
    }

    /// Dispatches one request under an identifier chosen by the caller.
    pub async fn dispatch_with_id(
        &self,
        request_id: RequestId,
        method: Method,
        path: &str,
        body: Bytes,
    ) -> Response {
        let started = Instant::now();

        tracing::debug!(request_id = %request_id, method = %method, path, "dispatching request");

        let mut response = self.respond(request_id, method.clone(), path, &body).await;

        tracing::debug!(
            request_id = %request_id,
            method = %method,
            path,
            status = response.status().as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "request completed"
        );

        set_request_id_header(&mut response, request_id);
        response
    }

    async fn respond(&self, request_id: RequestId, method: Method, path: &str, body: &Bytes) -> Response {
        if method == Method::GET && path == HEALTH_PATH {
            return Response::json(StatusCode::OK, &json!({ "status": "ok" }));
        }

        let (chain, params) = match self.router.match_route(&method, path) {
            RouteMatch::Matched { chain, params, .. } => (Arc::clone(chain), params),
            RouteMatch::MethodNotAllowed { allowed } => {
                let error = ApiError::method_not_allowed(format!("{method} not allowed for {path}"));
                let mut response = self.renderer.render(request_id, &error);
                let allow = allowed
                    .iter()
                    .map(Method::as_str)
                    .collect::<Vec<_>>()
                    .join(", ");
                if let Ok(value) = HeaderValue::from_str(&allow) {
                    response.headers_mut().insert(ALLOW, value);
                }
                return response;
            }
            RouteMatch::NotFound => {
                let error = ApiError::not_found(format!("Path not found: {path}"));
                return self.renderer.render(request_id, &error);
            }
        };

        match run_chain(&chain, request_id, method, path, params, body).await {
            Ok(response) => response,
            Err(error) => self.renderer.render(request_id, &error),
        }
    }
}

async fn run_chain(
    chain: &Chain,
    request_id: RequestId,
    method: Method,
    path: &str,
    params: Params,
    body: &Bytes,
) -> Result<Response, ApiError> {
    let ctx = RequestContext::new(method, path)
        .with_request_id(request_id)
        .with_params(params)
        .with_body(parse_body(body)?);

    match AssertUnwindSafe(chain.run(&ctx)).catch_unwind().await {
        Ok(result) => result,
        Err(panic) => Err(ApiError::internal(format!(
            "stage panicked: {}",
            panic_message(panic.as_ref())
        ))),
    }
}

/// Parses a request body. Empty and whitespace-only bodies are `null`.
fn parse_body(body: &[u8]) -> Result<Value, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_json::from_slice(body).map_err(|e| ApiError::validation(format!("Malformed JSON body: {e}")))
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(message) = panic.downcast_ref::<&'static str>() {
        message
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message
    } else {
        "unknown panic payload"
    }
}

/// Builder for [`App`].
#[derive(Debug, Default)]
pub struct AppBuilder {
    routes: Vec<(Method, String, Chain)>,
    renderer: ErrorRenderer,
}

impl AppBuilder {
    /// Creates a builder with no routes and the default error renderer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a route. Routes are matched in the order they are added.
    #[must_use]
    pub fn route(mut self, method: Method, template: impl Into<String>, chain: Chain) -> Self {
        self.routes.push((method, template.into(), chain));
        self
    }

    /// Replaces the error renderer.
    #[must_use]
    pub fn error_renderer(mut self, renderer: ErrorRenderer) -> Self {
        self.renderer = renderer;
        self
    }

    /// Builds the app, validating every route template.
    pub fn build(self) -> ServerResult<App> {
        let mut router = Router::new();
        for (method, template, chain) in self.routes {
            router.add(method, &template, Arc::new(chain))?;
        }
        tracing::debug!(routes = router.len(), "route table built");

        Ok(App {
            router,
            renderer: self.renderer,
        })
    }
}
