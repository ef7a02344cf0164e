//! In-memory test client.

use std::sync::Arc;

use bytes::Bytes;
use http::Method;
use serde::Serialize;
use stockroom_server::App;

use crate::error::TestError;
use crate::response::TestResponse;

/// Drives an [`App`] without a network connection.
///
/// Cloning is cheap; clones share the same app.
#[derive(Debug, Clone)]
pub struct TestClient {
    app: Arc<App>,
}

impl TestClient {
    /// Creates a client for `app`.
    #[must_use]
    pub fn new(app: App) -> Self {
        Self { app: Arc::new(app) }
    }

    /// Creates a client for an already shared app.
    #[must_use]
    pub fn from_arc(app: Arc<App>) -> Self {
        Self { app }
    }

    /// Returns the app under test.
    #[must_use]
    pub fn app(&self) -> &App {
        &self.app
    }

    /// Starts a GET request.
    pub fn get(&self, uri: impl AsRef<str>) -> TestRequest<'_> {
        self.request(Method::GET, uri)
    }

    /// Starts a POST request.
    pub fn post(&self, uri: impl AsRef<str>) -> TestRequest<'_> {
        self.request(Method::POST, uri)
    }

    /// Starts a PUT request.
    pub fn put(&self, uri: impl AsRef<str>) -> TestRequest<'_> {
        self.request(Method::PUT, uri)
    }

    /// Starts a PATCH request.
    pub fn patch(&self, uri: impl AsRef<str>) -> TestRequest<'_> {
        self.request(Method::PATCH, uri)
    }

    /// Starts a DELETE request.
    pub fn delete(&self, uri: impl AsRef<str>) -> TestRequest<'_> {
        self.request(Method::DELETE, uri)
    }

    /// Starts a request with an arbitrary method.
    ///
    /// Any query string is dropped, matching what the HTTP server passes on.
    pub fn request(&self, method: Method, uri: impl AsRef<str>) -> TestRequest<'_> {
        let uri = uri.as_ref();
        let path = uri.split_once('?').map_or(uri, |(path, _)| path);
        TestRequest {
            client: self,
            method,
            path: path.to_string(),
            body: Ok(Bytes::new()),
        }
    }
}

/// A request bound to a [`TestClient`].
#[derive(Debug)]
pub struct TestRequest<'a> {
    client: &'a TestClient,
    method: Method,
    path: String,
    body: Result<Bytes, TestError>,
}

impl TestRequest<'_> {
    /// Sets the raw request body.
    #[must_use]
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Ok(body.into());
        self
    }

    /// Serializes `value` as the JSON request body.
    #[must_use]
    pub fn json<T: Serialize>(mut self, value: &T) -> Self {
        self.body = serde_json::to_vec(value)
            .map(Bytes::from)
            .map_err(TestError::from);
        self
    }

    /// Sends the request.
    ///
    /// # Panics
    ///
    /// Panics if the body could not be serialized or the response body could
    /// not be collected. Use [`try_send`](Self::try_send) to handle those.
    pub async fn send(self) -> TestResponse {
        match self.try_send().await {
            Ok(response) => response,
            Err(e) => panic!("test request failed: {e}"),
        }
    }

    /// Sends the request and returns a `Result`.
    pub async fn try_send(self) -> Result<TestResponse, TestError> {
        let body = self.body?;
        let response = self.client.app.dispatch(self.method, &self.path, body).await;
        TestResponse::from_response(response).await
    }
}
