//! Test response wrapper.

use bytes::Bytes;
use http::{HeaderMap, StatusCode};
use http_body_util::BodyExt;
use serde::de::DeserializeOwned;
use serde_json::Value;
use stockroom_middleware::Response;

use crate::error::TestError;

/// A collected response with helper methods for assertions.
#[derive(Debug, Clone)]
pub struct TestResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

impl TestResponse {
    /// Collects a dispatcher response.
    pub async fn from_response(response: Response) -> Result<Self, TestError> {
        let (parts, body) = response.into_parts();
        let body = body
            .collect()
            .await
            .map_err(|e| TestError::BodyRead(e.to_string()))?
            .to_bytes();

        Ok(Self {
            status: parts.status,
            headers: parts.headers,
            body,
        })
    }

    /// Returns the status code.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Returns the status code as a `u16`.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        self.status.as_u16()
    }

    /// Returns the response headers.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns a header value as a string, if present and valid.
    #[must_use]
    pub fn header_str(&self, name: impl AsRef<str>) -> Option<&str> {
        self.headers
            .get(name.as_ref())
            .and_then(|v| v.to_str().ok())
    }

    /// Returns the raw body bytes.
    #[must_use]
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Returns the body as a string.
    pub fn text(&self) -> Result<String, TestError> {
        String::from_utf8(self.body.to_vec())
            .map_err(|e| TestError::BodyRead(format!("Invalid UTF-8: {e}")))
    }

    /// Deserializes the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, TestError> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    /// Deserializes the body as a JSON value.
    pub fn json_value(&self) -> Result<Value, TestError> {
        self.json()
    }

    /// Returns the `data` member of a success body.
    pub fn data(&self) -> Result<Value, TestError> {
        let mut body = self.json_value()?;
        Ok(body.get_mut("data").map(Value::take).unwrap_or(Value::Null))
    }

    /// Returns `error.message` of an error envelope, if the body is one.
    #[must_use]
    pub fn error_message(&self) -> Option<String> {
        let body = self.json_value().ok()?;
        body["error"]["message"].as_str().map(ToString::to_string)
    }

    /// Asserts the status code.
    ///
    /// # Panics
    ///
    /// Panics if the status code doesn't match. The body is included in the message.
    pub fn assert_status(&self, expected: StatusCode) -> &Self {
        assert_eq!(
            self.status,
            expected,
            "Expected status {}, got {} with body {}",
            expected,
            self.status,
            String::from_utf8_lossy(&self.body)
        );
        self
    }

    /// Asserts that the body is an error envelope with the given message.
    ///
    /// # Panics
    ///
    /// Panics if the body is not an error envelope or the message differs.
    pub fn assert_error_message(&self, expected: &str) -> &Self {
        assert_eq!(
            self.error_message().as_deref(),
            Some(expected),
            "Unexpected error body {}",
            String::from_utf8_lossy(&self.body)
        );
        self
    }

    /// Asserts that the body is empty.
    ///
    /// # Panics
    ///
    /// Panics if the body has any content.
    pub fn assert_empty_body(&self) -> &Self {
        assert!(
            self.body.is_empty(),
            "Expected empty body, got {}",
            String::from_utf8_lossy(&self.body)
        );
        self
    }
}
