//! Request context types.
//!
//! The [`RequestContext`] holds everything a chain stage may read about the
//! incoming request: its identifier, method, path, route parameters and parsed
//! JSON body. It is built once by the dispatcher and is read-only afterwards.

use crate::Record;
use http::Method;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// A unique identifier for each request, using UUID v7.
///
/// UUID v7 is time-ordered, which makes it ideal for request tracking
/// and log correlation.
///
/// # Example
///
/// ```
/// use stockroom_core::RequestId;
///
/// let id = RequestId::new();
/// println!("Request ID: {}", id);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(Uuid);

impl RequestId {
    /// Creates a new unique request ID using UUID v7.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for RequestId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

/// Route parameters extracted from the request path.
///
/// Parameters are stored as (name, value) pairs in template order.
///
/// ```
/// use stockroom_core::Params;
///
/// let mut params = Params::new();
/// params.push("supplierId", "7");
///
/// assert_eq!(params.get("supplierId"), Some("7"));
/// assert_eq!(params.get("productId"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    inner: Vec<(String, String)>,
}

impl Params {
    /// Creates an empty parameter set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a parameter.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.inner.push((name.into(), value.into()));
    }

    /// Returns the value for a parameter by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.inner
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Returns true if there are no parameters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Returns the number of parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns an iterator over the parameters.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.inner.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            inner: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Immutable per-request context read by chain stages.
///
/// # Example
///
/// ```
/// use stockroom_core::{Params, RequestContext};
/// use http::Method;
/// use serde_json::json;
///
/// let ctx = RequestContext::new(Method::POST, "/suppliers")
///     .with_body(json!({ "data": { "supplier_name": "Acme" } }));
///
/// let payload = ctx.payload().unwrap();
/// assert_eq!(payload["supplier_name"], "Acme");
/// ```
#[derive(Debug, Clone)]
pub struct RequestContext {
    request_id: RequestId,
    method: Method,
    path: String,
    params: Params,
    body: Value,
}

impl RequestContext {
    /// Creates a context with a fresh request ID, no parameters and a null body.
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            request_id: RequestId::new(),
            method,
            path: path.into(),
            params: Params::new(),
            body: Value::Null,
        }
    }

    /// Sets the request ID.
    #[must_use]
    pub fn with_request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = request_id;
        self
    }

    /// Sets the route parameters.
    #[must_use]
    pub fn with_params(mut self, params: Params) -> Self {
        self.params = params;
        self
    }

    /// Sets the parsed request body.
    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = body;
        self
    }

    /// Returns the request ID.
    #[must_use]
    pub fn request_id(&self) -> RequestId {
        self.request_id
    }

    /// Returns the request method.
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the request path.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns all route parameters.
    #[must_use]
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Returns a single route parameter.
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name)
    }

    /// Returns the full parsed body (`Value::Null` when the request had none).
    #[must_use]
    pub fn body(&self) -> &Value {
        &self.body
    }

    /// Returns the `data` member of the body when it is a JSON object.
    ///
    /// Validators treat `None` as an empty payload.
    #[must_use]
    pub fn payload(&self) -> Option<&Record> {
        self.body.get("data").and_then(Value::as_object)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_id_unique() {
        let id1 = RequestId::new();
        let id2 = RequestId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_request_id_display() {
        let uuid = Uuid::now_v7();
        let id = RequestId::from(uuid);
        assert_eq!(id.to_string(), uuid.to_string());
        assert_eq!(id.as_uuid(), &uuid);
    }

    #[test]
    fn test_params_from_iter_keeps_order() {
        let params: Params = [("a", "1"), ("b", "2")].into_iter().collect();
        assert_eq!(params.len(), 2);
        let names: Vec<&str> = params.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_context_param_lookup() {
        let mut params = Params::new();
        params.push("productId", "42");
        let ctx = RequestContext::new(Method::GET, "/products/42").with_params(params);

        assert_eq!(ctx.param("productId"), Some("42"));
        assert_eq!(ctx.param("supplierId"), None);
        assert_eq!(ctx.path(), "/products/42");
        assert_eq!(ctx.method(), &Method::GET);
    }

    #[test]
    fn test_payload_absent_without_body() {
        let ctx = RequestContext::new(Method::POST, "/suppliers");
        assert!(ctx.body().is_null());
        assert!(ctx.payload().is_none());
    }

    #[test]
    fn test_payload_ignores_non_object_data() {
        let ctx = RequestContext::new(Method::POST, "/suppliers").with_body(json!({ "data": [1, 2] }));
        assert!(ctx.payload().is_none());
    }

    #[test]
    fn test_payload_preserves_key_order() {
        let body: Value =
            serde_json::from_str(r#"{"data":{"zeta":1,"alpha":2,"mid":3}}"#).unwrap();
        let ctx = RequestContext::new(Method::POST, "/suppliers").with_body(body);

        let keys: Vec<&String> = ctx.payload().unwrap().keys().collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }
}
