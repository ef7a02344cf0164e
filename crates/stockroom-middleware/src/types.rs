//! HTTP response type and JSON response helpers.

use bytes::Bytes;
use http::header::{HeaderValue, CONTENT_TYPE};
use http::StatusCode;
use http_body_util::Full;
use serde_json::Value;
use stockroom_core::ErrorEnvelope;

/// The HTTP response type produced by chains.
///
/// This is a standard `http::Response` with a `Full<Bytes>` body.
pub type Response = http::Response<Full<Bytes>>;

const APPLICATION_JSON: &str = "application/json";

/// Extension trait for building JSON responses.
pub trait ResponseExt {
    /// Creates a JSON response from an arbitrary value.
    fn json(status: StatusCode, body: &Value) -> Response;

    /// Creates a success response with the body `{"data": <data>}`.
    fn data(status: StatusCode, data: Value) -> Response;

    /// Creates an empty `204 No Content` response.
    fn no_content() -> Response;

    /// Creates an error response carrying the given envelope.
    fn json_error(status: StatusCode, envelope: &ErrorEnvelope) -> Response;
}

impl ResponseExt for Response {
    fn json(status: StatusCode, body: &Value) -> Response {
        with_json_body(status, Bytes::from(body.to_string()))
    }

    fn data(status: StatusCode, data: Value) -> Response {
        let mut body = serde_json::Map::with_capacity(1);
        body.insert("data".to_string(), data);
        Self::json(status, &Value::Object(body))
    }

    fn no_content() -> Response {
        let mut response = Response::new(Full::new(Bytes::new()));
        *response.status_mut() = StatusCode::NO_CONTENT;
        response
    }

    fn json_error(status: StatusCode, envelope: &ErrorEnvelope) -> Response {
        let body = match serde_json::to_vec(envelope) {
            Ok(bytes) => Bytes::from(bytes),
            Err(_) => Bytes::from_static(br#"{"error":{"code":"INTERNAL_ERROR","message":"Internal server error","category":"internal"}}"#),
        };
        with_json_body(status, body)
    }
}

fn with_json_body(status: StatusCode, body: Bytes) -> Response {
    let mut response = Response::new(Full::new(body));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static(APPLICATION_JSON));
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use serde_json::json;
    use stockroom_core::ApiError;

    async fn body_json(response: Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_data_response_wraps_payload() {
        let response = Response::data(StatusCode::OK, json!([{ "category_id": 1 }]));
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(CONTENT_TYPE).unwrap(),
            APPLICATION_JSON
        );
        assert_eq!(body_json(response).await, json!({ "data": [{ "category_id": 1 }] }));
    }

    #[tokio::test]
    async fn test_no_content_has_empty_body() {
        let response = Response::no_content();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert!(response.headers().get(CONTENT_TYPE).is_none());
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert!(bytes.is_empty());
    }

    #[tokio::test]
    async fn test_json_error_response() {
        let envelope = ApiError::validation("supplier_name must be included").to_envelope(Some("abc"));
        let response = Response::json_error(StatusCode::BAD_REQUEST, &envelope);
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["error"]["message"], "supplier_name must be included");
        assert_eq!(body["error"]["code"], "BAD_REQUEST");
        assert_eq!(body["request_id"], "abc");
    }
}
