//! Payload property validators.
//!
//! Both validators read the `data` object of the request body and never
//! modify it. A missing or non-object `data` is treated as an empty payload.
//!
//! - [`HasOnlyValidProperties`] rejects any field outside an allow-list and
//!   names every offending field, in payload order.
//! - [`HasProperties`] requires each listed field to be present with a
//!   truthy value and reports the first one that is not.

use crate::context::Locals;
use crate::middleware::{BoxFuture, Middleware, Outcome};
use serde_json::Value;
use stockroom_core::{ApiError, Record, RequestContext};

/// Rejects payloads containing fields outside a fixed allow-list.
///
/// # Example
///
/// ```
/// use stockroom_middleware::stages::properties::check_only_valid;
/// use serde_json::json;
///
/// let payload = json!({ "supplier_name": "Acme", "color": "red", "size": 3 });
/// let error = check_only_valid(payload.as_object(), &["supplier_name"]).unwrap_err();
/// assert_eq!(error.message(), "Invalid field(s): color, size");
/// ```
#[derive(Debug, Clone)]
pub struct HasOnlyValidProperties {
    valid: Vec<&'static str>,
}

impl HasOnlyValidProperties {
    /// Creates a validator accepting only `valid` field names.
    pub fn new(valid: impl IntoIterator<Item = &'static str>) -> Self {
        Self {
            valid: valid.into_iter().collect(),
        }
    }

    /// Returns the allowed field names.
    #[must_use]
    pub fn valid_fields(&self) -> &[&'static str] {
        &self.valid
    }
}

impl Middleware for HasOnlyValidProperties {
    fn name(&self) -> &'static str {
        "has_only_valid_properties"
    }

    fn handle<'a>(
        &'a self,
        ctx: &'a RequestContext,
        _locals: &'a mut Locals,
    ) -> BoxFuture<'a, Outcome> {
        let outcome = match check_only_valid(ctx.payload(), &self.valid) {
            Ok(()) => Outcome::Continue,
            Err(error) => Outcome::Fail(error),
        };
        Box::pin(async move { outcome })
    }
}

/// Requires each listed field to be present and truthy.
#[derive(Debug, Clone)]
pub struct HasProperties {
    required: Vec<&'static str>,
}

impl HasProperties {
    /// Creates a validator requiring `required` fields, checked in order.
    pub fn new(required: impl IntoIterator<Item = &'static str>) -> Self {
        Self {
            required: required.into_iter().collect(),
        }
    }

    /// Returns the required field names.
    #[must_use]
    pub fn required_fields(&self) -> &[&'static str] {
        &self.required
    }
}

impl Middleware for HasProperties {
    fn name(&self) -> &'static str {
        "has_properties"
    }

    fn handle<'a>(
        &'a self,
        ctx: &'a RequestContext,
        _locals: &'a mut Locals,
    ) -> BoxFuture<'a, Outcome> {
        let outcome = match check_required(ctx.payload(), &self.required) {
            Ok(()) => Outcome::Continue,
            Err(error) => Outcome::Fail(error),
        };
        Box::pin(async move { outcome })
    }
}

/// Returns the payload fields not in `valid`, in payload order.
pub fn invalid_fields<'p>(payload: Option<&'p Record>, valid: &[&str]) -> Vec<&'p str> {
    payload
        .into_iter()
        .flat_map(Record::keys)
        .filter(|field| !valid.contains(&field.as_str()))
        .map(String::as_str)
        .collect()
}

/// Fails with `"Invalid field(s): <a>, <b>"` when any field is outside `valid`.
pub fn check_only_valid(payload: Option<&Record>, valid: &[&str]) -> Result<(), ApiError> {
    let invalid = invalid_fields(payload, valid);
    if invalid.is_empty() {
        Ok(())
    } else {
        Err(ApiError::validation(format!(
            "Invalid field(s): {}",
            invalid.join(", ")
        )))
    }
}

/// Returns the first field in `required` that is absent or falsy.
pub fn first_missing<'r>(payload: Option<&Record>, required: &[&'r str]) -> Option<&'r str> {
    required
        .iter()
        .copied()
        .find(|field| !payload.and_then(|p| p.get(*field)).is_some_and(is_truthy))
}

/// Fails with `"<field> must be included"` for the first missing field.
pub fn check_required(payload: Option<&Record>, required: &[&str]) -> Result<(), ApiError> {
    match first_missing(payload, required) {
        None => Ok(()),
        Some(field) => Err(ApiError::validation(format!("{field} must be included"))),
    }
}

/// Truthiness of a JSON value.
///
/// `null`, `false`, `0` (and `NaN`) and the empty string are falsy. Every
/// other value, including empty arrays and objects, is truthy.
#[must_use]
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f.abs() > 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::Method;
    use proptest::prelude::*;
    use serde_json::json;
    use stockroom_core::ErrorCategory;

    const SUPPLIER_FIELDS: &[&str] = &[
        "supplier_name",
        "supplier_address_line_1",
        "supplier_city",
        "supplier_email",
    ];

    fn payload(value: Value) -> Record {
        value.as_object().cloned().unwrap()
    }

    fn ctx_with_data(data: Value) -> RequestContext {
        RequestContext::new(Method::POST, "/suppliers").with_body(json!({ "data": data }))
    }

    #[test]
    fn test_all_valid_fields_pass() {
        let p = payload(json!({ "supplier_name": "Acme", "supplier_city": "Oslo" }));
        assert!(check_only_valid(Some(&p), SUPPLIER_FIELDS).is_ok());
    }

    #[test]
    fn test_invalid_fields_listed_in_payload_order() {
        let p: Record =
            serde_json::from_str(r#"{"zeta":1,"supplier_name":"Acme","alpha":2}"#).unwrap();
        let error = check_only_valid(Some(&p), SUPPLIER_FIELDS).unwrap_err();
        assert_eq!(error.category(), ErrorCategory::Validation);
        assert_eq!(error.message(), "Invalid field(s): zeta, alpha");
    }

    #[test]
    fn test_absent_payload_has_no_invalid_fields() {
        assert!(check_only_valid(None, SUPPLIER_FIELDS).is_ok());
    }

    #[test]
    fn test_first_missing_field_reported() {
        let p = payload(json!({ "supplier_city": "Oslo" }));
        let error = check_required(Some(&p), &["supplier_name", "supplier_email"]).unwrap_err();
        assert_eq!(error.message(), "supplier_name must be included");
    }

    #[test]
    fn test_falsy_values_count_as_missing() {
        for value in [json!(null), json!(false), json!(0), json!(0.0), json!("")] {
            let p = payload(json!({ "supplier_name": value }));
            assert_eq!(
                first_missing(Some(&p), &["supplier_name"]),
                Some("supplier_name"),
                "value {value} should be falsy"
            );
        }
    }

    #[test]
    fn test_truthy_values_satisfy_requirement() {
        for value in [json!(true), json!(1), json!(-2.5), json!("x"), json!([]), json!({})] {
            let p = payload(json!({ "supplier_name": value }));
            assert_eq!(first_missing(Some(&p), &["supplier_name"]), None);
        }
    }

    #[test]
    fn test_absent_payload_misses_first_required() {
        assert_eq!(
            first_missing(None, &["supplier_name", "supplier_email"]),
            Some("supplier_name")
        );
        assert_eq!(first_missing(None, &[]), None);
    }

    #[tokio::test]
    async fn test_allow_list_middleware() {
        let validator = HasOnlyValidProperties::new(SUPPLIER_FIELDS.iter().copied());
        let mut locals = Locals::new();

        let ok = ctx_with_data(json!({ "supplier_name": "Acme" }));
        assert!(validator.handle(&ok, &mut locals).await.is_continue());

        let bad = ctx_with_data(json!({ "supplier_name": "Acme", "rating": 5 }));
        match validator.handle(&bad, &mut locals).await {
            Outcome::Fail(error) => assert_eq!(error.message(), "Invalid field(s): rating"),
            other => panic!("expected failure, got {other:?}"),
        }
        assert!(locals.is_empty());
    }

    #[tokio::test]
    async fn test_required_middleware() {
        let validator = HasProperties::new(["supplier_name", "supplier_email"]);
        let mut locals = Locals::new();

        let bad = ctx_with_data(json!({ "supplier_name": "Acme", "supplier_email": "" }));
        match validator.handle(&bad, &mut locals).await {
            Outcome::Fail(error) => {
                assert_eq!(error.message(), "supplier_email must be included");
            }
            other => panic!("expected failure, got {other:?}"),
        }

        let ok = ctx_with_data(json!({ "supplier_name": "Acme", "supplier_email": "a@b.c" }));
        assert!(validator.handle(&ok, &mut locals).await.is_continue());
    }

    fn field_name() -> impl Strategy<Value = String> {
        prop_oneof![
            prop::sample::select(SUPPLIER_FIELDS).prop_map(str::to_string),
            "[a-z_]{1,12}",
        ]
    }

    proptest! {
        #[test]
        fn prop_invalid_fields_are_exactly_the_disallowed_keys(
            keys in prop::collection::vec(field_name(), 0..8)
        ) {
            let mut p = Record::new();
            for key in &keys {
                p.insert(key.clone(), json!(1));
            }

            let invalid = invalid_fields(Some(&p), SUPPLIER_FIELDS);
            let expected: Vec<&str> = p
                .keys()
                .map(String::as_str)
                .filter(|k| !SUPPLIER_FIELDS.contains(k))
                .collect();
            prop_assert_eq!(&invalid, &expected);
            prop_assert_eq!(check_only_valid(Some(&p), SUPPLIER_FIELDS).is_ok(), expected.is_empty());
        }

        #[test]
        fn prop_non_empty_strings_always_satisfy(value in "[a-zA-Z0-9@.]{1,20}") {
            let mut p = Record::new();
            p.insert("supplier_name".to_string(), json!(value));
            prop_assert!(check_required(Some(&p), &["supplier_name"]).is_ok());
        }

        #[test]
        fn prop_missing_field_message_names_field(field in "[a-z_]{1,16}") {
            let required = [field.as_str()];
            let error = check_required(Some(&Record::new()), &required).unwrap_err();
            prop_assert_eq!(error.message(), format!("{field} must be included"));
        }
    }
}
