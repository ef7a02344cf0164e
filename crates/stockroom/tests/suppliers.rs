//! Supplier routes end to end: validation, existence checks and writes.

mod common;

use http::StatusCode;
use serde_json::json;
use stockroom_test::Call;

#[tokio::test]
async fn create_supplier_returns_created_record() {
    let (client, recording) = common::client();

    let response = client
        .post("/suppliers")
        .json(&json!({ "data": { "supplier_name": "Acme", "supplier_email": "a@acme.com" } }))
        .send()
        .await;

    response.assert_status(StatusCode::CREATED);
    let data = response.data().unwrap();
    assert_eq!(data["supplier_name"], "Acme");
    assert_eq!(data["supplier_email"], "a@acme.com");
    assert_eq!(data["supplier_id"], 8);

    assert_eq!(
        recording.suppliers.creates().await,
        vec![json!({ "supplier_name": "Acme", "supplier_email": "a@acme.com" })]
    );
}

#[tokio::test]
async fn create_without_email_never_reaches_collaborator() {
    let (client, recording) = common::client();

    client
        .post("/suppliers")
        .json(&json!({ "data": { "supplier_name": "Acme" } }))
        .send()
        .await
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("supplier_email must be included");

    assert!(recording.suppliers.calls().await.is_empty());
}

#[tokio::test]
async fn create_rejects_unknown_fields_in_payload_order() {
    let (client, recording) = common::client();

    client
        .post("/suppliers")
        .json(&json!({
            "data": {
                "zeta": 1,
                "supplier_name": "Acme",
                "alpha": 2,
                "supplier_email": "a@acme.com"
            }
        }))
        .send()
        .await
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("Invalid field(s): zeta, alpha");

    assert!(recording.suppliers.calls().await.is_empty());
}

#[tokio::test]
async fn falsy_required_value_counts_as_missing() {
    let (client, _) = common::client();

    client
        .post("/suppliers")
        .json(&json!({ "data": { "supplier_name": "", "supplier_email": "a@acme.com" } }))
        .send()
        .await
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("supplier_name must be included");
}

#[tokio::test]
async fn read_known_supplier() {
    let (client, recording) = common::client();

    let response = client.get("/suppliers/7").send().await;
    response.assert_status(StatusCode::OK);
    assert_eq!(
        response.data().unwrap(),
        json!({ "supplier_id": 7, "supplier_name": "A", "supplier_email": "a@example.com" })
    );
    assert_eq!(recording.suppliers.calls().await, vec![Call::Read("7".into())]);
}

#[tokio::test]
async fn percent_encoded_id_is_decoded() {
    let (client, recording) = common::client();

    let response = client.get("/suppliers/%37").send().await;
    response.assert_status(StatusCode::OK);
    assert_eq!(response.data().unwrap()["supplier_id"], 7);
    assert_eq!(recording.suppliers.calls().await, vec![Call::Read("7".into())]);
}

#[tokio::test]
async fn unknown_supplier_is_not_found_for_every_method() {
    let (client, recording) = common::client();
    let update = json!({ "data": { "supplier_name": "B", "supplier_email": "b@example.com" } });

    for response in [
        client.get("/suppliers/404").send().await,
        client.put("/suppliers/404").json(&update).send().await,
        client.delete("/suppliers/404").send().await,
        client.get("/suppliers/not-a-number").send().await,
    ] {
        response
            .assert_status(StatusCode::NOT_FOUND)
            .assert_error_message("Supplier cannot be found");
    }

    assert!(recording.suppliers.updates().await.is_empty());
    assert!(!recording
        .suppliers
        .calls()
        .await
        .iter()
        .any(|call| matches!(call, Call::Delete(_))));
}

#[tokio::test]
async fn update_merges_payload_with_resolved_id() {
    let (client, recording) = common::client();

    let response = client
        .put("/suppliers/7")
        .json(&json!({ "data": { "supplier_name": "B", "supplier_email": "b@example.com" } }))
        .send()
        .await;

    response.assert_status(StatusCode::OK);
    let data = response.data().unwrap();
    assert_eq!(data["supplier_id"], 7);
    assert_eq!(data["supplier_name"], "B");

    let updates = recording.suppliers.updates().await;
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0]["supplier_id"], 7);
}

#[tokio::test]
async fn update_validates_after_existence() {
    let (client, _) = common::client();

    client
        .put("/suppliers/7")
        .json(&json!({ "data": { "supplier_name": "B" } }))
        .send()
        .await
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("supplier_email must be included");
}

#[tokio::test]
async fn delete_returns_no_content() {
    let (client, recording) = common::client();

    client
        .delete("/suppliers/7")
        .send()
        .await
        .assert_status(StatusCode::NO_CONTENT)
        .assert_empty_body();

    assert_eq!(
        recording.suppliers.calls().await,
        vec![Call::Read("7".into()), Call::Delete(json!(7))]
    );
    client
        .get("/suppliers/7")
        .send()
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn list_suppliers() {
    let (client, _) = common::client();

    let response = client.get("/suppliers").send().await;
    response.assert_status(StatusCode::OK);
    let data = response.data().unwrap();
    assert_eq!(data.as_array().map(Vec::len), Some(1));
    assert_eq!(data[0]["supplier_name"], "A");
}
