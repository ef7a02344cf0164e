//! Shared fixtures for the end-to-end tests.

#![allow(dead_code)]

use stockroom::{build_app, SeedData, StockroomConfig};
use stockroom_test::{RecordingServices, TestClient};

pub const SEED: &str = r#"{
    "categories": [
        { "category_id": 1, "category_name": "Hand tools" },
        { "category_id": 2, "category_name": "Fasteners" }
    ],
    "products": [
        {
            "product_id": 1,
            "product_sku": "HT-100",
            "product_title": "Claw hammer",
            "product_price": 12.5,
            "product_weight_in_lbs": 2.0,
            "product_quantity_in_stock": 4,
            "supplier_id": 7,
            "category_id": 1
        },
        {
            "product_id": 2,
            "product_sku": "FS-200",
            "product_title": "Wood screws",
            "product_price": 4.5,
            "product_weight_in_lbs": 0.5,
            "product_quantity_in_stock": 0,
            "supplier_id": 7,
            "category_id": 2
        }
    ],
    "suppliers": [
        { "supplier_id": 7, "supplier_name": "A", "supplier_email": "a@example.com" }
    ]
}"#;

pub fn recording() -> RecordingServices {
    RecordingServices::from_seed(SeedData::from_json(SEED).unwrap()).unwrap()
}

pub fn client_for(recording: &RecordingServices, config: &StockroomConfig) -> TestClient {
    TestClient::new(build_app(config, &recording.services()).unwrap())
}

pub fn client() -> (TestClient, RecordingServices) {
    let recording = recording();
    let client = client_for(&recording, &StockroomConfig::default());
    (client, recording)
}
