//! Integration tests for the operator sync trigger.
//!
//! These tests require:
//! - A running `PostgreSQL` database, migrated and seeded
//! - A running search index service
//! - The storefront server running (cargo run -p axleworks-storefront)
//!
//! Run with: cargo test -p axleworks-integration-tests -- --ignored

use reqwest::{Client, StatusCode};
use serde_json::Value;

use axleworks_core::SearchDocument;
use axleworks_integration_tests::storefront_base_url;

async fn trigger_sync(client: &Client) -> Value {
    let base_url = storefront_base_url();
    let resp = client
        .post(format!("{base_url}/api/admin/sync"))
        .send()
        .await
        .expect("Failed to trigger sync");
    assert_eq!(resp.status(), StatusCode::OK);
    resp.json().await.expect("Failed to parse sync report")
}

#[tokio::test]
#[ignore = "Requires running storefront, database, and search index"]
async fn test_sync_reports_indexed_products() {
    let client = Client::new();
    let report = trigger_sync(&client).await;

    assert!(report["products_indexed"].as_u64().unwrap_or(0) >= 1);
    assert!(report["duration_ms"].is_u64());
}

#[tokio::test]
#[ignore = "Requires running storefront, database, and search index"]
async fn test_sync_is_idempotent() {
    let client = Client::new();
    let base_url = storefront_base_url();

    let first = trigger_sync(&client).await;
    let second = trigger_sync(&client).await;

    // Unchanged relational state must produce the same document set.
    assert_eq!(first["products_indexed"], second["products_indexed"]);

    let body: Value = client
        .get(format!("{base_url}/api/search?limit=100"))
        .send()
        .await
        .expect("Failed to search")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(body["count"], first["products_indexed"]);
}

#[tokio::test]
#[ignore = "Requires running storefront, database, and search index"]
async fn test_universal_product_is_indexed_without_fitment() {
    let client = Client::new();
    let base_url = storefront_base_url();

    trigger_sync(&client).await;

    // The seed data includes a product with zero fitment links; it must
    // still be searchable, with empty aggregates.
    let body: Value = client
        .get(format!("{base_url}/api/search?q=microfiber"))
        .send()
        .await
        .expect("Failed to search")
        .json()
        .await
        .expect("Failed to parse response");

    let results: Vec<SearchDocument> =
        serde_json::from_value(body["results"].clone()).expect("results match the contract");
    let cloth = results
        .iter()
        .find(|doc| doc.slug == "microfiber-detailing-cloth-3-pack")
        .expect("universal product missing from index");

    assert!(cloth.fits_makes.is_empty());
    assert!(cloth.fits_models.is_empty());
    assert_eq!(cloth.year_start, None);
    assert_eq!(cloth.year_end, None);
}
