//! Integration tests for the vehicle taxonomy picker endpoints.
//!
//! These tests require:
//! - A running `PostgreSQL` database, migrated and seeded
//! - The storefront server running (cargo run -p axleworks-storefront)
//!
//! Run with: cargo test -p axleworks-integration-tests -- --ignored

use reqwest::{Client, StatusCode};
use serde_json::Value;

use axleworks_integration_tests::storefront_base_url;

/// Fetch the seeded make with the given name and return its id.
async fn make_id_by_name(client: &Client, name: &str) -> i64 {
    let base_url = storefront_base_url();
    let makes: Vec<Value> = client
        .get(format!("{base_url}/api/vehicles/makes"))
        .send()
        .await
        .expect("Failed to list makes")
        .json()
        .await
        .expect("Failed to parse makes");

    makes
        .iter()
        .find(|m| m["name"] == name)
        .and_then(|m| m["id"].as_i64())
        .unwrap_or_else(|| panic!("seeded make {name} not found"))
}

#[tokio::test]
#[ignore = "Requires running storefront and seeded database"]
async fn test_makes_sorted_by_name() {
    let client = Client::new();
    let base_url = storefront_base_url();

    let resp = client
        .get(format!("{base_url}/api/vehicles/makes"))
        .send()
        .await
        .expect("Failed to list makes");
    assert_eq!(resp.status(), StatusCode::OK);

    let makes: Vec<Value> = resp.json().await.expect("Failed to parse makes");
    assert!(!makes.is_empty());

    let names: Vec<&str> = makes.iter().filter_map(|m| m["name"].as_str()).collect();
    let mut sorted = names.clone();
    sorted.sort_unstable();
    assert_eq!(names, sorted, "makes must be sorted by name ascending");
}

#[tokio::test]
#[ignore = "Requires running storefront and seeded database"]
async fn test_models_for_make_sorted_by_name() {
    let client = Client::new();
    let base_url = storefront_base_url();
    let honda = make_id_by_name(&client, "Honda").await;

    let resp = client
        .get(format!("{base_url}/api/vehicles/models/{honda}"))
        .send()
        .await
        .expect("Failed to list models");
    assert_eq!(resp.status(), StatusCode::OK);

    let models: Vec<Value> = resp.json().await.expect("Failed to parse models");
    let names: Vec<&str> = models.iter().filter_map(|m| m["name"].as_str()).collect();

    assert!(names.contains(&"Civic"));
    assert!(names.contains(&"Accord"));

    let mut sorted = names.clone();
    sorted.sort_unstable();
    assert_eq!(names, sorted, "models must be sorted by name ascending");
}

#[tokio::test]
#[ignore = "Requires running storefront and seeded database"]
async fn test_years_descending_union_of_variant_ranges() {
    let client = Client::new();
    let base_url = storefront_base_url();
    let honda = make_id_by_name(&client, "Honda").await;

    let models: Vec<Value> = client
        .get(format!("{base_url}/api/vehicles/models/{honda}"))
        .send()
        .await
        .expect("Failed to list models")
        .json()
        .await
        .expect("Failed to parse models");
    let civic = models
        .iter()
        .find(|m| m["name"] == "Civic")
        .and_then(|m| m["id"].as_i64())
        .expect("seeded model Civic not found");

    let resp = client
        .get(format!("{base_url}/api/vehicles/years/{civic}"))
        .send()
        .await
        .expect("Failed to list years");
    assert_eq!(resp.status(), StatusCode::OK);

    let years: Vec<i64> = resp.json().await.expect("Failed to parse years");

    // Seeded Civic variants cover 2016-2019 and 2020-2021; the endpoint
    // returns the deduplicated union, most recent first.
    assert_eq!(years, vec![2021, 2020, 2019, 2018, 2017, 2016]);
}

#[tokio::test]
#[ignore = "Requires running storefront and seeded database"]
async fn test_unknown_make_is_invalid_filter() {
    let client = Client::new();
    let base_url = storefront_base_url();

    let resp = client
        .get(format!("{base_url}/api/vehicles/models/999999"))
        .send()
        .await
        .expect("Failed to request models");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = resp.json().await.expect("Failed to parse error body");
    assert!(body["error"].as_str().unwrap_or("").contains("make_id"));
}

#[tokio::test]
#[ignore = "Requires running storefront and seeded database"]
async fn test_unknown_model_is_invalid_filter_not_empty_list() {
    let client = Client::new();
    let base_url = storefront_base_url();

    let resp = client
        .get(format!("{base_url}/api/vehicles/years/999999"))
        .send()
        .await
        .expect("Failed to request years");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = resp.json().await.expect("Failed to parse error body");
    assert!(body["error"].as_str().unwrap_or("").contains("model_id"));
}
