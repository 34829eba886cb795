//! Integration tests for Axleworks.
//!
//! These tests drive a running storefront over HTTP and therefore need the
//! full stack up:
//!
//! ```bash
//! # Start PostgreSQL and the search index, then:
//! cargo run -p axleworks-cli -- migrate
//! cargo run -p axleworks-cli -- seed
//! cargo run -p axleworks-storefront &
//! cargo run -p axleworks-cli -- sync
//!
//! # Run the ignored tests:
//! cargo test -p axleworks-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `vehicle_taxonomy` - Picker endpoints (makes/models/years)
//! - `search_api` - Query orchestration, validation, filter resolution
//! - `index_sync` - Operator sync trigger and rebuild semantics

/// Base URL for the storefront API (configurable via environment).
#[must_use]
pub fn storefront_base_url() -> String {
    std::env::var("STOREFRONT_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}
