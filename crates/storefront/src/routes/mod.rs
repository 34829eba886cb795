//! HTTP route handlers for the storefront API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                         - Liveness check
//! GET  /health/ready                   - Readiness (database + index)
//!
//! # Search
//! GET  /api/search                     - Ranked, filtered product search
//!
//! # Vehicle taxonomy (picker endpoints)
//! GET  /api/vehicles/makes             - All makes, name ascending
//! GET  /api/vehicles/models/{make_id}  - A make's models, name ascending
//! GET  /api/vehicles/years/{model_id}  - A model's years, descending
//!
//! # Operator
//! POST /api/admin/sync                 - Full index rebuild
//! ```

pub mod search;
pub mod sync;
pub mod vehicles;

use axum::{Router, routing::get};

use crate::state::AppState;

/// Create all routes for the storefront API.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/search", get(search::search))
        .nest("/api/vehicles", vehicles::router())
        .nest("/api/admin", sync::router())
}
