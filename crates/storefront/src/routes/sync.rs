//! Operator sync trigger.
//!
//! Out of the interactive request path: rebuilds the whole search index
//! from relational state. Overlapping runs are not coordinated here; the
//! operator/scheduler serializes invocations.

use axum::{Json, Router, extract::State, routing::post};
use tracing::instrument;

use crate::error::AppError;
use crate::search::sync::{SyncReport, rebuild_index};
use crate::state::AppState;

/// Trigger a full index rebuild.
///
/// On success the taxonomy response cache is emptied, since a completed
/// sync is the signal that reference data may have changed.
#[instrument(skip(state))]
pub async fn trigger(State(state): State<AppState>) -> Result<Json<SyncReport>, AppError> {
    let report = rebuild_index(state.pool(), state.search()).await?;
    state.taxonomy_cache().invalidate_all();
    Ok(Json(report))
}

/// Create the admin sync routes router.
pub fn router() -> Router<AppState> {
    Router::new().route("/sync", post(trigger))
}
