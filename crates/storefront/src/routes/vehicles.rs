//! Vehicle taxonomy route handlers.
//!
//! Serves the storefront's picker endpoints (make -> model -> year). The
//! taxonomy rarely changes, so responses go through the taxonomy cache; the
//! sync trigger empties it when the underlying data may have moved.
//!
//! Unknown ids are rejected as invalid filters rather than answered with an
//! empty list, so a caller can tell "nothing configured yet" apart from a
//! typo'd identifier.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use tracing::instrument;

use axleworks_core::{MakeId, ModelId, expand_years};

use crate::cache::{CacheKey, CacheValue};
use crate::db::VehicleRepository;
use crate::db::vehicles::{Make, VehicleModel};
use crate::error::AppError;
use crate::state::AppState;

/// List all makes, sorted by name.
#[instrument(skip(state))]
pub async fn list_makes(
    State(state): State<AppState>,
) -> Result<Json<Arc<Vec<Make>>>, AppError> {
    if let Some(CacheValue::Makes(makes)) = state.taxonomy_cache().get(&CacheKey::Makes).await {
        return Ok(Json(makes));
    }

    let makes = Arc::new(VehicleRepository::new(state.pool()).list_makes().await?);
    state
        .taxonomy_cache()
        .insert(CacheKey::Makes, CacheValue::Makes(Arc::clone(&makes)))
        .await;

    Ok(Json(makes))
}

/// List a make's models, sorted by name.
#[instrument(skip(state))]
pub async fn list_models(
    State(state): State<AppState>,
    Path(make_id): Path<i32>,
) -> Result<Json<Arc<Vec<VehicleModel>>>, AppError> {
    let make_id = MakeId::new(make_id);

    if let Some(CacheValue::Models(models)) = state
        .taxonomy_cache()
        .get(&CacheKey::Models(make_id))
        .await
    {
        return Ok(Json(models));
    }

    let repo = VehicleRepository::new(state.pool());
    if !repo.make_exists(make_id).await? {
        return Err(AppError::InvalidFilter(format!("unknown make_id: {make_id}")));
    }

    let models = Arc::new(repo.list_models(make_id).await?);
    state
        .taxonomy_cache()
        .insert(
            CacheKey::Models(make_id),
            CacheValue::Models(Arc::clone(&models)),
        )
        .await;

    Ok(Json(models))
}

/// List the distinct model years a model's variants cover, most recent
/// first. A known model with no variants yields an empty list.
#[instrument(skip(state))]
pub async fn list_years(
    State(state): State<AppState>,
    Path(model_id): Path<i32>,
) -> Result<Json<Arc<Vec<i32>>>, AppError> {
    let model_id = ModelId::new(model_id);

    if let Some(CacheValue::Years(years)) = state
        .taxonomy_cache()
        .get(&CacheKey::Years(model_id))
        .await
    {
        return Ok(Json(years));
    }

    let repo = VehicleRepository::new(state.pool());
    if !repo.model_exists(model_id).await? {
        return Err(AppError::InvalidFilter(format!("unknown model_id: {model_id}")));
    }

    let ranges = repo.model_year_ranges(model_id).await?;
    let years = Arc::new(expand_years(ranges));
    state
        .taxonomy_cache()
        .insert(
            CacheKey::Years(model_id),
            CacheValue::Years(Arc::clone(&years)),
        )
        .await;

    Ok(Json(years))
}

/// Create the vehicle taxonomy routes router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/makes", get(list_makes))
        .route("/models/{make_id}", get(list_models))
        .route("/years/{model_id}", get(list_years))
}
