//! Vehicle taxonomy repository.
//!
//! Read-only access to makes, models, and variants. The taxonomy is
//! administrator-maintained reference data; the request path never mutates
//! it. Queries use sqlx's runtime API with `FromRow` rows so the workspace
//! builds without a live database.

use serde::Serialize;
use sqlx::PgPool;

use axleworks_core::{MakeId, ModelId, YearRange};

use super::RepositoryError;

/// A vehicle manufacturer.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Make {
    pub id: MakeId,
    pub name: String,
}

/// A manufacturer's named vehicle line.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct VehicleModel {
    pub id: ModelId,
    pub name: String,
}

#[derive(Debug, sqlx::FromRow)]
struct VariantSpan {
    year_from: i32,
    year_to: i32,
}

/// Repository for vehicle taxonomy lookups.
pub struct VehicleRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> VehicleRepository<'a> {
    /// Create a new vehicle repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all makes, sorted by name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_makes(&self) -> Result<Vec<Make>, RepositoryError> {
        let makes = sqlx::query_as::<_, Make>(
            "SELECT id, name FROM vehicle_make ORDER BY name ASC",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(makes)
    }

    /// Whether a make with this id exists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn make_exists(&self, id: MakeId) -> Result<bool, RepositoryError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM vehicle_make WHERE id = $1)",
        )
        .bind(id)
        .fetch_one(self.pool)
        .await?;

        Ok(exists)
    }

    /// Resolve a make id to its name, `None` if unknown.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn make_name(&self, id: MakeId) -> Result<Option<String>, RepositoryError> {
        let name = sqlx::query_scalar::<_, String>(
            "SELECT name FROM vehicle_make WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(name)
    }

    /// List a make's models, sorted by name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_models(&self, make_id: MakeId) -> Result<Vec<VehicleModel>, RepositoryError> {
        let models = sqlx::query_as::<_, VehicleModel>(
            "SELECT id, name FROM vehicle_model WHERE make_id = $1 ORDER BY name ASC",
        )
        .bind(make_id)
        .fetch_all(self.pool)
        .await?;

        Ok(models)
    }

    /// Whether a model with this id exists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn model_exists(&self, id: ModelId) -> Result<bool, RepositoryError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM vehicle_model WHERE id = $1)",
        )
        .bind(id)
        .fetch_one(self.pool)
        .await?;

        Ok(exists)
    }

    /// Resolve a model id to its name, `None` if unknown.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn model_name(&self, id: ModelId) -> Result<Option<String>, RepositoryError> {
        let name = sqlx::query_scalar::<_, String>(
            "SELECT name FROM vehicle_model WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(name)
    }

    /// Fetch the year ranges of every variant of a model.
    ///
    /// A model with no variants yields an empty list (valid state: the model
    /// exists but nothing is configured for it yet).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored range is
    /// inverted (the schema CHECK should make this impossible).
    pub async fn model_year_ranges(
        &self,
        model_id: ModelId,
    ) -> Result<Vec<YearRange>, RepositoryError> {
        let spans = sqlx::query_as::<_, VariantSpan>(
            "SELECT year_from, year_to FROM vehicle_variant WHERE model_id = $1",
        )
        .bind(model_id)
        .fetch_all(self.pool)
        .await?;

        let mut ranges = Vec::with_capacity(spans.len());
        for span in spans {
            let range = YearRange::new(span.year_from, span.year_to).map_err(|e| {
                RepositoryError::DataCorruption(format!(
                    "variant of model {model_id} has {e}"
                ))
            })?;
            ranges.push(range);
        }

        Ok(ranges)
    }
}
