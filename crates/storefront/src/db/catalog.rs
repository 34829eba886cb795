//! Catalog repository for the index sync job.
//!
//! One query flattens the relational catalog into per-product rows carrying
//! aggregated fitment metadata. The sync job turns these rows into search
//! documents; nothing else reads them.

use sqlx::PgPool;

use axleworks_core::{CategoryId, Price, ProductId};

use super::RepositoryError;

/// One product row joined with its aggregated fitment metadata.
///
/// The projection groups over left joins, so columns that look non-null in
/// the schema come back without nullability metadata; the identifier is
/// decoded as nullable and the sync guard rejects any row that lost it.
/// `fits_makes`/`fits_models` are `None` (not empty arrays) for products
/// with zero fitment rows because of the aggregate FILTER clauses.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DenormalizedProduct {
    pub id: Option<ProductId>,
    pub title: String,
    pub slug: String,
    pub price: Price,
    pub stock_count: i32,
    pub category_id: Option<CategoryId>,
    pub category_slug: Option<String>,
    pub part_number: String,
    pub attributes: serde_json::Value,
    pub year_start: Option<i32>,
    pub year_end: Option<i32>,
    pub fits_makes: Option<Vec<String>>,
    pub fits_models: Option<Vec<String>>,
}

/// Repository for catalog reads feeding the sync job.
pub struct CatalogRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CatalogRepository<'a> {
    /// Create a new catalog repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Fetch every product with its aggregated fitment metadata.
    ///
    /// Products with zero fitment rows are still present (universal parts
    /// must not be dropped from search); their aggregates come back null.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn denormalized_products(
        &self,
    ) -> Result<Vec<DenormalizedProduct>, RepositoryError> {
        let rows = sqlx::query_as::<_, DenormalizedProduct>(
            r"
            SELECT
                p.id,
                p.title,
                p.slug,
                p.price,
                p.stock_count,
                p.category_id,
                c.slug AS category_slug,
                p.part_number,
                p.attributes,
                MIN(vv.year_from) AS year_start,
                MAX(vv.year_to)   AS year_end,
                ARRAY_AGG(DISTINCT mk.name) FILTER (WHERE mk.name IS NOT NULL) AS fits_makes,
                ARRAY_AGG(DISTINCT md.name) FILTER (WHERE md.name IS NOT NULL) AS fits_models
            FROM product p
            LEFT JOIN category c ON c.id = p.category_id
            LEFT JOIN product_fitment pf ON pf.product_id = p.id
            LEFT JOIN vehicle_variant vv ON vv.id = pf.variant_id
            LEFT JOIN vehicle_model md ON md.id = vv.model_id
            LEFT JOIN vehicle_make mk ON mk.id = md.make_id
            GROUP BY p.id, c.slug
            ORDER BY p.id
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }
}
