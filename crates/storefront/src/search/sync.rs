//! Catalog denormalizer - rebuilds the search index from relational state.
//!
//! Not request-driven: invoked by the operator HTTP trigger or the CLI, and
//! expected to be serialized externally (overlapping runs are last-write-
//! wins at the index). The job is read-only against `PostgreSQL` and
//! idempotent: unchanged relational state produces the same document set.

use std::time::Instant;

use serde::Serialize;
use sqlx::PgPool;
use thiserror::Error;
use tracing::{info, instrument};
use uuid::Uuid;

use axleworks_core::SearchDocument;
use axleworks_core::search_document::SCHEMA_VERSION;

use crate::db::RepositoryError;
use crate::db::catalog::{CatalogRepository, DenormalizedProduct};

use super::{SearchClient, SearchError};

/// Errors that can abort a sync run.
#[derive(Debug, Error)]
pub enum SyncError {
    /// An internal invariant was violated while building documents. Fatal
    /// for the run; nothing is submitted to the index.
    #[error("integrity fault: {0}")]
    Integrity(String),

    /// Reading the relational catalog failed.
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    /// Submitting to the index failed; the serving documents are unchanged.
    #[error(transparent)]
    Index(#[from] SearchError),
}

/// Outcome of a completed sync run.
#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    pub products_indexed: usize,
    pub duration_ms: u64,
}

/// Rebuild the search index's document set from current relational state.
///
/// Every document is built and verified before anything is submitted; bulk
/// replace semantics make a partial submission worse than no submission, so
/// any fault aborts the whole run with the serving index untouched.
///
/// # Errors
///
/// Returns `SyncError::Integrity` if a catalog row lost its identifier,
/// `SyncError::Repository` if the catalog read fails, and `SyncError::Index`
/// if submission fails.
#[instrument(skip_all)]
pub async fn rebuild_index(
    pool: &PgPool,
    search: &SearchClient,
) -> Result<SyncReport, SyncError> {
    let run_id = Uuid::new_v4();
    let started = Instant::now();

    info!(
        %run_id,
        index = %search.index_uid(),
        schema_version = SCHEMA_VERSION,
        "starting catalog sync"
    );

    let rows = CatalogRepository::new(pool).denormalized_products().await?;
    info!(%run_id, rows = rows.len(), "catalog rows fetched");

    let documents = build_documents(rows)?;

    info!(%run_id, documents = documents.len(), "submitting documents");
    search.replace_all_documents(&documents).await?;

    #[allow(clippy::cast_possible_truncation)]
    let report = SyncReport {
        products_indexed: documents.len(),
        duration_ms: started.elapsed().as_millis() as u64,
    };
    info!(
        %run_id,
        products = report.products_indexed,
        duration_ms = report.duration_ms,
        "catalog sync complete"
    );

    Ok(report)
}

/// Turn catalog rows into search documents, verifying the integrity guard:
/// a row that lost its primary identifier poisons the whole batch.
fn build_documents(
    rows: Vec<DenormalizedProduct>,
) -> Result<Vec<SearchDocument>, SyncError> {
    let mut documents = Vec::with_capacity(rows.len());

    for row in rows {
        let id = row.id.ok_or_else(|| {
            SyncError::Integrity(format!(
                "catalog row missing its product id (slug: {})",
                row.slug
            ))
        })?;

        documents.push(SearchDocument {
            id,
            title: row.title,
            slug: row.slug,
            price: row.price,
            stock_count: row.stock_count,
            category_id: row.category_id,
            category_slug: row.category_slug,
            part_number: row.part_number,
            attributes: row.attributes,
            year_start: row.year_start,
            year_end: row.year_end,
            fits_makes: row.fits_makes.unwrap_or_default(),
            fits_models: row.fits_models.unwrap_or_default(),
        });
    }

    Ok(documents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axleworks_core::{Price, ProductId};

    fn row(id: Option<i32>, slug: &str) -> DenormalizedProduct {
        DenormalizedProduct {
            id: id.map(ProductId::new),
            title: "Ceramic Brake Pads (Front)".to_owned(),
            slug: slug.to_owned(),
            price: Price::from_minor_units(4500),
            stock_count: 100,
            category_id: None,
            category_slug: Some("brake-systems".to_owned()),
            part_number: "BCP-5521".to_owned(),
            attributes: serde_json::json!({"position": "Front"}),
            year_start: Some(2016),
            year_end: Some(2021),
            fits_makes: Some(vec!["Honda".to_owned()]),
            fits_models: Some(vec!["Civic".to_owned()]),
        }
    }

    #[test]
    fn builds_documents_from_valid_rows() {
        let documents =
            build_documents(vec![row(Some(1), "pads-front"), row(Some(2), "pads-rear")])
                .expect("valid rows");

        assert_eq!(documents.len(), 2);
        assert_eq!(documents[0].id, ProductId::new(1));
        assert_eq!(documents[0].fits_makes, vec!["Honda".to_owned()]);
    }

    #[test]
    fn missing_identifier_aborts_the_whole_batch() {
        let mut rows: Vec<_> = (1..=500).map(|i| row(Some(i), "ok")).collect();
        rows.insert(250, row(None, "broken-row"));

        let err = build_documents(rows).expect_err("integrity fault");
        match err {
            SyncError::Integrity(message) => assert!(message.contains("broken-row")),
            other => panic!("expected integrity fault, got {other:?}"),
        }
    }

    #[test]
    fn universal_product_keeps_empty_aggregates() {
        let unfit = DenormalizedProduct {
            year_start: None,
            year_end: None,
            fits_makes: None,
            fits_models: None,
            ..row(Some(9), "microfiber-cloth")
        };

        let documents = build_documents(vec![unfit]).expect("valid row");
        assert_eq!(documents.len(), 1);
        assert_eq!(documents[0].year_start, None);
        assert_eq!(documents[0].year_end, None);
        assert!(documents[0].fits_makes.is_empty());
        assert!(documents[0].fits_models.is_empty());
    }
}
