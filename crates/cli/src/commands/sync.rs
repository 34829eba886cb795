//! Rebuild the search index from current relational state.
//!
//! The command-line flavor of the operator sync trigger, for cron jobs and
//! deploy hooks. Same job as `POST /api/admin/sync`; there is no taxonomy
//! cache to invalidate here because no server is involved.

use tracing::info;

use axleworks_storefront::config::StorefrontConfig;
use axleworks_storefront::db;
use axleworks_storefront::search::SearchClient;
use axleworks_storefront::search::sync::rebuild_index;

/// Run a full index rebuild.
///
/// # Errors
///
/// Returns an error if configuration is incomplete, the database or index
/// is unreachable, or the sync job aborts (including integrity faults).
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    // Loads .env itself, and validates the search index configuration
    let config = StorefrontConfig::from_env()?;

    let pool = db::create_pool(&config.database_url).await?;
    let search = SearchClient::new(&config.search)?;

    let report = rebuild_index(&pool, &search).await?;

    info!(
        products = report.products_indexed,
        duration_ms = report.duration_ms,
        "Index rebuild complete"
    );
    Ok(())
}
