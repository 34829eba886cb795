//! Application state shared across handlers.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use sqlx::PgPool;

use crate::cache::{CacheKey, CacheValue};
use crate::config::StorefrontConfig;
use crate::search::{SearchClient, SearchError};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like database connections and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    pool: PgPool,
    search: SearchClient,
    taxonomy_cache: Cache<CacheKey, CacheValue>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - Storefront configuration
    /// * `pool` - `PostgreSQL` connection pool
    ///
    /// # Errors
    ///
    /// Returns an error if the search index client cannot be built.
    pub fn new(config: StorefrontConfig, pool: PgPool) -> Result<Self, SearchError> {
        let search = SearchClient::new(&config.search)?;

        // The sync trigger invalidates explicitly; the TTL is a backstop for
        // out-of-band taxonomy edits.
        let taxonomy_cache = Cache::builder()
            .max_capacity(1_000)
            .time_to_live(Duration::from_secs(300))
            .build();

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                search,
                taxonomy_cache,
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the search index client.
    #[must_use]
    pub fn search(&self) -> &SearchClient {
        &self.inner.search
    }

    /// Get a reference to the taxonomy response cache.
    #[must_use]
    pub fn taxonomy_cache(&self) -> &Cache<CacheKey, CacheValue> {
        &self.inner.taxonomy_cache
    }
}
