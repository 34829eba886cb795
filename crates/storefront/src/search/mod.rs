//! Search index client and sync job.
//!
//! # Architecture
//!
//! The search index is an external Meilisearch-protocol service. It owns its
//! document collection and answers ranked, filtered, paginated queries; this
//! service treats it as a rebuildable cache of the relational catalog, never
//! as a source of truth.
//!
//! - [`SearchClient`] - reqwest client for the index's REST API
//! - [`sync`] - the catalog denormalizer that rebuilds the document set
//!
//! # Example
//!
//! ```rust,ignore
//! use axleworks_storefront::search::{SearchClient, SearchQuery};
//!
//! let client = SearchClient::new(&config.search)?;
//! let page = client
//!     .search(&SearchQuery {
//!         q: "brake".to_owned(),
//!         filter: Some(r#"fits_makes = "Honda""#.to_owned()),
//!         limit: 20,
//!         offset: 0,
//!     })
//!     .await?;
//! ```

mod client;
pub mod sync;

pub use client::SearchClient;

use axleworks_core::SearchDocument;
use thiserror::Error;

/// Errors that can occur when talking to the search index service.
#[derive(Debug, Error)]
pub enum SearchError {
    /// HTTP request failed (unreachable, timeout).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The index service answered with a non-success status.
    #[error("index service returned {status}: {message}")]
    Api { status: u16, message: String },

    /// JSON parsing of a response body failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// An asynchronous index task ended in failure.
    #[error("index task {task_uid} failed: {message}")]
    TaskFailed { task_uid: u64, message: String },

    /// An asynchronous index task did not settle in time.
    #[error("timed out waiting for index task {0}")]
    TaskTimeout(u64),
}

/// A fully-built index query: free text plus an optional filter expression
/// and pagination. Construction (validation, filter building) happens in the
/// query orchestrator; this is what goes on the wire.
#[derive(Debug, Clone)]
pub struct SearchQuery {
    pub q: String,
    pub filter: Option<String>,
    pub limit: u32,
    pub offset: u32,
}

/// One page of ranked results.
#[derive(Debug)]
pub struct SearchPage {
    pub hits: Vec<SearchDocument>,
    /// Total matches ignoring pagination (the index's estimate).
    pub total_hits: u64,
    pub limit: u32,
    pub offset: u32,
}
