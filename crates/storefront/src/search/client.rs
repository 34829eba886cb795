//! Search index client implementation.
//!
//! Speaks the Meilisearch REST protocol with `reqwest`. Write operations
//! (index creation, settings, document addition, swaps) are asynchronous
//! tasks on the index side; the client enqueues them and polls the task
//! until it settles, so callers observe a synchronous success/failure.

use std::sync::Arc;
use std::time::Duration;

use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use axleworks_core::search_document::{
    FILTERABLE_ATTRIBUTES, PRIMARY_KEY, SEARCHABLE_ATTRIBUTES, SORTABLE_ATTRIBUTES,
};
use axleworks_core::SearchDocument;

use crate::config::SearchIndexConfig;

use super::{SearchError, SearchPage, SearchQuery};

/// How often a pending index task is polled, and for how long.
const TASK_POLL_INTERVAL: Duration = Duration::from_millis(250);
const TASK_POLL_ATTEMPTS: u32 = 240;

// =============================================================================
// SearchClient
// =============================================================================

/// Client for the search index service.
///
/// Cheaply cloneable via `Arc`. Holds one `reqwest::Client` with the
/// configured per-request timeout; the index service is responsible for its
/// own internal concurrency control, so no coordination happens here.
#[derive(Clone)]
pub struct SearchClient {
    inner: Arc<SearchClientInner>,
}

struct SearchClientInner {
    client: reqwest::Client,
    base_url: String,
    index_uid: String,
    api_key: Option<String>,
}

impl SearchClient {
    /// Create a new search index client.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: &SearchIndexConfig) -> Result<Self, SearchError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            inner: Arc::new(SearchClientInner {
                client,
                base_url: config.base_url.as_str().trim_end_matches('/').to_string(),
                index_uid: config.index_uid.clone(),
                api_key: config
                    .api_key
                    .as_ref()
                    .map(|key| key.expose_secret().to_string()),
            }),
        })
    }

    /// The uid of the serving index.
    #[must_use]
    pub fn index_uid(&self) -> &str {
        &self.inner.index_uid
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{path}", self.inner.base_url);
        let mut builder = self.inner.client.request(method, url);
        if let Some(key) = &self.inner.api_key {
            builder = builder.bearer_auth(key);
        }
        builder
    }

    /// Read a response body, mapping non-success statuses to `SearchError::Api`.
    async fn read_body(response: reqwest::Response) -> Result<String, SearchError> {
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            // The index reports errors as JSON with a `message` field; fall
            // back to the raw body when it doesn't.
            let message = serde_json::from_str::<ApiErrorBody>(&text)
                .map_or_else(|_| text.chars().take(200).collect(), |body| body.message);
            return Err(SearchError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(text)
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Check the index service's health endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the service is unreachable or unhealthy.
    pub async fn health(&self) -> Result<(), SearchError> {
        let response = self.request(reqwest::Method::GET, "/health").send().await?;
        Self::read_body(response).await?;
        Ok(())
    }

    /// Run one ranked, filtered, paginated query against the serving index.
    ///
    /// # Errors
    ///
    /// Returns an error if the service is unreachable, rejects the query, or
    /// answers with a body that does not match the document contract.
    #[instrument(skip(self), fields(index = %self.inner.index_uid))]
    pub async fn search(&self, query: &SearchQuery) -> Result<SearchPage, SearchError> {
        let path = format!("/indexes/{}/search", self.inner.index_uid);
        let body = SearchRequestBody {
            q: &query.q,
            filter: query.filter.as_deref(),
            limit: query.limit,
            offset: query.offset,
        };

        let response = self
            .request(reqwest::Method::POST, &path)
            .json(&body)
            .send()
            .await?;

        let text = Self::read_body(response).await?;
        let parsed: SearchResponseBody = serde_json::from_str(&text)?;

        let total_hits = parsed
            .estimated_total_hits
            .unwrap_or(parsed.hits.len() as u64);

        Ok(SearchPage {
            hits: parsed.hits,
            total_hits,
            limit: parsed.limit,
            offset: parsed.offset,
        })
    }

    // =========================================================================
    // Document replacement
    // =========================================================================

    /// Atomically replace the serving index's document set.
    ///
    /// Documents are written to a staging index which is then swapped with
    /// the serving one, so a failure at any step leaves the currently
    /// served documents untouched. The staging index is configured from the
    /// document contract's attribute lists before the swap.
    ///
    /// # Errors
    ///
    /// Returns an error if any request fails or any index task ends in
    /// failure; in that case no swap has happened.
    #[instrument(skip_all, fields(index = %self.inner.index_uid, documents = documents.len()))]
    pub async fn replace_all_documents(
        &self,
        documents: &[SearchDocument],
    ) -> Result<(), SearchError> {
        let serving = self.inner.index_uid.clone();
        let staging = format!("{serving}_staging");

        // The swap requires both sides to exist; the serving index may not
        // on the very first sync.
        self.ensure_index(&serving).await?;

        // Drop any staging leftovers from an aborted previous run.
        self.delete_index_if_exists(&staging).await?;
        self.ensure_index(&staging).await?;
        self.apply_settings(&staging).await?;

        let task = self.add_documents(&staging, documents).await?;
        self.wait_for_task(task, &[]).await?;
        debug!(staging = %staging, "staging index populated");

        let task = self.swap_indexes(&serving, &staging).await?;
        self.wait_for_task(task, &[]).await?;

        // Post-swap the staging uid holds the previous document set; clean
        // it up on a best-effort basis.
        self.delete_index_if_exists(&staging).await?;

        Ok(())
    }

    /// Create an index with the contract's primary key, tolerating one that
    /// already exists.
    async fn ensure_index(&self, uid: &str) -> Result<(), SearchError> {
        let response = self
            .request(reqwest::Method::POST, "/indexes")
            .json(&CreateIndexBody {
                uid,
                primary_key: PRIMARY_KEY,
            })
            .send()
            .await?;

        let text = Self::read_body(response).await?;
        let task: TaskRef = serde_json::from_str(&text)?;
        self.wait_for_task(task.task_uid, &["index_already_exists"])
            .await
    }

    /// Delete an index, tolerating one that does not exist.
    async fn delete_index_if_exists(&self, uid: &str) -> Result<(), SearchError> {
        let path = format!("/indexes/{uid}");
        let response = self.request(reqwest::Method::DELETE, &path).send().await?;

        let text = Self::read_body(response).await?;
        let task: TaskRef = serde_json::from_str(&text)?;
        self.wait_for_task(task.task_uid, &["index_not_found"]).await
    }

    /// Configure an index's attributes from the document contract.
    async fn apply_settings(&self, uid: &str) -> Result<(), SearchError> {
        let path = format!("/indexes/{uid}/settings");
        let response = self
            .request(reqwest::Method::PATCH, &path)
            .json(&IndexSettingsBody {
                searchable_attributes: SEARCHABLE_ATTRIBUTES,
                filterable_attributes: FILTERABLE_ATTRIBUTES,
                sortable_attributes: SORTABLE_ATTRIBUTES,
            })
            .send()
            .await?;

        let text = Self::read_body(response).await?;
        let task: TaskRef = serde_json::from_str(&text)?;
        self.wait_for_task(task.task_uid, &[]).await
    }

    /// Add (or replace by primary key) documents on an index.
    async fn add_documents(
        &self,
        uid: &str,
        documents: &[SearchDocument],
    ) -> Result<u64, SearchError> {
        let path = format!("/indexes/{uid}/documents");
        let response = self
            .request(reqwest::Method::PUT, &path)
            .json(documents)
            .send()
            .await?;

        let text = Self::read_body(response).await?;
        let task: TaskRef = serde_json::from_str(&text)?;
        Ok(task.task_uid)
    }

    /// Swap two indexes in one atomic operation.
    async fn swap_indexes(&self, a: &str, b: &str) -> Result<u64, SearchError> {
        let response = self
            .request(reqwest::Method::POST, "/swap-indexes")
            .json(&[SwapBody {
                indexes: [a.to_string(), b.to_string()],
            }])
            .send()
            .await?;

        let text = Self::read_body(response).await?;
        let task: TaskRef = serde_json::from_str(&text)?;
        Ok(task.task_uid)
    }

    /// Poll a task until it settles.
    ///
    /// `tolerated_codes` lists task error codes treated as success (e.g.,
    /// deleting an index that is already gone).
    async fn wait_for_task(
        &self,
        task_uid: u64,
        tolerated_codes: &[&str],
    ) -> Result<(), SearchError> {
        let path = format!("/tasks/{task_uid}");

        for _ in 0..TASK_POLL_ATTEMPTS {
            let response = self.request(reqwest::Method::GET, &path).send().await?;
            let text = Self::read_body(response).await?;
            let task: TaskStatusBody = serde_json::from_str(&text)?;

            match task.status.as_str() {
                "succeeded" => return Ok(()),
                "failed" | "canceled" => {
                    let error = task.error.unwrap_or_default();
                    if tolerated_codes.contains(&error.code.as_str()) {
                        return Ok(());
                    }
                    return Err(SearchError::TaskFailed {
                        task_uid,
                        message: error.message,
                    });
                }
                // "enqueued" / "processing": keep polling
                _ => tokio::time::sleep(TASK_POLL_INTERVAL).await,
            }
        }

        Err(SearchError::TaskTimeout(task_uid))
    }
}

// =============================================================================
// Wire types
// =============================================================================

#[derive(Debug, Serialize)]
struct SearchRequestBody<'a> {
    q: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    filter: Option<&'a str>,
    limit: u32,
    offset: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchResponseBody {
    hits: Vec<SearchDocument>,
    estimated_total_hits: Option<u64>,
    limit: u32,
    offset: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateIndexBody<'a> {
    uid: &'a str,
    primary_key: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct IndexSettingsBody {
    searchable_attributes: &'static [&'static str],
    filterable_attributes: &'static [&'static str],
    sortable_attributes: &'static [&'static str],
}

#[derive(Debug, Serialize)]
struct SwapBody {
    indexes: [String; 2],
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TaskRef {
    task_uid: u64,
}

#[derive(Debug, Deserialize)]
struct TaskStatusBody {
    status: String,
    error: Option<TaskErrorBody>,
}

#[derive(Debug, Default, Deserialize)]
struct TaskErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    code: String,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_request_omits_absent_filter() {
        let body = SearchRequestBody {
            q: "brake",
            filter: None,
            limit: 20,
            offset: 0,
        };
        let json = serde_json::to_string(&body).expect("serialize");
        assert!(!json.contains("filter"));
    }

    #[test]
    fn search_request_includes_filter() {
        let body = SearchRequestBody {
            q: "brake",
            filter: Some(r#"fits_makes = "Honda""#),
            limit: 20,
            offset: 40,
        };
        let json = serde_json::to_string(&body).expect("serialize");
        assert!(json.contains(r#""filter":"fits_makes = \"Honda\"""#));
        assert!(json.contains(r#""offset":40"#));
    }

    #[test]
    fn search_response_parses_estimated_total() {
        let json = r#"{
            "hits": [],
            "estimatedTotalHits": 45,
            "limit": 20,
            "offset": 0,
            "processingTimeMs": 1,
            "query": "brake"
        }"#;
        let parsed: SearchResponseBody = serde_json::from_str(json).expect("parse");
        assert_eq!(parsed.estimated_total_hits, Some(45));
        assert!(parsed.hits.is_empty());
    }

    #[test]
    fn task_status_parses_error_code() {
        let json = r#"{
            "uid": 7,
            "status": "failed",
            "error": {
                "message": "Index `products_staging` not found.",
                "code": "index_not_found",
                "type": "invalid_request"
            }
        }"#;
        let parsed: TaskStatusBody = serde_json::from_str(json).expect("parse");
        assert_eq!(parsed.status, "failed");
        assert_eq!(
            parsed.error.expect("error present").code,
            "index_not_found"
        );
    }
}
