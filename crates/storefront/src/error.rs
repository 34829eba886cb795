//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers should return `Result<T, AppError>`.
//!
//! Mapping to the wire:
//! - `Validation` / `InvalidFilter` are client errors (400), resolved before
//!   any database or index call and never retried.
//! - `Database` (500) and `Search` (502) are dependency failures the caller
//!   may retry; this service does not retry them itself and never degrades
//!   to stale results.
//! - `Sync` covers integrity faults and dependency failures inside an index
//!   rebuild; surfaced to the operator as a 500.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::search::SearchError;
use crate::search::sync::SyncError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Malformed or out-of-range caller input.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A supplied taxonomy identifier does not exist.
    #[error("Invalid filter: {0}")]
    InvalidFilter(String),

    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Search index operation failed.
    #[error("Search index error: {0}")]
    Search(#[from] SearchError),

    /// Index rebuild failed.
    #[error("Sync error: {0}")]
    Sync(#[from] SyncError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if matches!(self, Self::Database(_) | Self::Search(_) | Self::Sync(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Validation(_) | Self::InvalidFilter(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Database(_) | Self::Sync(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Search(_) => StatusCode::BAD_GATEWAY,
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Database(_) => "Internal server error".to_string(),
            Self::Search(_) => "Search service error".to_string(),
            Self::Sync(_) => "Index sync failed".to_string(),
            _ => self.to_string(),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::InvalidFilter("unknown make_id: 999".to_string());
        assert_eq!(err.to_string(), "Invalid filter: unknown make_id: 999");

        let err = AppError::Validation("invalid limit (1-100)".to_string());
        assert_eq!(err.to_string(), "Validation error: invalid limit (1-100)");
    }

    #[test]
    fn test_app_error_status_codes() {
        fn get_status(err: AppError) -> StatusCode {
            let response = err.into_response();
            response.status()
        }

        assert_eq!(
            get_status(AppError::Validation("test".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::InvalidFilter("test".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::NotFound("test".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Sync(SyncError::Integrity("test".to_string()))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
