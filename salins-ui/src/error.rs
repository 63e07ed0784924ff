//! Error types for salins-ui
//!
//! Every failure surfaces to the client as a single human-readable message
//! plus a title class, and leaves the dashboard in its empty state rather
//! than a mix of old and new data.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use salins_common::Error;
use serde_json::json;
use thiserror::Error as ThisError;

/// API error type
#[derive(Debug, ThisError)]
pub enum ApiError {
    /// Upload rejected before parsing (415)
    #[error("Please upload a .csv file (got {0})")]
    InvalidFileType(String),

    /// No dataset has been uploaded yet (404)
    #[error("No data available. Upload a CSV file to get started.")]
    NoData,

    /// Core pipeline error (CSV validation or enrichment)
    #[error(transparent)]
    Core(#[from] Error),

    /// Internal server error (500)
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, title) = match &self {
            ApiError::InvalidFileType(_) => (
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                "INVALID_FILE_TYPE",
                "Invalid File Type",
            ),
            ApiError::NoData => (StatusCode::NOT_FOUND, "NO_DATA", "No Data"),
            ApiError::Core(Error::Schema(_)) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "SCHEMA_ERROR",
                "Error Processing File",
            ),
            ApiError::Core(Error::Format { .. }) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "FORMAT_ERROR",
                "Error Processing File",
            ),
            ApiError::Core(Error::Enrichment(_)) => (
                StatusCode::BAD_GATEWAY,
                "ENRICHMENT_ERROR",
                "Error Processing File",
            ),
            ApiError::Core(Error::Network(_)) => (
                StatusCode::BAD_GATEWAY,
                "NETWORK_ERROR",
                "Error Processing File",
            ),
            ApiError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "Error Processing File",
            ),
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "title": title,
                "message": self.to_string(),
            }
        }));

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
