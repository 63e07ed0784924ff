//! Common error types for Salary Insights

use thiserror::Error;

/// Common result type for Salary Insights operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error taxonomy shared by the ingestion and enrichment pipeline
///
/// All four kinds are fatal to their phase: a schema or format error aborts
/// the whole upload, an enrichment or network error aborts the whole
/// enrichment step. None are retried automatically.
#[derive(Error, Debug)]
pub enum Error {
    /// CSV header is missing one or more required columns
    #[error("CSV is missing required columns: {0}")]
    Schema(String),

    /// A data row failed validation (row numbers are 1-indexed physical lines,
    /// so the first data row is row 2)
    #[error("Invalid value in row {row}: {message}")]
    Format { row: usize, message: String },

    /// An external collaborator failed or returned a malformed payload
    #[error("Enrichment failed: {0}")]
    Enrichment(String),

    /// Transport failure reaching an external collaborator
    #[error("Network error: {0}")]
    Network(String),
}
