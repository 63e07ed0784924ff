//! Shared core for Salary Insights
//!
//! Holds the canonical record schema, the CSV ingestion/validation pipeline,
//! the per-department aggregation layer, and the sort/paginate table view
//! model. Pure and synchronous; the service crate layers enrichment and the
//! HTTP surface on top.

pub mod aggregate;
pub mod csv;
pub mod error;
pub mod record;
pub mod table;

pub use error::{Error, Result};
pub use record::{
    AnalysisInsights, AnomalyLabel, CompensationRecord, DepartmentAggregate, DriftInsights,
    FairnessInsights,
};
