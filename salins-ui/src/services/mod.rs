//! External collaborator clients and the enrichment orchestrator

pub mod analysis_client;
pub mod enrichment;
pub mod prediction_client;

pub use analysis_client::{AnalysisClient, AnalysisOutcome, AnalyzedEmployee};
pub use enrichment::{EnrichedBatch, Enricher};
pub use prediction_client::{Prediction, PredictionClient};
