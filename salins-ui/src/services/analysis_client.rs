//! Analysis collaborator client
//!
//! Calls the anomaly/fairness/drift microservice: `POST {base}/analyze` with
//! the batch of records as a JSON array. A 2xx response carries per-employee
//! anomaly labels plus batch-level fairness and drift insights; a non-2xx
//! response carries `{"detail": "..."}`, which is surfaced as the error
//! message.

use salins_common::{
    AnomalyLabel, CompensationRecord, DriftInsights, Error, FairnessInsights, Result,
};
use serde::Deserialize;
use std::time::Duration;

/// Per-employee fields returned by the analysis service, keyed for the merge
/// step; anything the service did not fill stays absent
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzedEmployee {
    pub employee_id: String,
    #[serde(default)]
    pub anomaly_label: Option<AnomalyLabel>,
    #[serde(default)]
    pub predicted_compensation: Option<f64>,
    #[serde(default)]
    pub prediction_lower_bound: Option<f64>,
    #[serde(default)]
    pub prediction_upper_bound: Option<f64>,
}

/// Full `/analyze` response body
#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisOutcome {
    pub employees: Vec<AnalyzedEmployee>,
    #[serde(default)]
    pub fairness_insights: Option<FairnessInsights>,
    #[serde(default)]
    pub drift_insights: Option<DriftInsights>,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    detail: String,
}

/// Analysis collaborator client
pub struct AnalysisClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl AnalysisClient {
    /// Create a client against the configured base URL
    pub fn new(base_url: String, timeout: Duration) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Analyze the whole batch in one call
    pub async fn analyze(&self, records: &[CompensationRecord]) -> Result<AnalysisOutcome> {
        let url = format!("{}/analyze", self.base_url);

        tracing::debug!(count = records.len(), url = %url, "Requesting batch analysis");

        let response = self
            .http_client
            .post(&url)
            .json(&records)
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorDetail>(&body)
                .map(|e| e.detail)
                .unwrap_or_else(|_| format!("analysis service returned {}", status));
            return Err(Error::Enrichment(message));
        }

        response
            .json::<AnalysisOutcome>()
            .await
            .map_err(|e| Error::Enrichment(format!("malformed analysis response: {}", e)))
    }
}
