//! Prediction collaborator client
//!
//! Invokes the external salary predictor in one of two configured shapes:
//!
//! - Batched (preferred): one POST with a JSON array of
//!   `{employeeId, baseSalary, bonus, deductions}`; the response is a JSON
//!   array of `{employeeId, predictedTotal}` in any order, optionally with
//!   `lowerBound`/`upperBound`, matched by `employeeId`.
//! - Per-record: one POST per record `{baseSalary, bonus, deductions}` →
//!   `{predictedTotal}`, correlated by request order.

use crate::config::PredictionMode;
use salins_common::{CompensationRecord, Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One employee's prediction as returned by the collaborator, keyed for the
/// merge step
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prediction {
    pub employee_id: String,
    pub predicted_total: f64,
    #[serde(default)]
    pub lower_bound: Option<f64>,
    #[serde(default)]
    pub upper_bound: Option<f64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BatchRequestItem<'a> {
    employee_id: &'a str,
    base_salary: f64,
    bonus: f64,
    deductions: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SingleRequest {
    base_salary: f64,
    bonus: f64,
    deductions: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SingleResponse {
    predicted_total: f64,
    #[serde(default)]
    lower_bound: Option<f64>,
    #[serde(default)]
    upper_bound: Option<f64>,
}

/// Prediction collaborator client
pub struct PredictionClient {
    http_client: reqwest::Client,
    endpoint: String,
    mode: PredictionMode,
}

impl PredictionClient {
    /// Create a client against the configured endpoint URL
    pub fn new(endpoint: String, mode: PredictionMode, timeout: Duration) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            endpoint,
            mode,
        })
    }

    /// Request predictions for the whole batch
    pub async fn predict(&self, records: &[CompensationRecord]) -> Result<Vec<Prediction>> {
        match self.mode {
            PredictionMode::Batched => self.predict_batched(records).await,
            PredictionMode::PerRecord => self.predict_per_record(records).await,
        }
    }

    async fn predict_batched(&self, records: &[CompensationRecord]) -> Result<Vec<Prediction>> {
        let request: Vec<BatchRequestItem> = records
            .iter()
            .map(|record| BatchRequestItem {
                employee_id: &record.employee_id,
                base_salary: record.base_salary,
                bonus: record.bonus,
                deductions: record.deductions,
            })
            .collect();

        tracing::debug!(count = request.len(), url = %self.endpoint, "Requesting batched predictions");

        let response = self
            .http_client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Enrichment(format!(
                "prediction service returned {}: {}",
                status, body
            )));
        }

        response
            .json::<Vec<Prediction>>()
            .await
            .map_err(|e| Error::Enrichment(format!("malformed prediction response: {}", e)))
    }

    /// One call per record; the response carries no key, so correlation is
    /// by request order
    async fn predict_per_record(&self, records: &[CompensationRecord]) -> Result<Vec<Prediction>> {
        let mut predictions = Vec::with_capacity(records.len());

        for record in records {
            let request = SingleRequest {
                base_salary: record.base_salary,
                bonus: record.bonus,
                deductions: record.deductions,
            };

            let response = self
                .http_client
                .post(&self.endpoint)
                .json(&request)
                .send()
                .await
                .map_err(|e| Error::Network(e.to_string()))?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(Error::Enrichment(format!(
                    "prediction service returned {}: {}",
                    status, body
                )));
            }

            let single: SingleResponse = response
                .json()
                .await
                .map_err(|e| Error::Enrichment(format!("malformed prediction response: {}", e)))?;

            predictions.push(Prediction {
                employee_id: record.employee_id.clone(),
                predicted_total: single.predicted_total,
                lower_bound: single.lower_bound,
                upper_bound: single.upper_bound,
            });
        }

        Ok(predictions)
    }
}
