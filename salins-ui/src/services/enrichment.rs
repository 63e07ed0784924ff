//! Enrichment orchestration
//!
//! Issues one logical request to each external collaborator, joined with an
//! all-succeed-or-fail barrier, then merges the returned values onto fresh
//! clones of the records by `employee_id`. Enrichment is atomic: either
//! every returned value is merged and the batch is handed back, or the
//! caller gets an error and no partially-enriched set exists anywhere.

use crate::config::UiConfig;
use crate::services::analysis_client::{AnalysisClient, AnalysisOutcome};
use crate::services::prediction_client::{Prediction, PredictionClient};
use salins_common::{AnalysisInsights, CompensationRecord, Error, Result};
use std::collections::HashMap;
use tokio_util::sync::CancellationToken;

/// Result of one upload's enrichment cycle
#[derive(Debug, Clone)]
pub struct EnrichedBatch {
    pub employees: Vec<CompensationRecord>,
    pub insights: AnalysisInsights,
}

/// Coordinates the prediction and analysis collaborators for one batch
///
/// Both endpoint URLs are injected at construction; nothing is read from
/// ambient process state at call time.
pub struct Enricher {
    prediction: PredictionClient,
    analysis: AnalysisClient,
}

impl Enricher {
    pub fn new(config: &UiConfig) -> Result<Self> {
        Ok(Self {
            prediction: PredictionClient::new(
                config.prediction_url.clone(),
                config.prediction_mode,
                config.request_timeout(),
            )?,
            analysis: AnalysisClient::new(config.analysis_url.clone(), config.request_timeout())?,
        })
    }

    /// Enrich one validated batch
    ///
    /// The two collaborator calls run concurrently and are joined before any
    /// merging happens. Cancelling the token (a newer upload superseding
    /// this one) abandons the join and fails the cycle.
    pub async fn enrich(
        &self,
        records: &[CompensationRecord],
        cancel: &CancellationToken,
    ) -> Result<EnrichedBatch> {
        if records.is_empty() {
            return Ok(EnrichedBatch {
                employees: Vec::new(),
                insights: AnalysisInsights {
                    fairness: None,
                    drift: None,
                },
            });
        }

        let (predictions, outcome) = tokio::select! {
            _ = cancel.cancelled() => {
                return Err(Error::Enrichment(
                    "enrichment cancelled by a newer upload".to_string(),
                ));
            }
            joined = async {
                tokio::try_join!(
                    self.prediction.predict(records),
                    self.analysis.analyze(records),
                )
            } => joined?,
        };

        tracing::info!(
            records = records.len(),
            predictions = predictions.len(),
            analyzed = outcome.employees.len(),
            "Collaborator calls complete, merging"
        );

        let employees = merge_enrichment(records, &predictions, &outcome)?;
        Ok(EnrichedBatch {
            employees,
            insights: AnalysisInsights {
                fairness: outcome.fairness_insights,
                drift: outcome.drift_insights,
            },
        })
    }
}

/// Merge collaborator results onto fresh clones of the records
///
/// Matching is by `employee_id`; records with no match from a given
/// collaborator keep that field absent, never defaulted. Returned ids that
/// match nothing in the batch are logged and skipped. Bounds, when present,
/// must bracket the predicted value.
pub fn merge_enrichment(
    records: &[CompensationRecord],
    predictions: &[Prediction],
    outcome: &AnalysisOutcome,
) -> Result<Vec<CompensationRecord>> {
    let mut employees: Vec<CompensationRecord> = records.to_vec();
    let index: HashMap<String, usize> = employees
        .iter()
        .enumerate()
        .map(|(i, record)| (record.employee_id.clone(), i))
        .collect();

    for prediction in predictions {
        let Some(&i) = index.get(&prediction.employee_id) else {
            tracing::warn!(
                employee_id = %prediction.employee_id,
                "Prediction for unknown employee, skipping"
            );
            continue;
        };

        check_bounds(
            &prediction.employee_id,
            prediction.predicted_total,
            prediction.lower_bound,
            prediction.upper_bound,
        )?;

        let record = &mut employees[i];
        record.predicted_compensation = Some(prediction.predicted_total);
        record.prediction_lower_bound = prediction.lower_bound;
        record.prediction_upper_bound = prediction.upper_bound;
    }

    for analyzed in &outcome.employees {
        let Some(&i) = index.get(&analyzed.employee_id) else {
            tracing::warn!(
                employee_id = %analyzed.employee_id,
                "Analysis result for unknown employee, skipping"
            );
            continue;
        };

        let record = &mut employees[i];
        if let Some(label) = analyzed.anomaly_label {
            record.anomaly_label = Some(label);
        }
        if let Some(predicted) = analyzed.predicted_compensation {
            check_bounds(
                &analyzed.employee_id,
                predicted,
                analyzed.prediction_lower_bound,
                analyzed.prediction_upper_bound,
            )?;
            record.predicted_compensation = Some(predicted);
            record.prediction_lower_bound = analyzed.prediction_lower_bound;
            record.prediction_upper_bound = analyzed.prediction_upper_bound;
        }
    }

    Ok(employees)
}

/// Enforce `lower <= predicted <= upper` for whichever bounds are present
fn check_bounds(
    employee_id: &str,
    predicted: f64,
    lower: Option<f64>,
    upper: Option<f64>,
) -> Result<()> {
    let lower_ok = lower.map_or(true, |lo| lo <= predicted);
    let upper_ok = upper.map_or(true, |hi| predicted <= hi);
    if lower_ok && upper_ok {
        Ok(())
    } else {
        Err(Error::Enrichment(format!(
            "prediction bounds do not bracket the predicted value for employee {}",
            employee_id
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::analysis_client::AnalyzedEmployee;
    use salins_common::AnomalyLabel;

    fn record(id: &str) -> CompensationRecord {
        CompensationRecord::new(
            id.to_string(),
            "Test".to_string(),
            "Eng".to_string(),
            "Jan".to_string(),
            1000.0,
            200.0,
            50.0,
        )
    }

    fn prediction(id: &str, total: f64) -> Prediction {
        serde_json::from_value(serde_json::json!({
            "employeeId": id,
            "predictedTotal": total,
        }))
        .unwrap()
    }

    fn outcome(employees: Vec<AnalyzedEmployee>) -> AnalysisOutcome {
        AnalysisOutcome {
            employees,
            fairness_insights: None,
            drift_insights: None,
        }
    }

    fn analyzed(id: &str, label: AnomalyLabel) -> AnalyzedEmployee {
        serde_json::from_value(serde_json::json!({
            "employeeId": id,
            "anomalyLabel": label,
        }))
        .unwrap()
    }

    #[test]
    fn merges_by_employee_id_regardless_of_order() {
        let records = vec![record("E1"), record("E2")];
        let predictions = vec![prediction("E2", 2000.0), prediction("E1", 1100.0)];
        let analysis = outcome(vec![
            analyzed("E2", AnomalyLabel::Anomaly),
            analyzed("E1", AnomalyLabel::Normal),
        ]);

        let merged = merge_enrichment(&records, &predictions, &analysis).unwrap();
        assert_eq!(merged[0].predicted_compensation, Some(1100.0));
        assert_eq!(merged[0].anomaly_label, Some(AnomalyLabel::Normal));
        assert_eq!(merged[1].predicted_compensation, Some(2000.0));
        assert_eq!(merged[1].anomaly_label, Some(AnomalyLabel::Anomaly));
    }

    #[test]
    fn unmatched_records_keep_fields_absent() {
        let records = vec![record("E1"), record("E2")];
        let predictions = vec![prediction("E1", 1100.0)];
        let analysis = outcome(vec![analyzed("E1", AnomalyLabel::Normal)]);

        let merged = merge_enrichment(&records, &predictions, &analysis).unwrap();
        assert!(merged[1].predicted_compensation.is_none());
        assert!(merged[1].anomaly_label.is_none());
    }

    #[test]
    fn unknown_ids_from_collaborators_are_skipped() {
        let records = vec![record("E1")];
        let predictions = vec![prediction("E9", 9999.0)];
        let analysis = outcome(vec![analyzed("E9", AnomalyLabel::Anomaly)]);

        let merged = merge_enrichment(&records, &predictions, &analysis).unwrap();
        assert_eq!(merged.len(), 1);
        assert!(merged[0].predicted_compensation.is_none());
        assert!(merged[0].anomaly_label.is_none());
    }

    #[test]
    fn bounds_must_bracket_the_prediction() {
        let records = vec![record("E1")];
        let bad: Prediction = serde_json::from_value(serde_json::json!({
            "employeeId": "E1",
            "predictedTotal": 1000.0,
            "lowerBound": 1200.0,
            "upperBound": 1400.0,
        }))
        .unwrap();

        let result = merge_enrichment(&records, &[bad], &outcome(vec![]));
        assert!(matches!(result, Err(Error::Enrichment(_))));
    }

    #[test]
    fn valid_bounds_are_carried_onto_the_record() {
        let records = vec![record("E1")];
        let good: Prediction = serde_json::from_value(serde_json::json!({
            "employeeId": "E1",
            "predictedTotal": 1150.0,
            "lowerBound": 1000.0,
            "upperBound": 1300.0,
        }))
        .unwrap();

        let merged = merge_enrichment(&records, &[good], &outcome(vec![])).unwrap();
        assert_eq!(merged[0].prediction_lower_bound, Some(1000.0));
        assert_eq!(merged[0].prediction_upper_bound, Some(1300.0));
    }

    #[test]
    fn merge_never_mutates_the_input_records() {
        let records = vec![record("E1")];
        let predictions = vec![prediction("E1", 1100.0)];
        let _ = merge_enrichment(&records, &predictions, &outcome(vec![])).unwrap();
        assert!(records[0].predicted_compensation.is_none());
    }
}
