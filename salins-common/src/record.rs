//! Canonical record schema for employee compensation data
//!
//! All other components depend on these shapes; any wire-name change here is
//! a breaking change for the CSV header contract and for the external
//! collaborator payloads.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Anomaly classification assigned by the analysis collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AnomalyLabel {
    Normal,
    Anomaly,
}

/// One employee's compensation entry for one reporting period
///
/// Enrichment fields (`predicted_compensation`, the prediction bounds, and
/// `anomaly_label`) stay absent until the enrichment step completes for the
/// whole batch; they are never defaulted to zero. Absent optionals are
/// omitted from JSON entirely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompensationRecord {
    /// Stable external identifier; merge key and table row key
    pub employee_id: String,
    pub name: String,
    pub department: String,
    /// Reporting month ("period" in the CSV header)
    pub period: String,
    pub base_salary: f64,
    pub bonus: f64,
    pub deductions: f64,
    /// Derived at parse time; always `base_salary + bonus - deductions`
    pub total_compensation: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub predicted_compensation: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prediction_lower_bound: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prediction_upper_bound: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anomaly_label: Option<AnomalyLabel>,
}

impl CompensationRecord {
    /// Build a record from its parsed CSV fields, deriving the total
    pub fn new(
        employee_id: String,
        name: String,
        department: String,
        period: String,
        base_salary: f64,
        bonus: f64,
        deductions: f64,
    ) -> Self {
        Self {
            employee_id,
            name,
            department,
            period,
            base_salary,
            bonus,
            deductions,
            total_compensation: base_salary + bonus - deductions,
            predicted_compensation: None,
            prediction_lower_bound: None,
            prediction_upper_bound: None,
            anomaly_label: None,
        }
    }
}

/// Per-department compensation total
///
/// Ephemeral: recomputed from the current record set on every change, never
/// persisted or fed back into the records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepartmentAggregate {
    pub department: String,
    pub total_compensation: f64,
}

/// Pay-parity summary from the analysis collaborator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FairnessInsights {
    /// Mean-pay ratio per department relative to the highest-paid department
    pub disparate_impact_ratios: HashMap<String, f64>,
    pub bias_alerts: Vec<String>,
    /// Percentage in [0, 100]
    pub parity_score: f64,
    pub recommendation: String,
}

/// Distribution-drift summary from the analysis collaborator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriftInsights {
    pub drift_detected: bool,
    /// Kolmogorov-Smirnov p-value in [0, 1]
    pub p_value: f64,
    #[serde(default)]
    pub drift_score: f64,
    pub status: String,
}

/// Batch-level analysis results, replaced wholesale on each upload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisInsights {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fairness: Option<FairnessInsights>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drift: Option<DriftInsights>,
}
