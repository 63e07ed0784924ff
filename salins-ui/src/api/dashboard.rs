//! Dashboard endpoints: CSV upload and the table/chart data it feeds
//!
//! One upload cycle runs parse → enrich → replace the dashboard snapshot.
//! Any failure clears the snapshot entirely; the client never sees a mix of
//! old and new data.

use axum::{
    extract::State,
    http::{header::CONTENT_TYPE, HeaderMap},
    routing::{get, post},
    Json, Router,
};
use salins_common::aggregate::department_totals;
use salins_common::csv::parse_records;
use salins_common::table::{SortDirection, SortField, TableView};
use salins_common::{AnalysisInsights, CompensationRecord, DepartmentAggregate, Error};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::{AppState, DashboardState};

/// Summary returned after a successful upload
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub batch_id: Uuid,
    pub record_count: usize,
    pub departments: Vec<DepartmentAggregate>,
    pub insights: AnalysisInsights,
}

/// One page of the sorted table
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableResponse {
    pub batch_id: Uuid,
    pub rows: Vec<CompensationRecord>,
    pub page: usize,
    pub total_pages: usize,
    pub page_size: usize,
    pub sort: Option<SortField>,
    pub direction: SortDirection,
}

#[derive(Debug, Deserialize)]
pub struct SortRequest {
    pub field: SortField,
}

#[derive(Debug, Deserialize)]
pub struct PageRequest {
    pub page: usize,
}

fn is_csv_content_type(content_type: &str) -> bool {
    let media_type = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();
    media_type == "text/csv" || media_type == "application/csv"
}

/// POST /upload
///
/// Body is the raw CSV text. Non-CSV content types are rejected before any
/// parsing begins.
pub async fn upload_csv(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: String,
) -> ApiResult<Json<UploadResponse>> {
    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("");
    if !is_csv_content_type(content_type) {
        return Err(ApiError::InvalidFileType(if content_type.is_empty() {
            "no content type".to_string()
        } else {
            content_type.to_string()
        }));
    }

    // A new upload supersedes any cycle still in flight
    let cancel = CancellationToken::new();
    {
        let mut active = state.active_upload.write().await;
        if let Some(previous) = active.replace(cancel.clone()) {
            previous.cancel();
        }
    }

    match process_upload(&state, &body, &cancel).await {
        Ok(response) => Ok(Json(response)),
        Err(error) => {
            // Reset to the empty state; no stale partial data remains
            // visible. A superseded cycle must not clear its successor's
            // snapshot, so the clear is guarded by this cycle's token.
            state.clear_dashboard(&cancel).await;
            tracing::warn!(error = %error, "Upload failed, dashboard cleared");
            Err(error)
        }
    }
}

async fn process_upload(
    state: &AppState,
    text: &str,
    cancel: &CancellationToken,
) -> ApiResult<UploadResponse> {
    let records = parse_records(text)?;
    let batch = state.enricher.enrich(&records, cancel).await?;

    let batch_id = Uuid::new_v4();
    let departments = department_totals(&batch.employees);
    let record_count = batch.employees.len();

    tracing::info!(
        batch_id = %batch_id,
        records = record_count,
        departments = departments.len(),
        "Upload processed"
    );

    let published = state
        .publish_dashboard(
            cancel,
            DashboardState {
                batch_id,
                table: TableView::with_page_size(batch.employees, state.page_size),
                insights: batch.insights.clone(),
            },
        )
        .await;
    if !published {
        return Err(Error::Enrichment("upload superseded by a newer upload".to_string()).into());
    }

    Ok(UploadResponse {
        batch_id,
        record_count,
        departments,
        insights: batch.insights,
    })
}

fn table_response(dashboard: &DashboardState) -> TableResponse {
    TableResponse {
        batch_id: dashboard.batch_id,
        rows: dashboard.table.view().into_iter().cloned().collect(),
        page: dashboard.table.page(),
        total_pages: dashboard.table.total_pages(),
        page_size: dashboard.table.page_size(),
        sort: dashboard.table.sort(),
        direction: dashboard.table.direction(),
    }
}

/// GET /table
pub async fn get_table(State(state): State<AppState>) -> ApiResult<Json<TableResponse>> {
    let guard = state.dashboard.read().await;
    let dashboard = guard.as_ref().ok_or(ApiError::NoData)?;
    Ok(Json(table_response(dashboard)))
}

/// POST /table/sort
///
/// Repeated requests for the current sort field toggle the direction.
pub async fn set_table_sort(
    State(state): State<AppState>,
    Json(request): Json<SortRequest>,
) -> ApiResult<Json<TableResponse>> {
    let mut guard = state.dashboard.write().await;
    let dashboard = guard.as_mut().ok_or(ApiError::NoData)?;
    dashboard.table.set_sort(request.field);
    Ok(Json(table_response(dashboard)))
}

/// POST /table/page
///
/// The requested page is clamped into `[1, total_pages]`.
pub async fn set_table_page(
    State(state): State<AppState>,
    Json(request): Json<PageRequest>,
) -> ApiResult<Json<TableResponse>> {
    let mut guard = state.dashboard.write().await;
    let dashboard = guard.as_mut().ok_or(ApiError::NoData)?;
    dashboard.table.set_page(request.page);
    Ok(Json(table_response(dashboard)))
}

/// GET /departments
///
/// Aggregates are recomputed from the current record set on every request.
pub async fn get_departments(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<DepartmentAggregate>>> {
    let guard = state.dashboard.read().await;
    let dashboard = guard.as_ref().ok_or(ApiError::NoData)?;
    Ok(Json(department_totals(dashboard.table.records())))
}

/// GET /insights
pub async fn get_insights(State(state): State<AppState>) -> ApiResult<Json<AnalysisInsights>> {
    let guard = state.dashboard.read().await;
    let dashboard = guard.as_ref().ok_or(ApiError::NoData)?;
    Ok(Json(dashboard.insights.clone()))
}

/// Build dashboard routes
pub fn dashboard_routes() -> Router<AppState> {
    Router::new()
        .route("/upload", post(upload_csv))
        .route("/table", get(get_table))
        .route("/table/sort", post(set_table_sort))
        .route("/table/page", post(set_table_page))
        .route("/departments", get(get_departments))
        .route("/insights", get(get_insights))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_content_types_are_accepted_with_parameters() {
        assert!(is_csv_content_type("text/csv"));
        assert!(is_csv_content_type("text/csv; charset=utf-8"));
        assert!(is_csv_content_type("Application/CSV"));
    }

    #[test]
    fn non_csv_content_types_are_rejected() {
        assert!(!is_csv_content_type("application/json"));
        assert!(!is_csv_content_type("text/plain"));
        assert!(!is_csv_content_type(""));
    }
}
