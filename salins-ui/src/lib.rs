//! salins-ui library interface
//!
//! Exposes the application state and router for integration testing.

pub mod api;
pub mod config;
pub mod error;
pub mod services;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use chrono::{DateTime, Utc};
use salins_common::table::TableView;
use salins_common::AnalysisInsights;
use services::Enricher;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

/// One upload's dashboard snapshot
///
/// Created whole by a successful upload and replaced whole by the next one;
/// nothing survives across cycles.
pub struct DashboardState {
    pub batch_id: Uuid,
    pub table: TableView,
    pub insights: AnalysisInsights,
}

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Current dashboard snapshot, `None` until a successful upload
    pub dashboard: Arc<RwLock<Option<DashboardState>>>,
    /// Enrichment orchestrator with injected collaborator endpoints
    pub enricher: Arc<Enricher>,
    /// Cancellation token of the upload currently in flight
    pub active_upload: Arc<RwLock<Option<CancellationToken>>>,
    /// Rows per table page
    pub page_size: usize,
    /// Service startup timestamp for uptime reporting
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(enricher: Enricher, page_size: usize) -> Self {
        Self {
            dashboard: Arc::new(RwLock::new(None)),
            enricher: Arc::new(enricher),
            active_upload: Arc::new(RwLock::new(None)),
            page_size: page_size.max(1),
            startup_time: Utc::now(),
        }
    }

    /// Replace the dashboard snapshot, unless this upload cycle has been
    /// superseded by a newer one
    ///
    /// The supersession check and the write happen under the same lock, so
    /// a cancelled cycle can never clobber its successor's snapshot: the
    /// successor cancels this cycle's token before it publishes, and any
    /// write that passes the check here happened before that cancellation.
    /// Returns whether the snapshot was published.
    pub async fn publish_dashboard(
        &self,
        cancel: &CancellationToken,
        dashboard: DashboardState,
    ) -> bool {
        let mut guard = self.dashboard.write().await;
        if cancel.is_cancelled() {
            return false;
        }
        *guard = Some(dashboard);
        true
    }

    /// Clear the snapshot after a failed upload, unless a newer cycle owns
    /// the dashboard now
    pub async fn clear_dashboard(&self, cancel: &CancellationToken) {
        let mut guard = self.dashboard.write().await;
        if !cancel.is_cancelled() {
            *guard = None;
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::health_routes())
        .merge(api::dashboard_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
