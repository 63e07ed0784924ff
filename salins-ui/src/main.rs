//! salins-ui - Salary Insights dashboard service
//!
//! Ingests employee compensation CSVs, enriches them through the prediction
//! and analysis collaborators, and serves table and chart data over HTTP.

use anyhow::Result;
use clap::Parser;
use salins_ui::config::{ConfigOverrides, PredictionMode, UiConfig};
use salins_ui::services::Enricher;
use salins_ui::{build_router, AppState};
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "salins-ui", about = "Salary Insights dashboard service")]
struct Args {
    /// Path to a TOML configuration file
    #[arg(long, env = "SALINS_CONFIG")]
    config: Option<PathBuf>,

    /// HTTP port (overrides config file)
    #[arg(long, env = "SALINS_PORT")]
    port: Option<u16>,

    /// Prediction collaborator endpoint URL (overrides config file)
    #[arg(long, env = "SALINS_PREDICTION_URL")]
    prediction_url: Option<String>,

    /// Analysis collaborator base URL (overrides config file)
    #[arg(long, env = "SALINS_ANALYSIS_URL")]
    analysis_url: Option<String>,

    /// Prediction request shape (overrides config file)
    #[arg(long, env = "SALINS_PREDICTION_MODE", value_enum)]
    prediction_mode: Option<PredictionMode>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!(
        "Starting Salary Insights dashboard (salins-ui) v{}",
        env!("CARGO_PKG_VERSION")
    );

    let args = Args::parse();
    let mut config = UiConfig::load(args.config.as_deref())?;
    config.apply_overrides(ConfigOverrides {
        port: args.port,
        prediction_url: args.prediction_url,
        analysis_url: args.analysis_url,
        prediction_mode: args.prediction_mode,
    });

    info!(
        prediction_url = %config.prediction_url,
        analysis_url = %config.analysis_url,
        mode = ?config.prediction_mode,
        "Collaborator endpoints configured"
    );

    let enricher = Enricher::new(&config)?;
    let state = AppState::new(enricher, config.page_size);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(("127.0.0.1", config.port)).await?;
    info!("salins-ui listening on http://127.0.0.1:{}", config.port);
    info!("Health check: http://127.0.0.1:{}/health", config.port);

    axum::serve(listener, app).await?;

    Ok(())
}
