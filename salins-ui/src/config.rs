//! Configuration resolution for salins-ui
//!
//! Collaborator endpoints are explicit configuration injected at
//! construction time, never read from ambient process state at call time.
//! Resolution priority: CLI flag → environment variable → TOML file →
//! compiled default. The CLI/env tiers are handled by clap; this module
//! owns the TOML tier and the defaults.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use tracing::info;

/// How the prediction collaborator is invoked
///
/// Batched is preferred: the request carries `employeeId` explicitly, so
/// responses match by key. Per-record correlates by request order, which is
/// fragile but kept as a supported alternative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum PredictionMode {
    Batched,
    PerRecord,
}

/// Service configuration, deserializable from a TOML file
#[derive(Debug, Clone, Deserialize)]
pub struct UiConfig {
    /// Port for the dashboard HTTP server
    #[serde(default = "default_port")]
    pub port: u16,
    /// Full endpoint URL of the prediction collaborator
    #[serde(default = "default_prediction_url")]
    pub prediction_url: String,
    /// Base URL of the analysis collaborator (client appends `/analyze`)
    #[serde(default = "default_analysis_url")]
    pub analysis_url: String,
    #[serde(default = "default_prediction_mode")]
    pub prediction_mode: PredictionMode,
    /// Per-request timeout for collaborator calls, in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Rows per table page
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

fn default_port() -> u16 {
    5731
}

fn default_prediction_url() -> String {
    "http://127.0.0.1:8000/predict".to_string()
}

fn default_analysis_url() -> String {
    "http://127.0.0.1:8000".to_string()
}

fn default_prediction_mode() -> PredictionMode {
    PredictionMode::Batched
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_page_size() -> usize {
    10
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            prediction_url: default_prediction_url(),
            analysis_url: default_analysis_url(),
            prediction_mode: default_prediction_mode(),
            request_timeout_secs: default_request_timeout_secs(),
            page_size: default_page_size(),
        }
    }
}

/// Values from the CLI/env tier; `None` means the flag was not given and
/// the TOML/default tiers stand
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub port: Option<u16>,
    pub prediction_url: Option<String>,
    pub analysis_url: Option<String>,
    pub prediction_mode: Option<PredictionMode>,
}

impl UiConfig {
    /// Load configuration from a TOML file, or compiled defaults if no file
    /// was given
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                let content = std::fs::read_to_string(path)
                    .with_context(|| format!("read config file {}", path.display()))?;
                let config: UiConfig = toml::from_str(&content)
                    .with_context(|| format!("parse config file {}", path.display()))?;
                info!("Configuration loaded from {}", path.display());
                Ok(config)
            }
            None => Ok(Self::default()),
        }
    }

    /// Apply the CLI/env tier on top of the TOML/default values
    pub fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(port) = overrides.port {
            self.port = port;
        }
        if let Some(url) = overrides.prediction_url {
            self.prediction_url = url;
        }
        if let Some(url) = overrides.analysis_url {
            self.analysis_url = url;
        }
        if let Some(mode) = overrides.prediction_mode {
            self.prediction_mode = mode;
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
