//! Health check endpoint
//!
//! `GET /health` reports `"degraded"` when the service is up but cannot
//! analyze labels (no language model API key was resolved at startup).
//! The most recent pipeline failure is included for diagnostics.

use axum::{extract::State, routing::get, Json, Router};
use chrono::Utc;
use serde::Serialize;

use crate::AppState;

/// Overall service condition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Ok,
    Degraded,
}

impl HealthStatus {
    fn assess(state: &AppState) -> Self {
        if state.llm_key_configured {
            HealthStatus::Ok
        } else {
            HealthStatus::Degraded
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub module: &'static str,
    pub version: &'static str,
    pub uptime_seconds: u64,
    /// Extraction requires a key; advice falls back without one
    pub llm_key_configured: bool,
    pub max_upload_bytes: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
}

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let uptime_seconds = Utc::now()
        .signed_duration_since(state.startup_time)
        .num_seconds()
        .max(0) as u64;

    Json(HealthResponse {
        status: HealthStatus::assess(&state),
        module: "nutriscan-api",
        version: env!("CARGO_PKG_VERSION"),
        uptime_seconds,
        llm_key_configured: state.llm_key_configured,
        max_upload_bytes: state.max_upload_bytes,
        last_error: state.last_error.read().await.clone(),
    })
}

pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
