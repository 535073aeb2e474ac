//! nutriscan-api library interface
//!
//! Exposes the router and services for the binary and for integration tests.

pub mod api;
pub mod config;
pub mod error;
pub mod services;
pub mod utils;

pub use crate::error::{ApiError, ApiResult};

use axum::extract::DefaultBodyLimit;
use axum::Router;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::services::LabelAnalyzer;

/// Default request body limit (image uploads)
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Label analysis pipeline
    pub analyzer: Arc<LabelAnalyzer>,
    /// Largest accepted request body, in bytes
    pub max_upload_bytes: usize,
    /// Whether a language model API key was resolved at startup
    pub llm_key_configured: bool,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
    /// Last pipeline error for diagnostic purposes
    pub last_error: Arc<RwLock<Option<String>>>,
}

impl AppState {
    /// Without an API key every extraction fails; `/health` reports that
    pub fn new(analyzer: LabelAnalyzer, llm_key_configured: bool) -> Self {
        Self {
            analyzer: Arc::new(analyzer),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            llm_key_configured,
            startup_time: Utc::now(),
            last_error: Arc::new(RwLock::new(None)),
        }
    }

    pub fn with_max_upload_bytes(mut self, max_upload_bytes: usize) -> Self {
        self.max_upload_bytes = max_upload_bytes;
        self
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    let body_limit = state.max_upload_bytes;

    Router::new()
        .merge(api::analyze_routes())
        .merge(api::health_routes())
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        // Browser frontend is served from a different origin
        .layer(CorsLayer::permissive())
        .with_state(state)
}
