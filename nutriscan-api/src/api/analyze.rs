//! Label analysis endpoints
//!
//! - `POST /analyze`: multipart upload with a `file` part (label photo)
//! - `POST /analyze/text`: `{"nutrition_text": "..."}`, skips OCR

use axum::{
    extract::{Multipart, State},
    routing::post,
    Json, Router,
};
use serde::Deserialize;
use tracing::{info, warn};

use crate::error::{ApiError, ApiResult};
use crate::services::{AnalysisError, LabelAnalysis};
use crate::AppState;

/// Multipart field carrying the image
const FILE_FIELD: &str = "file";

/// Request body for text analysis
#[derive(Debug, Deserialize)]
pub struct AnalyzeTextRequest {
    pub nutrition_text: String,
}

/// POST /analyze
pub async fn analyze_image(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Json<LabelAnalysis>> {
    let mut image = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Invalid multipart body: {}", e)))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(format!("Failed to read upload: {}", e)))?;
        image = Some(bytes);
        break;
    }

    let image = image.ok_or_else(|| {
        ApiError::BadRequest(format!("Missing multipart field `{}`", FILE_FIELD))
    })?;
    if image.is_empty() {
        return Err(ApiError::BadRequest("Uploaded file is empty".to_string()));
    }

    info!(bytes = image.len(), "Analyzing label image");

    let result = state.analyzer.analyze_image(&image).await;
    finish(&state, result, "image").await
}

/// POST /analyze/text
pub async fn analyze_text(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeTextRequest>,
) -> ApiResult<Json<LabelAnalysis>> {
    let text = request.nutrition_text.trim();
    if text.is_empty() {
        return Err(ApiError::BadRequest(
            "nutrition_text must not be empty".to_string(),
        ));
    }

    info!(chars = text.len(), "Analyzing label text");

    let result = state.analyzer.analyze_text(text).await;
    finish(&state, result, "text").await
}

/// Record failures for /health and map them to responses
async fn finish(
    state: &AppState,
    result: Result<LabelAnalysis, AnalysisError>,
    subject: &str,
) -> ApiResult<Json<LabelAnalysis>> {
    match result {
        Ok(analysis) => Ok(Json(analysis)),
        Err(e) => {
            warn!(error = %e, "Label analysis failed");
            *state.last_error.write().await = Some(e.to_string());
            Err(ApiError::from_analysis(e, subject))
        }
    }
}

/// Build analysis routes
pub fn analyze_routes() -> Router<AppState> {
    Router::new()
        .route("/analyze", post(analyze_image))
        .route("/analyze/text", post(analyze_text))
}
