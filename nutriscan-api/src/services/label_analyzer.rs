//! Label analysis pipeline
//!
//! image → OCR → extraction → score → classify → advisory
//!
//! One analysis per request; nothing is cached between requests.

use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

use nutriscan_common::{compose_with, score_breakdown, SafetyTier};

use crate::services::advisor::LlmAdvisor;
use crate::services::llm_client::ChatModel;
use crate::services::nutrient_extractor::{ExtractionError, NutrientExtractor};
use crate::services::ocr_client::{join_confident_text, OcrError, TextRecognizer};

/// Pipeline failures visible to the HTTP layer
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("No text could be extracted from the image")]
    NoText,

    #[error("OCR failed: {0}")]
    Ocr(#[from] OcrError),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),
}

/// Result of analyzing one label
#[derive(Debug, Clone, Serialize)]
pub struct LabelAnalysis {
    /// Tier label ("Very Harmful", "Harmful", "Safe")
    pub class: SafetyTier,
    pub message: String,
    pub better_product: String,
    /// Text the reading was extracted from
    pub extracted_text: String,
    /// Payload as returned by the extractor
    pub nutrition_data: Value,
    /// Score at two-decimal precision
    pub score: f64,
}

/// Orchestrates the collaborators around the scoring core
pub struct LabelAnalyzer {
    recognizer: Arc<dyn TextRecognizer>,
    extractor: NutrientExtractor,
    advisor: LlmAdvisor,
    min_confidence: f64,
}

impl LabelAnalyzer {
    pub fn new(
        recognizer: Arc<dyn TextRecognizer>,
        model: Arc<dyn ChatModel>,
        min_confidence: f64,
    ) -> Self {
        Self {
            recognizer,
            extractor: NutrientExtractor::new(model.clone()),
            advisor: LlmAdvisor::new(model),
            min_confidence,
        }
    }

    /// Analyze an uploaded label image
    pub async fn analyze_image(&self, image: &[u8]) -> Result<LabelAnalysis, AnalysisError> {
        let segments = self.recognizer.recognize(image).await?;
        let text = join_confident_text(&segments, self.min_confidence);

        debug!(
            segments = segments.len(),
            chars = text.len(),
            min_confidence = self.min_confidence,
            "Recognized label text"
        );

        if text.is_empty() {
            return Err(AnalysisError::NoText);
        }

        self.analyze_text(&text).await
    }

    /// Analyze label text that has already been recognized
    pub async fn analyze_text(&self, text: &str) -> Result<LabelAnalysis, AnalysisError> {
        let (reading, nutrition_data) = self.extractor.extract(text).await?;

        let breakdown = score_breakdown(&reading);
        let score = breakdown.score;
        let tier = score.tier();

        for c in &breakdown.contributions {
            debug!(
                nutrient = c.nutrient,
                amount = c.amount,
                unit = c.unit,
                weight = c.weight,
                normalized = c.normalized,
                weighted = c.weighted,
                "Score contribution"
            );
        }

        let advisory = compose_with(tier, &reading, &self.advisor).await;

        info!(score = %score, raw = breakdown.raw, tier = %tier, "Label analyzed");

        Ok(LabelAnalysis {
            class: tier,
            message: advisory.message,
            better_product: advisory.better_product,
            extracted_text: text.to_string(),
            nutrition_data,
            score: score.rounded(),
        })
    }
}
