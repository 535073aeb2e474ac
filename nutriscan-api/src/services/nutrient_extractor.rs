//! Nutrient extraction from label text
//!
//! Asks the language model to turn free OCR text into a strict JSON object,
//! then coerces that object into a [`NutrientReading`].

use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

use nutriscan_common::NutrientReading;

use crate::services::llm_client::{ChatModel, LlmError};
use crate::utils::parse_json_payload;

/// System prompt for structuring raw label text
pub const EXTRACTION_PROMPT: &str = r#"You will receive raw nutrition-label text (e.g. "Total Sugars: 15.1 g; Saturated Fat: 0.0 g; Sodium: 3.3 mg; Fiber: —; Protein: 0.0 g; Energy: 60.8 kcal").

Extract and return the following fields in **strict JSON format** (no explanations, no extra text):

- sugar    : float (grams of sugar)
- sat_fat  : float (grams of saturated fat)
- sodium   : int   (milligrams of sodium)
- fiber    : float (grams of dietary fiber; use 0.0 if missing or marked as —)
- protein  : float (grams of protein)
- calories : float (kcal)

Return the result exactly like this:

{
  "sugar": 12.0,
  "sat_fat": 4.5,
  "sodium": 250,
  "fiber": 3.0,
  "protein": 7.0,
  "calories": 180.0
}"#;

/// Extraction errors
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Language model request failed: {0}")]
    Model(#[from] LlmError),

    #[error("Invalid JSON: {0}")]
    InvalidJson(String),

    #[error(transparent)]
    InvalidReading(#[from] nutriscan_common::Error),
}

/// Nutrient extractor backed by a [`ChatModel`]
pub struct NutrientExtractor {
    model: Arc<dyn ChatModel>,
}

impl NutrientExtractor {
    pub fn new(model: Arc<dyn ChatModel>) -> Self {
        Self { model }
    }

    /// Extract a reading from label text
    ///
    /// Returns the coerced reading together with the parsed payload as the
    /// model produced it.
    pub async fn extract(&self, label_text: &str) -> Result<(NutrientReading, Value), ExtractionError> {
        let reply = self.model.complete(EXTRACTION_PROMPT, label_text).await?;

        let payload =
            parse_json_payload(&reply).map_err(|e| ExtractionError::InvalidJson(e.to_string()))?;
        let reading = NutrientReading::from_json(&payload)?;

        tracing::debug!(
            sugar = reading.sugar_g(),
            sat_fat = reading.saturated_fat_g(),
            sodium = reading.sodium_mg(),
            fiber = reading.fiber_g(),
            protein = reading.protein_g(),
            calories = reading.calories_kcal(),
            "Nutrients extracted"
        );

        Ok((reading, payload))
    }
}
