//! Language-model advice source
//!
//! Asks the model to explain a tier and to name one specific healthier
//! alternative. The reply is parsed into an [`AdviceDraft`]; any transport or
//! parse failure is reported as an [`AdviceError`] and the composer falls back.

use async_trait::async_trait;
use std::sync::Arc;

use nutriscan_common::{AdviceDraft, AdviceError, AdviceSource, NutrientReading, SafetyTier};

use crate::services::llm_client::{ChatModel, LlmError};
use crate::utils::parse_json_payload;

/// Nutrition-coach advisor backed by a [`ChatModel`]
pub struct LlmAdvisor {
    model: Arc<dyn ChatModel>,
}

impl LlmAdvisor {
    pub fn new(model: Arc<dyn ChatModel>) -> Self {
        Self { model }
    }
}

/// System prompt for a reading classified as `tier`
pub fn advice_prompt(tier: SafetyTier) -> String {
    format!(
        "You are a nutrition coach. You will be given the nutrition data of a product \
         classified as {label}.\n\n\
         Respond with a JSON object containing:\n\
         - \"message\": A brief 1-2 sentence explanation of why this product is {phrase}\n\
         - \"better_product\": Name of a specific healthier alternative product\n\n\
         Only return the JSON, no extra text.",
        label = tier.label(),
        phrase = tier.phrase(),
    )
}

/// User message carrying the reading and its classification
fn advice_request(reading: &NutrientReading, tier: SafetyTier) -> Result<String, AdviceError> {
    let data = serde_json::to_string(reading).map_err(|e| AdviceError::Malformed(e.to_string()))?;
    Ok(format!(
        "Nutrition data: {}\nClassification: {}",
        data,
        tier.label()
    ))
}

/// Parse a model reply into a draft
///
/// The payload must be a JSON object; `message` and `better_product` must be
/// strings when present.
pub fn parse_advice(reply: &str) -> Result<AdviceDraft, AdviceError> {
    let payload = parse_json_payload(reply).map_err(|e| AdviceError::Malformed(e.to_string()))?;

    if !payload.is_object() {
        return Err(AdviceError::Malformed(format!(
            "expected a JSON object, got: {}",
            payload
        )));
    }

    serde_json::from_value(payload).map_err(|e| AdviceError::Malformed(e.to_string()))
}

#[async_trait]
impl AdviceSource for LlmAdvisor {
    async fn advise(
        &self,
        reading: &NutrientReading,
        tier: SafetyTier,
    ) -> Result<AdviceDraft, AdviceError> {
        let request = advice_request(reading, tier)?;

        let reply = self
            .model
            .complete(&advice_prompt(tier), &request)
            .await
            .map_err(|e| match e {
                missing @ LlmError::MissingApiKey => AdviceError::Unavailable(missing.to_string()),
                other => AdviceError::Transport(other.to_string()),
            })?;

        parse_advice(&reply)
    }
}
