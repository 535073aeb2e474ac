//! Advisory composition
//!
//! Produces the user-facing message and suggested alternative for a product.
//!
//! **Decision rules:**
//! - Safe: fixed advisory, the advice source is never consulted
//! - Otherwise: one attempt at the advice source, no retries
//!   - success: use the returned fields, substituting tier defaults for any
//!     that are missing or blank
//!   - failure: fixed fallback advisory, the error is logged and dropped
//!
//! Composition never fails outward.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::reading::NutrientReading;
use crate::tier::SafetyTier;

pub const SAFE_MESSAGE: &str = "Safe product";
pub const SAFE_BETTER_PRODUCT: &str = "This is a better product";
pub const DEFAULT_BETTER_PRODUCT: &str = "Consider a healthier alternative";
pub const FALLBACK_BETTER_PRODUCT: &str =
    "Consider a product with lower sugar, sodium, and saturated fat";

/// Message and suggested alternative shown to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Advisory {
    pub message: String,
    pub better_product: String,
}

impl Advisory {
    /// Fixed advisory for Safe products
    pub fn safe() -> Self {
        Self {
            message: SAFE_MESSAGE.to_string(),
            better_product: SAFE_BETTER_PRODUCT.to_string(),
        }
    }

    /// Deterministic advisory used when the advice source fails
    pub fn fallback(tier: SafetyTier) -> Self {
        Self {
            message: format!(
                "This product is {} due to high levels of harmful nutrients",
                tier.phrase()
            ),
            better_product: FALLBACK_BETTER_PRODUCT.to_string(),
        }
    }

    /// Complete a (possibly partial) draft with tier-specific defaults
    pub fn from_draft(tier: SafetyTier, draft: AdviceDraft) -> Self {
        let message = non_blank(draft.message).unwrap_or_else(|| {
            format!("This product is {} due to nutritional content", tier.phrase())
        });
        let better_product =
            non_blank(draft.better_product).unwrap_or_else(|| DEFAULT_BETTER_PRODUCT.to_string());

        Self {
            message,
            better_product,
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// Parsed reply of the advice source; either field may be absent
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AdviceDraft {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub better_product: Option<String>,
}

/// Advice source failure. Always absorbed into [`Advisory::fallback`].
#[derive(Debug, Error)]
pub enum AdviceError {
    #[error("Advice transport error: {0}")]
    Transport(String),

    #[error("Malformed advice: {0}")]
    Malformed(String),

    #[error("Advice unavailable: {0}")]
    Unavailable(String),
}

/// External capability that explains a tier and names a healthier alternative
#[async_trait]
pub trait AdviceSource: Send + Sync {
    async fn advise(
        &self,
        reading: &NutrientReading,
        tier: SafetyTier,
    ) -> Result<AdviceDraft, AdviceError>;
}

/// Compose an advisory using a synchronous advice function
pub fn compose<F>(tier: SafetyTier, reading: &NutrientReading, advice_fn: F) -> Advisory
where
    F: FnOnce(&NutrientReading, SafetyTier) -> Result<AdviceDraft, AdviceError>,
{
    if tier == SafetyTier::Safe {
        return Advisory::safe();
    }
    resolve(tier, advice_fn(reading, tier))
}

/// Compose an advisory using an asynchronous [`AdviceSource`]
pub async fn compose_with(
    tier: SafetyTier,
    reading: &NutrientReading,
    source: &dyn AdviceSource,
) -> Advisory {
    if tier == SafetyTier::Safe {
        return Advisory::safe();
    }
    resolve(tier, source.advise(reading, tier).await)
}

fn resolve(tier: SafetyTier, outcome: Result<AdviceDraft, AdviceError>) -> Advisory {
    match outcome {
        Ok(draft) => {
            debug!(
                tier = %tier,
                has_message = draft.message.is_some(),
                has_better_product = draft.better_product.is_some(),
                "Advice received"
            );
            Advisory::from_draft(tier, draft)
        }
        Err(e) => {
            warn!(tier = %tier, error = %e, "Advice unavailable, using fallback advisory");
            Advisory::fallback(tier)
        }
    }
}
