//! Safety tier classification
//!
//! # Thresholds
//! - score < 20: Very Harmful
//! - 20 <= score < 40: Harmful
//! - score >= 40: Safe
//!
//! Boundary values belong to the better tier.

use std::fmt;

use serde::Serialize;

/// Lower bound (inclusive) of the Harmful tier
pub const HARMFUL_THRESHOLD: f64 = 20.0;
/// Lower bound (inclusive) of the Safe tier
pub const SAFE_THRESHOLD: f64 = 40.0;

/// Discrete safety class, ordered from worst to best
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum SafetyTier {
    #[serde(rename = "Very Harmful")]
    VeryHarmful,
    #[serde(rename = "Harmful")]
    Harmful,
    #[serde(rename = "Safe")]
    Safe,
}

impl SafetyTier {
    /// Display label, as returned in the `class` response field
    pub fn label(self) -> &'static str {
        match self {
            SafetyTier::VeryHarmful => "Very Harmful",
            SafetyTier::Harmful => "Harmful",
            SafetyTier::Safe => "Safe",
        }
    }

    /// Lower-case label for use inside sentences
    pub fn phrase(self) -> &'static str {
        match self {
            SafetyTier::VeryHarmful => "very harmful",
            SafetyTier::Harmful => "harmful",
            SafetyTier::Safe => "safe",
        }
    }
}

impl fmt::Display for SafetyTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Classify a score into a tier
///
/// Total over `f64`: below 0 is Very Harmful, above 100 is Safe, and NaN is
/// treated as the worst tier.
pub fn classify(score: f64) -> SafetyTier {
    if score.is_nan() || score < HARMFUL_THRESHOLD {
        SafetyTier::VeryHarmful
    } else if score < SAFE_THRESHOLD {
        SafetyTier::Harmful
    } else {
        SafetyTier::Safe
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundaries_belong_to_better_tier() {
        assert_eq!(classify(19.999), SafetyTier::VeryHarmful);
        assert_eq!(classify(20.0), SafetyTier::Harmful);
        assert_eq!(classify(39.999), SafetyTier::Harmful);
        assert_eq!(classify(40.0), SafetyTier::Safe);
    }

    #[test]
    fn test_out_of_range_scores() {
        assert_eq!(classify(-3.0), SafetyTier::VeryHarmful);
        assert_eq!(classify(250.0), SafetyTier::Safe);
        assert_eq!(classify(f64::NAN), SafetyTier::VeryHarmful);
        assert_eq!(classify(f64::INFINITY), SafetyTier::Safe);
    }

    #[test]
    fn test_order_matches_nutritional_quality() {
        assert!(SafetyTier::VeryHarmful < SafetyTier::Harmful);
        assert!(SafetyTier::Harmful < SafetyTier::Safe);
    }

    #[test]
    fn test_serializes_as_label() {
        assert_eq!(
            serde_json::to_string(&SafetyTier::VeryHarmful).unwrap(),
            "\"Very Harmful\""
        );
        assert_eq!(SafetyTier::Harmful.to_string(), "Harmful");
        assert_eq!(SafetyTier::VeryHarmful.phrase(), "very harmful");
    }
}
