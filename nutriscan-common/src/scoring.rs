//! Health score computation
//!
//! Maps a [`NutrientReading`] to a bounded score in `[0, 100]`.
//!
//! # Scoring Algorithm
//! 1. Clamp each nutrient to `[0, cap]`
//! 2. Normalize to `[0, 1]` by dividing by the cap
//! 3. Weighted sum with fixed signed weights:
//!
//! | Nutrient      | Cap     | Weight |
//! |---------------|---------|--------|
//! | Sugar         | 30 g    | -0.25  |
//! | Saturated fat | 15 g    | -0.20  |
//! | Sodium        | 1000 mg | -0.20  |
//! | Calories      | 500 kcal| -0.15  |
//! | Fiber         | 10 g    | +0.10  |
//! | Protein       | 20 g    | +0.10  |
//!
//! 4. `score = (raw + 1) * 50`, clamped to `[0, 100]`
//!
//! Weight magnitudes sum to 1.0, so `raw` lies in `[-1, 1]` before mapping.
//!
//! # Example
//! ```
//! use nutriscan_common::{score, NutrientReading};
//!
//! let reading = NutrientReading::default().with_sugar(30.0).with_saturated_fat(15.0);
//! assert_eq!(score(&reading).value(), 27.5);
//! ```

use std::fmt;

use serde::Serialize;

use crate::reading::{Nutrient, NutrientReading};
use crate::tier::{classify, SafetyTier};

pub const SUGAR_CAP_G: f64 = 30.0;
pub const SATURATED_FAT_CAP_G: f64 = 15.0;
pub const SODIUM_CAP_MG: f64 = 1000.0;
pub const CALORIES_CAP_KCAL: f64 = 500.0;
pub const FIBER_CAP_G: f64 = 10.0;
pub const PROTEIN_CAP_G: f64 = 20.0;

impl Nutrient {
    /// Amount beyond which further quantity does not change the score
    pub fn cap(self) -> f64 {
        match self {
            Nutrient::Sugar => SUGAR_CAP_G,
            Nutrient::SaturatedFat => SATURATED_FAT_CAP_G,
            Nutrient::Sodium => SODIUM_CAP_MG,
            Nutrient::Calories => CALORIES_CAP_KCAL,
            Nutrient::Fiber => FIBER_CAP_G,
            Nutrient::Protein => PROTEIN_CAP_G,
        }
    }

    /// Signed weight (negative for harmful nutrients)
    pub fn weight(self) -> f64 {
        self.weight_hundredths() / 100.0
    }

    // Held in hundredths so readings at exact caps land on exact scores
    // (e.g. all-at-cap is 20.0, not 19.999999999999996).
    fn weight_hundredths(self) -> f64 {
        match self {
            Nutrient::Sugar => -25.0,
            Nutrient::SaturatedFat => -20.0,
            Nutrient::Sodium => -20.0,
            Nutrient::Calories => -15.0,
            Nutrient::Fiber => 10.0,
            Nutrient::Protein => 10.0,
        }
    }
}

/// Health score in the closed interval `[0, 100]`
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct ScoreResult(f64);

impl ScoreResult {
    pub const MIN: f64 = 0.0;
    pub const MAX: f64 = 100.0;

    fn new(value: f64) -> Self {
        if value.is_nan() {
            return Self(Self::MIN);
        }
        Self(value.clamp(Self::MIN, Self::MAX))
    }

    pub fn value(self) -> f64 {
        self.0
    }

    /// Score at two-decimal display precision
    pub fn rounded(self) -> f64 {
        (self.0 * 100.0).round() / 100.0
    }

    pub fn tier(self) -> SafetyTier {
        classify(self.0)
    }
}

impl fmt::Display for ScoreResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

/// Per-nutrient share of a score
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NutrientContribution {
    pub nutrient: &'static str,
    /// Unit of `amount` (g, mg, kcal)
    pub unit: &'static str,
    /// Signed weight applied to `normalized`
    pub weight: f64,
    /// Amount after clamping to `[0, cap]`
    pub amount: f64,
    /// `amount / cap`, in `[0, 1]`
    pub normalized: f64,
    /// `weight * normalized`
    pub weighted: f64,
}

/// Full derivation of a score, used for diagnostics
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub contributions: Vec<NutrientContribution>,
    /// Weighted sum, in `[-1, 1]`
    pub raw: f64,
    pub score: ScoreResult,
}

/// Compute the score together with its per-nutrient derivation
pub fn score_breakdown(reading: &NutrientReading) -> ScoreBreakdown {
    let mut raw_hundredths = 0.0;
    let mut contributions = Vec::with_capacity(Nutrient::ALL.len());

    for nutrient in Nutrient::ALL {
        let cap = nutrient.cap();
        // Clamped here as well as in NutrientReading; NaN.max(0.0) is 0.0
        let amount = reading.get(nutrient).max(0.0).min(cap);
        let normalized = amount / cap;
        let weighted_hundredths = nutrient.weight_hundredths() * normalized;
        raw_hundredths += weighted_hundredths;

        contributions.push(NutrientContribution {
            nutrient: nutrient.key(),
            unit: nutrient.unit(),
            weight: nutrient.weight(),
            amount,
            normalized,
            weighted: weighted_hundredths / 100.0,
        });
    }

    // (raw + 1) * 50 == (raw_hundredths + 100) / 2
    let score = ScoreResult::new((raw_hundredths + 100.0) / 2.0);

    ScoreBreakdown {
        contributions,
        raw: raw_hundredths / 100.0,
        score,
    }
}

/// Score a reading
///
/// Pure and deterministic: the same reading always yields the same value.
pub fn score(reading: &NutrientReading) -> ScoreResult {
    score_breakdown(reading).score
}
