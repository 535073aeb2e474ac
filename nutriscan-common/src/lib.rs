//! # NutriScan Common Library
//!
//! Deterministic core shared by the NutriScan services:
//! - Nutrient readings parsed from untrusted extractor output
//! - Health score computation (capped, weighted, bounded to 0-100)
//! - Safety tier classification
//! - Advisory composition with a deterministic fallback

pub mod advisory;
pub mod error;
pub mod reading;
pub mod scoring;
pub mod tier;

pub use advisory::{compose, compose_with, AdviceDraft, AdviceError, AdviceSource, Advisory};
pub use error::{Error, Result};
pub use reading::{Nutrient, NutrientReading};
pub use scoring::{score, score_breakdown, ScoreBreakdown, ScoreResult};
pub use tier::{classify, SafetyTier};
