//! Common error types for NutriScan

use thiserror::Error;

/// Common result type for NutriScan core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors a caller can observe from the core.
///
/// Scoring and classification are total and never fail. Advice failures are
/// absorbed by [`crate::advisory::compose`], so the only outward error is a
/// reading that cannot be coerced into shape.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Extractor output could not be coerced into a nutrient reading
    #[error("Invalid reading: {0}")]
    InvalidReading(String),
}
