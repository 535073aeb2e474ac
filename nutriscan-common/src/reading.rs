//! Nutrient readings
//!
//! A [`NutrientReading`] is the structured input to scoring: six nutrient
//! amounts taken from a nutrition-facts label. Readings come from an untrusted
//! extractor, so every constructor enforces the same invariant: amounts are
//! finite and non-negative. Missing values contribute zero.
//!
//! # Wire names
//! The extractor and the HTTP response use the upstream field names:
//!
//! | Field            | Wire name  | Unit |
//! |------------------|------------|------|
//! | `sugar_g`        | `sugar`    | g    |
//! | `saturated_fat_g`| `sat_fat`  | g    |
//! | `sodium_mg`      | `sodium`   | mg   |
//! | `fiber_g`        | `fiber`    | g    |
//! | `protein_g`      | `protein`  | g    |
//! | `calories_kcal`  | `calories` | kcal |

use std::fmt;

use serde::Serialize;
use serde_json::Value;

use crate::{Error, Result};

/// One of the six nutrients the score is built from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Nutrient {
    Sugar,
    SaturatedFat,
    Sodium,
    Calories,
    Fiber,
    Protein,
}

impl Nutrient {
    /// All nutrients, in scoring order
    pub const ALL: [Nutrient; 6] = [
        Nutrient::Sugar,
        Nutrient::SaturatedFat,
        Nutrient::Sodium,
        Nutrient::Calories,
        Nutrient::Fiber,
        Nutrient::Protein,
    ];

    /// Key used by the extractor payload
    pub fn key(self) -> &'static str {
        match self {
            Nutrient::Sugar => "sugar",
            Nutrient::SaturatedFat => "sat_fat",
            Nutrient::Sodium => "sodium",
            Nutrient::Calories => "calories",
            Nutrient::Fiber => "fiber",
            Nutrient::Protein => "protein",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            Nutrient::Sodium => "mg",
            Nutrient::Calories => "kcal",
            _ => "g",
        }
    }
}

impl fmt::Display for Nutrient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Structured nutrient values for a single product
///
/// Fields are private so the non-negative invariant cannot be bypassed.
/// Build readings with [`NutrientReading::new`], the `with_*` setters, or
/// [`NutrientReading::from_json`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct NutrientReading {
    #[serde(rename = "sugar")]
    sugar_g: f64,
    #[serde(rename = "sat_fat")]
    saturated_fat_g: f64,
    #[serde(rename = "sodium")]
    sodium_mg: f64,
    #[serde(rename = "fiber")]
    fiber_g: f64,
    #[serde(rename = "protein")]
    protein_g: f64,
    #[serde(rename = "calories")]
    calories_kcal: f64,
}

impl NutrientReading {
    /// Create a reading, clamping negative or non-finite amounts to zero
    pub fn new(
        sugar_g: f64,
        saturated_fat_g: f64,
        sodium_mg: f64,
        fiber_g: f64,
        protein_g: f64,
        calories_kcal: f64,
    ) -> Self {
        Self {
            sugar_g: sanitize(sugar_g),
            saturated_fat_g: sanitize(saturated_fat_g),
            sodium_mg: sanitize(sodium_mg),
            fiber_g: sanitize(fiber_g),
            protein_g: sanitize(protein_g),
            calories_kcal: sanitize(calories_kcal),
        }
    }

    /// Coerce an extractor payload into a reading
    ///
    /// **Coercion rules:**
    /// - payload must be a JSON object
    /// - missing key or `null` => 0.0
    /// - number => that value (clamped to >= 0)
    /// - any other JSON type => [`Error::InvalidReading`]
    ///
    /// Unknown keys are ignored.
    pub fn from_json(value: &Value) -> Result<Self> {
        let object = value.as_object().ok_or_else(|| {
            Error::InvalidReading(format!(
                "expected a JSON object, found {}",
                json_type_name(value)
            ))
        })?;

        let mut reading = Self::default();
        for nutrient in Nutrient::ALL {
            let amount = match object.get(nutrient.key()) {
                None | Some(Value::Null) => 0.0,
                Some(Value::Number(number)) => number.as_f64().ok_or_else(|| {
                    Error::InvalidReading(format!(
                        "field `{}` is not representable as a number: {}",
                        nutrient.key(),
                        number
                    ))
                })?,
                Some(other) => {
                    return Err(Error::InvalidReading(format!(
                        "field `{}` must be a number, found {}",
                        nutrient.key(),
                        json_type_name(other)
                    )))
                }
            };
            reading.set(nutrient, amount);
        }

        Ok(reading)
    }

    /// Amount of `nutrient` in its native unit
    pub fn get(&self, nutrient: Nutrient) -> f64 {
        match nutrient {
            Nutrient::Sugar => self.sugar_g,
            Nutrient::SaturatedFat => self.saturated_fat_g,
            Nutrient::Sodium => self.sodium_mg,
            Nutrient::Calories => self.calories_kcal,
            Nutrient::Fiber => self.fiber_g,
            Nutrient::Protein => self.protein_g,
        }
    }

    fn set(&mut self, nutrient: Nutrient, amount: f64) {
        let amount = sanitize(amount);
        match nutrient {
            Nutrient::Sugar => self.sugar_g = amount,
            Nutrient::SaturatedFat => self.saturated_fat_g = amount,
            Nutrient::Sodium => self.sodium_mg = amount,
            Nutrient::Calories => self.calories_kcal = amount,
            Nutrient::Fiber => self.fiber_g = amount,
            Nutrient::Protein => self.protein_g = amount,
        }
    }

    /// Return a copy with `nutrient` set to `amount` (clamped)
    pub fn with(mut self, nutrient: Nutrient, amount: f64) -> Self {
        self.set(nutrient, amount);
        self
    }

    pub fn with_sugar(self, grams: f64) -> Self {
        self.with(Nutrient::Sugar, grams)
    }

    pub fn with_saturated_fat(self, grams: f64) -> Self {
        self.with(Nutrient::SaturatedFat, grams)
    }

    pub fn with_sodium(self, milligrams: f64) -> Self {
        self.with(Nutrient::Sodium, milligrams)
    }

    pub fn with_fiber(self, grams: f64) -> Self {
        self.with(Nutrient::Fiber, grams)
    }

    pub fn with_protein(self, grams: f64) -> Self {
        self.with(Nutrient::Protein, grams)
    }

    pub fn with_calories(self, kcal: f64) -> Self {
        self.with(Nutrient::Calories, kcal)
    }

    pub fn sugar_g(&self) -> f64 {
        self.sugar_g
    }

    pub fn saturated_fat_g(&self) -> f64 {
        self.saturated_fat_g
    }

    pub fn sodium_mg(&self) -> f64 {
        self.sodium_mg
    }

    pub fn fiber_g(&self) -> f64 {
        self.fiber_g
    }

    pub fn protein_g(&self) -> f64 {
        self.protein_g
    }

    pub fn calories_kcal(&self) -> f64 {
        self.calories_kcal
    }
}

/// Negative, NaN and infinite amounts collapse to zero
fn sanitize(amount: f64) -> f64 {
    if amount.is_finite() {
        amount.max(0.0)
    } else {
        0.0
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
