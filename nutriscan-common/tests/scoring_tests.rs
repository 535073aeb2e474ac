//! Integration tests for score computation and tier classification
//!
//! Covers:
//! - Capping: amounts above a cap do not move the score
//! - Monotonicity in each nutrient, other nutrients fixed
//! - Bounds: every score lies in [0, 100]
//! - Reference readings and tier boundaries

use nutriscan_common::{classify, score, Nutrient, NutrientReading, SafetyTier};

const HARMFUL: [Nutrient; 4] = [
    Nutrient::Sugar,
    Nutrient::SaturatedFat,
    Nutrient::Sodium,
    Nutrient::Calories,
];
const BENEFICIAL: [Nutrient; 2] = [Nutrient::Fiber, Nutrient::Protein];

/// Amounts spanning zero, sub-cap, cap and far above cap for `nutrient`
fn sweep(nutrient: Nutrient) -> Vec<f64> {
    let cap = nutrient.cap();
    (0..=30).map(|step| cap * step as f64 / 10.0).collect()
}

fn mid_reading() -> NutrientReading {
    NutrientReading::new(8.0, 3.0, 300.0, 2.5, 6.0, 210.0)
}

#[test]
fn test_sugar_cap_holds() {
    let at_cap = score(&NutrientReading::default().with_sugar(30.0));
    let far_above = score(&NutrientReading::default().with_sugar(1000.0));

    assert_eq!(at_cap, far_above);
}

#[test]
fn test_every_cap_holds() {
    for nutrient in Nutrient::ALL {
        let base = mid_reading();
        let at_cap = score(&base.with(nutrient, nutrient.cap()));
        let above = score(&base.with(nutrient, nutrient.cap() * 7.5));

        assert_eq!(at_cap, above, "cap for {} should hold", nutrient);
    }
}

#[test]
fn test_harmful_nutrients_never_raise_score() {
    for nutrient in HARMFUL {
        let mut previous = f64::INFINITY;
        for amount in sweep(nutrient) {
            let value = score(&mid_reading().with(nutrient, amount)).value();
            assert!(
                value <= previous,
                "score rose from {} to {} when {} increased to {}",
                previous,
                value,
                nutrient,
                amount
            );
            previous = value;
        }
    }
}

#[test]
fn test_beneficial_nutrients_never_lower_score() {
    for nutrient in BENEFICIAL {
        let mut previous = f64::NEG_INFINITY;
        for amount in sweep(nutrient) {
            let value = score(&mid_reading().with(nutrient, amount)).value();
            assert!(
                value >= previous,
                "score fell from {} to {} when {} increased to {}",
                previous,
                value,
                nutrient,
                amount
            );
            previous = value;
        }
    }
}

#[test]
fn test_scores_stay_in_bounds() {
    let amounts = [0.0, 0.5, 7.0, 29.99, 30.0, 150.0, 1e6, 1e300];

    for &a in &amounts {
        for &b in &amounts {
            let reading = NutrientReading::new(a, b, a * 33.0, b, a, b * 17.0);
            let value = score(&reading).value();
            assert!((0.0..=100.0).contains(&value), "out of bounds: {}", value);
        }
    }
}

#[test]
fn test_negative_inputs_score_like_zero() {
    let negative = NutrientReading::new(-10.0, -1.0, -500.0, -3.0, -2.0, -90.0);
    assert_eq!(score(&negative).value(), 50.0);
}

#[test]
fn test_scoring_is_deterministic() {
    let reading = mid_reading();
    let first = score(&reading);

    for _ in 0..100 {
        assert_eq!(score(&reading), first);
    }
}

#[test]
fn test_reference_readings() {
    assert_eq!(score(&NutrientReading::default()).value(), 50.0);

    let all_at_cap = NutrientReading::new(30.0, 15.0, 1000.0, 10.0, 20.0, 500.0);
    assert_eq!(score(&all_at_cap).value(), 20.0);
    assert_eq!(classify(score(&all_at_cap).value()), SafetyTier::Harmful);

    let sugar_and_fat = NutrientReading::default()
        .with_sugar(30.0)
        .with_saturated_fat(15.0);
    let result = score(&sugar_and_fat);
    assert_eq!(result.value(), 27.5);
    assert_eq!(classify(result.value()), SafetyTier::Harmful);
}

#[test]
fn test_label_from_prompt_example() {
    // Total Sugars 15.1 g, Saturated Fat 0.0 g, Sodium 3.3 mg, Fiber -, Protein 0.0 g, 60.8 kcal
    let reading = NutrientReading::new(15.1, 0.0, 3.3, 0.0, 0.0, 60.8);
    let result = score(&reading);

    assert!((result.value() - 42.7633).abs() < 1e-3, "got {}", result);
    assert_eq!(result.tier(), SafetyTier::Safe);
}

#[test]
fn test_classification_boundaries() {
    assert_eq!(classify(20.0), SafetyTier::Harmful);
    assert_eq!(classify(19.999), SafetyTier::VeryHarmful);
    assert_eq!(classify(40.0), SafetyTier::Safe);
    assert_eq!(classify(39.999), SafetyTier::Harmful);
    assert_eq!(classify(0.0), SafetyTier::VeryHarmful);
    assert_eq!(classify(100.0), SafetyTier::Safe);
}

#[test]
fn test_weight_signs_and_units() {
    for nutrient in HARMFUL {
        assert!(nutrient.weight() < 0.0, "{} should lower the score", nutrient);
    }
    for nutrient in BENEFICIAL {
        assert!(nutrient.weight() > 0.0, "{} should raise the score", nutrient);
    }

    let magnitude: f64 = Nutrient::ALL.iter().map(|n| n.weight().abs()).sum();
    assert!((magnitude - 1.0).abs() < 1e-12);

    assert_eq!(Nutrient::Sodium.unit(), "mg");
    assert_eq!(Nutrient::Calories.unit(), "kcal");
    assert_eq!(Nutrient::Sugar.unit(), "g");
}
