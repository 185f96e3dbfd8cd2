//! BMI computation and classification
//!
//! Bands are half-open intervals scanned in ascending order:
//! `[0, 18.5)`, `[18.5, 25)`, `[25, 30)`, `[30, ∞)`.

use crate::types::{BmiResult, Category};

/// Exclusive upper bound of each band, in ascending order.
/// The last band has no upper bound.
const BANDS: [(f64, Category); 4] = [
    (18.5, Category::Underweight),
    (25.0, Category::NormalWeight),
    (30.0, Category::Overweight),
    (f64::INFINITY, Category::Obese),
];

/// Classify an already computed index. First band whose bound exceeds the
/// index wins.
pub fn classify(bmi: f64) -> Category {
    BANDS
        .iter()
        .find(|(upper, _)| bmi < *upper)
        .map(|(_, category)| *category)
        .unwrap_or(Category::Obese)
}

/// Lower bound (inclusive) and upper bound (exclusive) of a band
pub fn band_bounds(category: Category) -> (f64, f64) {
    let index = BANDS
        .iter()
        .position(|(_, c)| *c == category)
        .unwrap_or(BANDS.len() - 1);
    let lower = if index == 0 { 0.0 } else { BANDS[index - 1].0 };
    (lower, BANDS[index].0)
}

/// Compute the index from meters and kilograms and attach its classification.
///
/// Returns `None` unless both inputs are finite and strictly positive. Also
/// `None` when the index itself is not finite, which happens for finite
/// inputs when `weight_kg / height_m²` overflows, e.g. heights below about
/// 1e-153 m.
pub fn compute_and_classify(height_m: f64, weight_kg: f64) -> Option<BmiResult> {
    if !(height_m.is_finite() && height_m > 0.0 && weight_kg.is_finite() && weight_kg > 0.0) {
        return None;
    }

    let bmi = weight_kg / (height_m * height_m);
    if !bmi.is_finite() {
        return None;
    }

    log::trace!("computed bmi {bmi} from {height_m} m, {weight_kg} kg");
    Some(BmiResult::new(bmi, classify(bmi)))
}
