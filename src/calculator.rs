//! Live calculator state
//!
//! Holds the raw text of each input field and the active unit toggles, and
//! re-derives the result after every change. A change that leaves the inputs
//! unusable keeps the last result; only [`BmiCalculator::reset`] clears it.

use crate::classify::compute_and_classify;
use crate::types::{BmiResult, HeightUnit, WeightUnit};
use crate::units::{convert_height_to_meters, convert_weight_to_kilograms};

/// Placeholder shown while no result has been computed
pub const PROMPT: &str = "Enter your height and weight to calculate your BMI";

/// Stateful calculator mirroring a form with height, weight and unit toggles.
#[derive(Debug, Clone, Default)]
pub struct BmiCalculator {
    height_cm: String,
    feet: String,
    inches: String,
    weight: String,
    height_unit: HeightUnit,
    weight_unit: WeightUnit,
    result: Option<BmiResult>,
}

impl BmiCalculator {
    /// Create a calculator starting in centimeters and kilograms
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a calculator with specific starting units
    pub fn with_units(height_unit: HeightUnit, weight_unit: WeightUnit) -> Self {
        Self {
            height_unit,
            weight_unit,
            ..Self::default()
        }
    }

    /// Set the centimeter height field
    pub fn set_height(&mut self, value: impl Into<String>) -> Option<&BmiResult> {
        self.height_cm = value.into();
        self.recompute()
    }

    pub fn set_feet(&mut self, value: impl Into<String>) -> Option<&BmiResult> {
        self.feet = value.into();
        self.recompute()
    }

    pub fn set_inches(&mut self, value: impl Into<String>) -> Option<&BmiResult> {
        self.inches = value.into();
        self.recompute()
    }

    pub fn set_weight(&mut self, value: impl Into<String>) -> Option<&BmiResult> {
        self.weight = value.into();
        self.recompute()
    }

    /// Switch the height unit. The text of both height modes is kept.
    pub fn set_height_unit(&mut self, unit: HeightUnit) -> Option<&BmiResult> {
        self.height_unit = unit;
        self.recompute()
    }

    pub fn set_weight_unit(&mut self, unit: WeightUnit) -> Option<&BmiResult> {
        self.weight_unit = unit;
        self.recompute()
    }

    /// Re-derive the result from the current fields.
    ///
    /// Stores a new result when both height and weight convert; otherwise
    /// the stored result is left as it was.
    pub fn recompute(&mut self) -> Option<&BmiResult> {
        let height = self.height_meters();
        let weight = self.weight_kilograms();

        match (height, weight) {
            (Some(height), Some(weight)) => {
                if let Some(result) = compute_and_classify(height, weight) {
                    self.result = Some(result);
                }
            }
            (height, weight) => {
                log::debug!(
                    "inputs not computable (height present: {}, weight present: {}), keeping previous result",
                    height.is_some(),
                    weight.is_some()
                );
            }
        }

        self.result.as_ref()
    }

    /// Clear every text field and the stored result. Units are kept.
    pub fn reset(&mut self) {
        self.height_cm.clear();
        self.feet.clear();
        self.inches.clear();
        self.weight.clear();
        self.result = None;
    }

    /// Last computed result
    pub fn result(&self) -> Option<&BmiResult> {
        self.result.as_ref()
    }

    /// Placeholder text, present only while there is no result
    pub fn prompt(&self) -> Option<&'static str> {
        self.result.is_none().then_some(PROMPT)
    }

    pub fn height_unit(&self) -> HeightUnit {
        self.height_unit
    }

    pub fn weight_unit(&self) -> WeightUnit {
        self.weight_unit
    }

    /// Height in meters from whichever height fields the active unit reads
    pub fn height_meters(&self) -> Option<f64> {
        match self.height_unit {
            HeightUnit::Centimeters => {
                convert_height_to_meters(&self.height_cm, HeightUnit::Centimeters, None)
            }
            HeightUnit::FeetInches => convert_height_to_meters(
                &self.feet,
                HeightUnit::FeetInches,
                Some(self.inches.as_str()),
            ),
        }
    }

    pub fn weight_kilograms(&self) -> Option<f64> {
        convert_weight_to_kilograms(&self.weight, self.weight_unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Category;

    #[test]
    fn test_new_calculator_shows_prompt() {
        let calc = BmiCalculator::new();

        assert_eq!(calc.height_unit(), HeightUnit::Centimeters);
        assert_eq!(calc.weight_unit(), WeightUnit::Kilograms);
        assert!(calc.result().is_none());
        assert_eq!(calc.prompt(), Some(PROMPT));
    }

    #[test]
    fn test_result_appears_once_both_fields_are_set() {
        let mut calc = BmiCalculator::new();

        assert!(calc.set_height("170").is_none());
        let result = calc.set_weight("70").unwrap();

        assert_eq!(result.category, Category::NormalWeight);
        assert_eq!(calc.prompt(), None);
    }

    #[test]
    fn test_invalid_edit_keeps_previous_result() {
        let mut calc = BmiCalculator::new();
        calc.set_height("170");
        calc.set_weight("70");
        let before = calc.result().cloned().unwrap();

        // Clearing the field mid-edit leaves the card on screen
        assert_eq!(calc.set_weight(""), Some(&before));
        assert_eq!(calc.set_weight("-5"), Some(&before));

        let after = calc.set_weight("80").unwrap();
        assert_eq!(after.category, Category::Overweight);
    }

    #[test]
    fn test_unit_toggle_recomputes() {
        let mut calc = BmiCalculator::new();
        calc.set_height("178");
        calc.set_weight("250");
        assert_eq!(calc.result().unwrap().category, Category::Obese);

        calc.set_weight_unit(WeightUnit::Pounds);
        let result = calc.result().unwrap();
        assert!((result.bmi - 113.398 / (1.78 * 1.78)).abs() < 1e-9);
    }

    #[test]
    fn test_feet_mode_reads_feet_fields() {
        let mut calc = BmiCalculator::with_units(HeightUnit::FeetInches, WeightUnit::Pounds);
        calc.set_feet("5");
        calc.set_inches("10");
        let result = calc.set_weight("250").unwrap();

        assert!((result.bmi - 35.87).abs() < 0.01);
        assert_eq!(result.category, Category::Obese);

        // The cm field is empty, so switching keeps the previous result
        let kept = calc.set_height_unit(HeightUnit::Centimeters).cloned();
        assert_eq!(kept.map(|r| r.category), Some(Category::Obese));
        assert_eq!(calc.height_meters(), None);
    }

    #[test]
    fn test_reset_clears_fields_and_result() {
        let mut calc = BmiCalculator::with_units(HeightUnit::FeetInches, WeightUnit::Kilograms);
        calc.set_feet("6");
        calc.set_weight("80");
        assert!(calc.result().is_some());

        calc.reset();

        assert!(calc.result().is_none());
        assert_eq!(calc.prompt(), Some(PROMPT));
        assert_eq!(calc.height_meters(), None);
        assert_eq!(calc.weight_kilograms(), None);
        assert_eq!(calc.height_unit(), HeightUnit::FeetInches);
        assert!(calc.recompute().is_none());
    }
}
