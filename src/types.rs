//! Core types for the BMI engine
//!
//! Unit tags, classification bands, the computed result, and the raw
//! measurement record accepted by the pipeline.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::BmiError;

/// Unit the height was entered in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HeightUnit {
    /// Single value in centimeters
    #[default]
    #[serde(rename = "cm")]
    Centimeters,
    /// Feet, with an optional secondary inches value
    #[serde(rename = "ft")]
    FeetInches,
}

impl HeightUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            HeightUnit::Centimeters => "cm",
            HeightUnit::FeetInches => "ft",
        }
    }
}

impl FromStr for HeightUnit {
    type Err = BmiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cm" => Ok(HeightUnit::Centimeters),
            "ft" => Ok(HeightUnit::FeetInches),
            _ => Err(BmiError::UnknownHeightUnit(s.to_string())),
        }
    }
}

impl fmt::Display for HeightUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unit the weight was entered in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WeightUnit {
    #[default]
    #[serde(rename = "kg")]
    Kilograms,
    #[serde(rename = "lbs")]
    Pounds,
}

impl WeightUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            WeightUnit::Kilograms => "kg",
            WeightUnit::Pounds => "lbs",
        }
    }
}

impl FromStr for WeightUnit {
    type Err = BmiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "kg" => Ok(WeightUnit::Kilograms),
            "lbs" => Ok(WeightUnit::Pounds),
            _ => Err(BmiError::UnknownWeightUnit(s.to_string())),
        }
    }
}

impl fmt::Display for WeightUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// BMI classification band
///
/// Variants are declared in ascending threshold order, so the derived
/// `Ord` matches the order of the bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Underweight")]
    Underweight,
    #[serde(rename = "Normal Weight")]
    NormalWeight,
    #[serde(rename = "Overweight")]
    Overweight,
    #[serde(rename = "Obese")]
    Obese,
}

impl Category {
    /// All bands in ascending order
    pub const ALL: [Category; 4] = [
        Category::Underweight,
        Category::NormalWeight,
        Category::Overweight,
        Category::Obese,
    ];

    /// Display label
    pub fn label(&self) -> &'static str {
        match self {
            Category::Underweight => "Underweight",
            Category::NormalWeight => "Normal Weight",
            Category::Overweight => "Overweight",
            Category::Obese => "Obese",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Category::Underweight => "Below normal weight range",
            Category::NormalWeight => "Within healthy weight range",
            Category::Overweight => "Above normal weight range",
            Category::Obese => "Significantly above normal weight range",
        }
    }

    /// Advice shown alongside the band, in display order
    pub fn tips(&self) -> [&'static str; 3] {
        match self {
            Category::Underweight => [
                "Consult a healthcare provider about healthy weight gain",
                "Focus on nutrient-dense foods",
                "Consider strength training exercises",
            ],
            Category::NormalWeight => [
                "Maintain current lifestyle habits",
                "Continue regular physical activity",
                "Keep a balanced, nutritious diet",
            ],
            Category::Overweight => [
                "Consider gradual weight loss through diet and exercise",
                "Increase physical activity",
                "Focus on portion control",
            ],
            Category::Obese => [
                "Consult a healthcare provider for a personalized plan",
                "Consider professional nutritional guidance",
                "Start with low-impact exercises",
            ],
        }
    }

    /// Color band used by presentation layers
    pub fn color(&self) -> &'static str {
        match self {
            Category::Underweight => "blue",
            Category::NormalWeight => "green",
            Category::Overweight => "orange",
            Category::Obese => "red",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Computed index plus its classification record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BmiResult {
    /// Body Mass Index (kg/m²), full precision
    pub bmi: f64,
    /// Classification band (serialized as its display label)
    pub category: Category,
    pub description: String,
    pub tips: [String; 3],
}

impl BmiResult {
    /// Build the record for an already computed index and its band
    pub fn new(bmi: f64, category: Category) -> Self {
        Self {
            bmi,
            category,
            description: category.description().to_string(),
            tips: category.tips().map(str::to_string),
        }
    }

    /// Index rounded to one decimal place for display
    pub fn display_bmi(&self) -> String {
        format!("{:.1}", self.bmi)
    }
}

/// A numeric field as it arrives in a record: either a JSON number or text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Number(f64),
    Text(String),
}

impl RawValue {
    /// Text form handed to the unit converters
    pub fn as_text(&self) -> String {
        match self {
            RawValue::Number(n) => n.to_string(),
            RawValue::Text(s) => s.clone(),
        }
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        RawValue::Text(s.to_string())
    }
}

impl From<f64> for RawValue {
    fn from(n: f64) -> Self {
        RawValue::Number(n)
    }
}

/// Raw measurement record, as read by the pipeline and CLI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementRecord {
    /// Caller supplied identifier echoed into the report
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record_id: Option<String>,
    /// Height in centimeters, or feet when `height_unit` is `ft`
    pub height: RawValue,
    #[serde(default)]
    pub height_unit: HeightUnit,
    /// Inches, only read when `height_unit` is `ft`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inches: Option<RawValue>,
    pub weight: RawValue,
    #[serde(default)]
    pub weight_unit: WeightUnit,
}

/// Report producer metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportProducer {
    pub name: String,
    pub version: String,
    pub instance_id: String,
}

/// Report envelope emitted by the pipeline, CLI and FFI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BmiReport {
    pub report_version: String,
    pub producer: ReportProducer,
    pub computed_at_utc: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record_id: Option<String>,
    /// `None` when the inputs were not computable
    pub result: Option<BmiResult>,
}
