//! Pipeline orchestration
//!
//! This module provides the record-level API: raw measurement JSON goes in,
//! report JSON comes out.
//!
//! Stages per record:
//! 1. Parse the measurement record
//! 2. Convert height and weight to meters and kilograms
//! 3. Compute and classify
//! 4. Encode the report

use crate::classify::compute_and_classify;
use crate::encoder::ReportEncoder;
use crate::error::BmiError;
use crate::types::{BmiReport, BmiResult, HeightUnit, MeasurementRecord};
use crate::units::{convert_height_to_meters, convert_weight_to_kilograms};

impl MeasurementRecord {
    /// Height in meters, if usable
    pub fn height_meters(&self) -> Option<f64> {
        let inches = match self.height_unit {
            HeightUnit::FeetInches => self.inches.as_ref().map(|v| v.as_text()),
            HeightUnit::Centimeters => None,
        };
        convert_height_to_meters(&self.height.as_text(), self.height_unit, inches.as_deref())
    }

    /// Weight in kilograms, if usable
    pub fn weight_kilograms(&self) -> Option<f64> {
        convert_weight_to_kilograms(&self.weight.as_text(), self.weight_unit)
    }

    /// Run conversion and classification for this record
    pub fn evaluate(&self) -> Option<BmiResult> {
        let (height, weight) = (self.height_meters(), self.weight_kilograms());
        let (Some(height), Some(weight)) = (height, weight) else {
            log::debug!(
                "record {} not computable (height present: {}, weight present: {})",
                self.record_id.as_deref().unwrap_or("<unnamed>"),
                height.is_some(),
                weight.is_some()
            );
            return None;
        };
        compute_and_classify(height, weight)
    }
}

/// Convert one measurement record (JSON) into a report (JSON).
///
/// # Example
/// ```ignore
/// let report = measurement_to_report(
///     r#"{"height": "170", "height_unit": "cm", "weight": "70", "weight_unit": "kg"}"#
///         .to_string(),
/// )?;
/// ```
pub fn measurement_to_report(raw_json: String) -> Result<String, BmiError> {
    let processor = BmiProcessor::new();
    let report = processor.process_json(&raw_json)?;
    Ok(serde_json::to_string(&report)?)
}

/// Processor that shares one encoder across every record of a run.
pub struct BmiProcessor {
    encoder: ReportEncoder,
}

impl Default for BmiProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl BmiProcessor {
    /// Create a new processor with a fresh instance ID
    pub fn new() -> Self {
        Self {
            encoder: ReportEncoder::new(),
        }
    }

    /// Create a processor with a fixed instance ID
    pub fn with_instance_id(instance_id: String) -> Self {
        Self {
            encoder: ReportEncoder::with_instance_id(instance_id),
        }
    }

    pub fn instance_id(&self) -> &str {
        self.encoder.instance_id()
    }

    /// Evaluate a parsed record
    pub fn process_record(&self, record: &MeasurementRecord) -> BmiReport {
        let result = record.evaluate();
        self.encoder.encode(result, record.record_id.clone())
    }

    /// Evaluate a single JSON record
    pub fn process_json(&self, json: &str) -> Result<BmiReport, BmiError> {
        let record: MeasurementRecord = serde_json::from_str(json.trim())?;
        Ok(self.process_record(&record))
    }

    /// Evaluate newline-delimited JSON records. Blank lines are skipped.
    pub fn process_ndjson(&self, input: &str) -> Result<Vec<BmiReport>, BmiError> {
        input
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(index, line)| {
                self.process_json(line).map_err(|e| {
                    BmiError::InvalidRecord(format!("line {}: {}", index + 1, e))
                })
            })
            .collect()
    }

    /// Evaluate a JSON array of records
    pub fn process_array(&self, input: &str) -> Result<Vec<BmiReport>, BmiError> {
        let records: Vec<MeasurementRecord> = serde_json::from_str(input)?;
        Ok(records.iter().map(|r| self.process_record(r)).collect())
    }
}
