//! Error types for the BMI engine
//!
//! Numeric input that cannot be used is never an error here; the engine
//! reports it as an absent result. These variants cover the boundary where
//! records and unit tags arrive as text.

use thiserror::Error;

/// Errors that can occur while reading measurement records
#[derive(Debug, Error)]
pub enum BmiError {
    #[error("Unknown height unit: {0} (expected \"cm\" or \"ft\")")]
    UnknownHeightUnit(String),

    #[error("Unknown weight unit: {0} (expected \"kg\" or \"lbs\")")]
    UnknownWeightUnit(String),

    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid measurement record: {0}")]
    InvalidRecord(String),
}
