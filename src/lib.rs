//! BMI Engine - On-device Body Mass Index computation and classification
//!
//! The engine turns raw height and weight entries into a BMI value and one of
//! four classification bands through a deterministic sequence: unit conversion
//! → computation → classification → report encoding.
//!
//! Unusable numeric input (empty, zero, negative, non-numeric) is never an
//! error: it yields an absent result.
//!
//! ## Modules
//!
//! - **Engine**: [`units`] and [`classify`], pure functions
//! - **Calculator**: live form state that recomputes on every change
//! - **Pipeline**: JSON / NDJSON measurement records into reports

pub mod calculator;
pub mod classify;
pub mod encoder;
pub mod error;
pub mod pipeline;
pub mod types;
pub mod units;

// FFI bindings for C interop (always available for cdylib/staticlib builds)
pub mod ffi;

pub use calculator::BmiCalculator;
pub use classify::{classify, compute_and_classify};
pub use error::BmiError;
pub use pipeline::{measurement_to_report, BmiProcessor};
pub use types::{BmiReport, BmiResult, Category, HeightUnit, MeasurementRecord, WeightUnit};
pub use units::{convert_height_to_meters, convert_weight_to_kilograms};

/// Engine version embedded in all reports
pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name for reports
pub const PRODUCER_NAME: &str = "bmi-engine";
