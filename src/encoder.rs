//! Report encoding
//!
//! This module wraps engine results into report envelopes carrying producer
//! metadata and the computation time.

use crate::error::BmiError;
use crate::types::{BmiReport, BmiResult, ReportProducer};
use crate::{ENGINE_VERSION, PRODUCER_NAME};
use chrono::{SecondsFormat, Utc};
use uuid::Uuid;

/// Current report schema version
pub const REPORT_VERSION: &str = "1.0.0";

/// Encoder for report envelopes
pub struct ReportEncoder {
    instance_id: String,
}

impl Default for ReportEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportEncoder {
    /// Create a new encoder with a unique instance ID
    pub fn new() -> Self {
        Self {
            instance_id: Uuid::new_v4().to_string(),
        }
    }

    /// Create an encoder with a specific instance ID
    pub fn with_instance_id(instance_id: String) -> Self {
        Self { instance_id }
    }

    pub fn instance_id(&self) -> &str {
        &self.instance_id
    }

    /// Wrap a result (or its absence) into a report
    pub fn encode(&self, result: Option<BmiResult>, record_id: Option<String>) -> BmiReport {
        BmiReport {
            report_version: REPORT_VERSION.to_string(),
            producer: ReportProducer {
                name: PRODUCER_NAME.to_string(),
                version: ENGINE_VERSION.to_string(),
                instance_id: self.instance_id.clone(),
            },
            computed_at_utc: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            record_id,
            result,
        }
    }

    /// Encode to JSON string
    pub fn encode_to_json(
        &self,
        result: Option<BmiResult>,
        record_id: Option<String>,
    ) -> Result<String, BmiError> {
        let report = self.encode(result, record_id);
        Ok(serde_json::to_string(&report)?)
    }
}
