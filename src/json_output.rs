//! JSON output format for comparison reports
//!
//! Machine-readable counterpart of the HTML page. Comparison records are
//! emitted verbatim, including the tri-state significance (`null` when the
//! pair could not be tested). Non-finite numbers serialize as `null`.

use crate::comparison::ComparisonRecord;
use crate::filter::SortKey;
use crate::report::{ExperimentMetadata, Report};
use crate::summary::ComparisonSummary;
use serde::Serialize;

pub const JSON_FORMAT: &str = "jmh-compare-json-v1";

/// Root JSON output structure
#[derive(Debug, Clone, Serialize)]
pub struct JsonReport {
    /// Version of the tool that wrote the report
    pub version: String,
    /// Format name
    pub format: String,
    pub metadata: ExperimentMetadata,
    pub sort: SortKey,
    pub summary: ComparisonSummary,
    pub comparisons: Vec<ComparisonRecord>,
}

impl JsonReport {
    pub fn from_report(report: &Report) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            format: JSON_FORMAT.to_string(),
            metadata: report.metadata().clone(),
            sort: report.sort(),
            summary: report.summary().clone(),
            comparisons: report.comparisons().to_vec(),
        }
    }

    /// Serialize to pretty-printed JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
