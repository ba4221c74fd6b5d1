//! Measurement records: one benchmark's reported outcome
//!
//! A `MeasurementRecord` is the canonical, already-validated form of a single
//! JMH result entry. The comparison engine reads only the identity fields,
//! `score`, `score_error` and `measurement_iterations`; everything else is
//! carried through to the report untouched.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Opaque payload copied from input to output without inspection
///
/// Used for auxiliary data such as JMH secondary metrics (GC profiler output,
/// allocation rates) whose shape varies by profiler.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Passthrough(serde_json::Value);

impl Passthrough {
    pub fn new(value: serde_json::Value) -> Self {
        Self(value)
    }

    /// True when there is nothing worth displaying (null, `{}` or `[]`)
    pub fn is_empty(&self) -> bool {
        match &self.0 {
            serde_json::Value::Null => true,
            serde_json::Value::Object(map) => map.is_empty(),
            serde_json::Value::Array(items) => items.is_empty(),
            _ => false,
        }
    }

    /// Borrow the underlying JSON value (renderers only)
    pub fn as_json(&self) -> &serde_json::Value {
        &self.0
    }
}

/// One benchmark observation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementRecord {
    /// Fully qualified benchmark name
    pub benchmark: String,
    /// Execution mode tag (`thrpt`, `avgt`, `sample`, `ss`, ...)
    pub mode: String,
    pub threads: u32,
    pub forks: u32,
    pub warmup_iterations: u32,
    pub warmup_time: String,
    pub measurement_iterations: u32,
    pub measurement_time: String,
    /// Primary metric value; zero is legal
    pub score: f64,
    /// Reported error of `score`, always >= 0
    pub score_error: f64,
    pub score_unit: String,
    pub score_confidence: Option<[f64; 2]>,
    pub secondary_metrics: Passthrough,
    pub params: BTreeMap<String, String>,
    pub jvm: String,
    pub jvm_args: Vec<String>,
    pub jdk: String,
    pub vm_name: String,
    pub vm_version: String,
}

impl MeasurementRecord {
    /// Minimal record with the identity and score fields set; the rest default
    pub fn new(benchmark: impl Into<String>, mode: impl Into<String>, score: f64) -> Self {
        Self {
            benchmark: benchmark.into(),
            mode: mode.into(),
            threads: 1,
            forks: 1,
            warmup_iterations: 0,
            warmup_time: String::new(),
            measurement_iterations: 0,
            measurement_time: String::new(),
            score,
            score_error: 0.0,
            score_unit: String::new(),
            score_confidence: None,
            secondary_metrics: Passthrough::default(),
            params: BTreeMap::new(),
            jvm: String::new(),
            jvm_args: Vec::new(),
            jdk: String::new(),
            vm_name: String::new(),
            vm_version: String::new(),
        }
    }

    pub fn with_threads(mut self, threads: u32) -> Self {
        self.threads = threads;
        self
    }

    pub fn with_error(mut self, score_error: f64) -> Self {
        self.score_error = score_error;
        self
    }

    pub fn with_iterations(mut self, measurement_iterations: u32) -> Self {
        self.measurement_iterations = measurement_iterations;
        self
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.score_unit = unit.into();
        self
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }
}

/// Per-side passthrough copy attached to a comparison for display
///
/// Owned, not a reference: a comparison outlives the records it was built from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunDetails {
    pub jvm: String,
    pub jvm_args: Vec<String>,
    pub jdk: String,
    pub vm_name: String,
    pub vm_version: String,
    pub forks: u32,
    pub warmup_iterations: u32,
    pub warmup_time: String,
    pub measurement_iterations: u32,
    pub measurement_time: String,
    pub score_confidence: Option<[f64; 2]>,
    pub secondary_metrics: Passthrough,
    pub params: BTreeMap<String, String>,
}

impl From<&MeasurementRecord> for RunDetails {
    fn from(record: &MeasurementRecord) -> Self {
        Self {
            jvm: record.jvm.clone(),
            jvm_args: record.jvm_args.clone(),
            jdk: record.jdk.clone(),
            vm_name: record.vm_name.clone(),
            vm_version: record.vm_version.clone(),
            forks: record.forks,
            warmup_iterations: record.warmup_iterations,
            warmup_time: record.warmup_time.clone(),
            measurement_iterations: record.measurement_iterations,
            measurement_time: record.measurement_time.clone(),
            score_confidence: record.score_confidence,
            secondary_metrics: record.secondary_metrics.clone(),
            params: record.params.clone(),
        }
    }
}
