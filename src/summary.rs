//! Suite-level summary of a comparison run
//!
//! Counts by status and significance, plus mean/median of improvement and
//! speedup over all comparisons and over regressions alone. Mean uses
//! `trueno::Vector`; median uses `aprender::stats::DescriptiveStats`.

use crate::comparison::{ComparisonRecord, SignificanceOutcome, Status};
use aprender::stats::DescriptiveStats;
use serde::Serialize;
use trueno::Vector;

/// Mean and median of one metric
///
/// Computed in `f32`; values carry the shortest decimal that identifies the
/// `f32` result, so a speedup of exactly 1.2 reads back as 1.2.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CentralTendency {
    pub mean: f64,
    pub median: f64,
}

impl CentralTendency {
    /// Summarize `values`, or return `empty` for both when there are none
    pub fn of(values: &[f64], empty: f64) -> Self {
        if values.is_empty() {
            return Self {
                mean: empty,
                median: empty,
            };
        }

        let samples: Vec<f32> = values.iter().map(|&v| v as f32).collect();
        let v = Vector::from_slice(&samples);

        let mean = v.mean().map(widen).unwrap_or(empty);
        let median = DescriptiveStats::new(&v)
            .quantile(0.5)
            .map(widen)
            .unwrap_or(empty);

        Self { mean, median }
    }
}

/// `f32` to `f64` through its shortest decimal form, dropping the binary
/// noise a plain widening cast exposes (1.2f32 -> 1.2, not 1.2000000476837158)
fn widen(value: f32) -> f64 {
    value
        .to_string()
        .parse()
        .unwrap_or_else(|_| f64::from(value))
}

/// Aggregate view of a set of comparisons
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonSummary {
    pub total: usize,
    pub improved: usize,
    pub regressed: usize,
    pub unchanged: usize,
    pub baseline_zero: usize,
    pub significant: usize,
    pub not_significant: usize,
    pub insufficient_data: usize,
    pub improvement_percent: CentralTendency,
    pub speedup: CentralTendency,
    /// Over regressed comparisons only
    pub regression_improvement_percent: CentralTendency,
    pub regression_speedup: CentralTendency,
    significant_regressions: usize,
    indeterminate_regressions: usize,
}

impl ComparisonSummary {
    pub fn from_comparisons(comparisons: &[ComparisonRecord]) -> Self {
        let count = |status: Status| comparisons.iter().filter(|c| c.status == status).count();

        let mut significant = 0;
        let mut not_significant = 0;
        let mut insufficient_data = 0;
        for c in comparisons {
            match c.statistical_significance.outcome() {
                SignificanceOutcome::Significant => significant += 1,
                SignificanceOutcome::NotSignificant => not_significant += 1,
                SignificanceOutcome::Indeterminate => insufficient_data += 1,
            }
        }

        let improvements: Vec<f64> = comparisons.iter().map(|c| c.improvement_percent).collect();
        let speedups: Vec<f64> = comparisons.iter().map(|c| c.speedup).collect();

        let regressions: Vec<&ComparisonRecord> = comparisons
            .iter()
            .filter(|c| c.status == Status::Regressed)
            .collect();
        let regression_improvements: Vec<f64> =
            regressions.iter().map(|c| c.improvement_percent).collect();
        let regression_speedups: Vec<f64> = regressions.iter().map(|c| c.speedup).collect();

        Self {
            total: comparisons.len(),
            improved: count(Status::Improved),
            regressed: regressions.len(),
            unchanged: count(Status::Unchanged),
            baseline_zero: count(Status::BaselineZero),
            significant,
            not_significant,
            insufficient_data,
            improvement_percent: CentralTendency::of(&improvements, 0.0),
            speedup: CentralTendency::of(&speedups, 1.0),
            regression_improvement_percent: CentralTendency::of(&regression_improvements, 0.0),
            regression_speedup: CentralTendency::of(&regression_speedups, 1.0),
            significant_regressions: comparisons
                .iter()
                .filter(|c| c.is_significant_regression())
                .count(),
            indeterminate_regressions: regressions
                .iter()
                .filter(|c| c.statistical_significance.outcome() == SignificanceOutcome::Indeterminate)
                .count(),
        }
    }

    /// Regressed and statistically significant
    pub fn significant_regressions(&self) -> usize {
        self.significant_regressions
    }

    /// Regressed, but too few iterations on either side to test
    pub fn indeterminate_regressions(&self) -> usize {
        self.indeterminate_regressions
    }
}
