// Significance classification for a baseline/treatment pair
//
// Approximate two-sample t-test on JMH summary statistics: the reported score
// error of each side stands in for its standard error, and the pooled error is
// their root-sum-square. The t-statistic is checked against two fixed critical
// values calibrated for ~30 degrees of freedom (two-tailed).
//
// Output is tri-state. A side with fewer than two measurement iterations has
// no variance estimate, so the result is Indeterminate, never "not significant".

use crate::record::MeasurementRecord;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Two-tailed critical t for p < 0.05 at df = 30
pub const T_CRITICAL_05: f64 = 2.042;

/// Two-tailed critical t for p < 0.01 at df = 30
pub const T_CRITICAL_01: f64 = 2.750;

/// Cap on the diagnostic degrees-of-freedom estimate
pub const MAX_DEGREES_OF_FREEDOM: u32 = 30;

/// Minimum measurement iterations per side for a variance estimate
pub const MIN_ITERATIONS: u32 = 2;

/// Significance tier, serialized as its display label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConfidenceLevel {
    #[serde(rename = "p < 0.01")]
    P01,
    #[serde(rename = "p < 0.05")]
    P05,
    #[serde(rename = "p ≥ 0.05")]
    NotSignificant,
    /// Zero pooled error or zero baseline: no basis for a test
    #[serde(rename = "N/A")]
    NotApplicable,
    /// Too few iterations to estimate variance
    #[serde(rename = "?")]
    Indeterminate,
}

impl ConfidenceLevel {
    pub fn label(&self) -> &'static str {
        match self {
            ConfidenceLevel::P01 => "p < 0.01",
            ConfidenceLevel::P05 => "p < 0.05",
            ConfidenceLevel::NotSignificant => "p ≥ 0.05",
            ConfidenceLevel::NotApplicable => "N/A",
            ConfidenceLevel::Indeterminate => "?",
        }
    }
}

impl fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Three-way view of a significance result for exhaustive matching
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignificanceOutcome {
    Significant,
    NotSignificant,
    Indeterminate,
}

/// Result of classifying one baseline/treatment pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignificanceResult {
    /// `None` when the pair cannot be tested (serializes as `null`)
    pub is_significant: Option<bool>,
    pub confidence_level: ConfidenceLevel,
    pub t_statistic: Option<f64>,
    /// Diagnostic only; the critical values above are used regardless
    pub degrees_of_freedom: Option<u32>,
    pub insufficient_data: bool,
}

impl SignificanceResult {
    /// Indeterminate: at least one side ran fewer than `MIN_ITERATIONS`
    pub fn insufficient_data() -> Self {
        Self {
            is_significant: None,
            confidence_level: ConfidenceLevel::Indeterminate,
            t_statistic: None,
            degrees_of_freedom: None,
            insufficient_data: true,
        }
    }

    /// Conservative "not significant" for pairs with no variance basis
    pub fn not_applicable(degrees_of_freedom: Option<u32>) -> Self {
        Self {
            is_significant: Some(false),
            confidence_level: ConfidenceLevel::NotApplicable,
            t_statistic: Some(0.0),
            degrees_of_freedom,
            insufficient_data: false,
        }
    }

    pub fn outcome(&self) -> SignificanceOutcome {
        match self.is_significant {
            Some(true) => SignificanceOutcome::Significant,
            Some(false) => SignificanceOutcome::NotSignificant,
            None => SignificanceOutcome::Indeterminate,
        }
    }
}

/// Degrees of freedom estimate: `min(n_b + n_t - 2, 30)`
pub fn degrees_of_freedom(baseline_iterations: u32, treatment_iterations: u32) -> u32 {
    baseline_iterations
        .saturating_add(treatment_iterations)
        .saturating_sub(2)
        .min(MAX_DEGREES_OF_FREEDOM)
}

/// Classify whether the score difference between two records is credible
///
/// # Example
/// ```
/// use jmh_compare::comparison::{classify, ConfidenceLevel};
/// use jmh_compare::record::MeasurementRecord;
///
/// let baseline = MeasurementRecord::new("X", "thrpt", 100.0).with_error(5.0).with_iterations(10);
/// let treatment = MeasurementRecord::new("X", "thrpt", 120.0).with_error(5.0).with_iterations(10);
///
/// let result = classify(&baseline, &treatment);
/// assert_eq!(result.is_significant, Some(true));
/// assert_eq!(result.confidence_level, ConfidenceLevel::P01);
/// ```
pub fn classify(baseline: &MeasurementRecord, treatment: &MeasurementRecord) -> SignificanceResult {
    if baseline.measurement_iterations < MIN_ITERATIONS
        || treatment.measurement_iterations < MIN_ITERATIONS
    {
        return SignificanceResult::insufficient_data();
    }

    let df = degrees_of_freedom(
        baseline.measurement_iterations,
        treatment.measurement_iterations,
    );

    let pooled_se = baseline.score_error.hypot(treatment.score_error);
    if pooled_se == 0.0 {
        return SignificanceResult::not_applicable(Some(df));
    }

    let t_stat = (treatment.score - baseline.score).abs() / pooled_se;

    let (is_significant, confidence_level) = if t_stat >= T_CRITICAL_01 {
        (true, ConfidenceLevel::P01)
    } else if t_stat >= T_CRITICAL_05 {
        (true, ConfidenceLevel::P05)
    } else {
        (false, ConfidenceLevel::NotSignificant)
    };

    SignificanceResult {
        is_significant: Some(is_significant),
        confidence_level,
        t_statistic: Some(t_stat),
        degrees_of_freedom: Some(df),
        insufficient_data: false,
    }
}
