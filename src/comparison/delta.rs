// Polarity-aware performance delta between two matched records
//
// Throughput modes are higher-is-better; every time-based mode is
// lower-is-better. `speedup` is normalized so that > 1 always means the
// treatment is better, whichever direction the metric runs.

use crate::comparison::significance::{classify, SignificanceResult};
use crate::record::MeasurementRecord;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction in which a metric improves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    HigherIsBetter,
    LowerIsBetter,
}

impl Polarity {
    /// `thrpt` / `Throughput` are higher-is-better; all other modes are times
    pub fn from_mode(mode: &str) -> Self {
        match mode {
            "thrpt" | "Throughput" => Polarity::HigherIsBetter,
            _ => Polarity::LowerIsBetter,
        }
    }

    pub fn higher_is_better(self) -> bool {
        self == Polarity::HigherIsBetter
    }
}

/// Classification of a comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Improved,
    Regressed,
    Unchanged,
    /// Baseline score was exactly zero; no ratio can be formed
    BaselineZero,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Improved => "improved",
            Status::Regressed => "regressed",
            Status::Unchanged => "unchanged",
            Status::BaselineZero => "baseline_zero",
        }
    }

    /// Parse the snake_case name used in output and on the command line
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "improved" => Some(Status::Improved),
            "regressed" => Some(Status::Regressed),
            "unchanged" => Some(Status::Unchanged),
            "baseline_zero" => Some(Status::BaselineZero),
            _ => None,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of comparing one baseline record against its treatment
#[derive(Debug, Clone, PartialEq)]
pub struct Delta {
    pub improvement_percent: f64,
    pub speedup: f64,
    pub status: Status,
    pub higher_is_better: bool,
    pub statistical_significance: SignificanceResult,
}

/// Compute the signed improvement, speedup and significance of a pair
///
/// Never fails: a zero baseline takes the `BaselineZero` branch instead of
/// dividing by zero.
///
/// # Example
/// ```
/// use jmh_compare::comparison::{compare, Status};
/// use jmh_compare::record::MeasurementRecord;
///
/// let baseline = MeasurementRecord::new("X", "avgt", 100.0);
/// let treatment = MeasurementRecord::new("X", "avgt", 80.0);
///
/// let delta = compare(&baseline, &treatment);
/// assert_eq!(delta.status, Status::Improved);
/// assert!((delta.improvement_percent - 20.0).abs() < 1e-9);
/// assert!((delta.speedup - 1.25).abs() < 1e-9);
/// ```
pub fn compare(baseline: &MeasurementRecord, treatment: &MeasurementRecord) -> Delta {
    let polarity = Polarity::from_mode(&baseline.mode);

    if baseline.score == 0.0 {
        return Delta {
            improvement_percent: 0.0,
            speedup: 0.0,
            status: Status::BaselineZero,
            higher_is_better: polarity.higher_is_better(),
            statistical_significance: SignificanceResult::not_applicable(None),
        };
    }

    let (improvement_percent, speedup) = match polarity {
        Polarity::HigherIsBetter => (
            (treatment.score - baseline.score) / baseline.score * 100.0,
            treatment.score / baseline.score,
        ),
        Polarity::LowerIsBetter => (
            (baseline.score - treatment.score) / baseline.score * 100.0,
            baseline.score / treatment.score,
        ),
    };

    let status = if improvement_percent > 0.0 {
        Status::Improved
    } else if improvement_percent < 0.0 {
        Status::Regressed
    } else {
        Status::Unchanged
    };

    Delta {
        improvement_percent,
        speedup,
        status,
        higher_is_better: polarity.higher_is_better(),
        statistical_significance: classify(baseline, treatment),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comparison::significance::ConfidenceLevel;

    #[test]
    fn test_polarity_from_mode() {
        assert_eq!(Polarity::from_mode("thrpt"), Polarity::HigherIsBetter);
        assert_eq!(Polarity::from_mode("Throughput"), Polarity::HigherIsBetter);
        for mode in ["avgt", "sample", "ss", "AverageTime", "SingleShotTime", ""] {
            assert_eq!(Polarity::from_mode(mode), Polarity::LowerIsBetter, "{}", mode);
        }
    }

    #[test]
    fn test_throughput_improvement() {
        let delta = compare(
            &MeasurementRecord::new("X", "thrpt", 200.0),
            &MeasurementRecord::new("X", "thrpt", 250.0),
        );
        assert!((delta.improvement_percent - 25.0).abs() < 1e-9);
        assert!((delta.speedup - 1.25).abs() < 1e-9);
        assert_eq!(delta.status, Status::Improved);
        assert!(delta.higher_is_better);
    }

    #[test]
    fn test_latency_regression() {
        let delta = compare(
            &MeasurementRecord::new("X", "sample", 10.0),
            &MeasurementRecord::new("X", "sample", 15.0),
        );
        assert!((delta.improvement_percent + 50.0).abs() < 1e-9);
        assert!((delta.speedup - 10.0 / 15.0).abs() < 1e-9);
        assert_eq!(delta.status, Status::Regressed);
        assert!(!delta.higher_is_better);
    }

    #[test]
    fn test_exact_equality_is_unchanged() {
        let delta = compare(
            &MeasurementRecord::new("X", "avgt", 42.0),
            &MeasurementRecord::new("X", "avgt", 42.0),
        );
        assert_eq!(delta.improvement_percent, 0.0);
        assert_eq!(delta.speedup, 1.0);
        assert_eq!(delta.status, Status::Unchanged);
    }

    #[test]
    fn test_baseline_zero() {
        let baseline = MeasurementRecord::new("X", "thrpt", 0.0).with_iterations(10);
        let treatment = MeasurementRecord::new("X", "thrpt", 5.0).with_iterations(10);
        let delta = compare(&baseline, &treatment);

        assert_eq!(delta.status, Status::BaselineZero);
        assert_eq!(delta.improvement_percent, 0.0);
        assert_eq!(delta.speedup, 0.0);
        assert_eq!(delta.statistical_significance.is_significant, Some(false));
        assert_eq!(
            delta.statistical_significance.confidence_level,
            ConfidenceLevel::NotApplicable
        );
    }

    #[test]
    fn test_latency_treatment_zero_is_infinite_speedup() {
        let delta = compare(
            &MeasurementRecord::new("X", "avgt", 10.0),
            &MeasurementRecord::new("X", "avgt", 0.0),
        );
        assert_eq!(delta.status, Status::Improved);
        assert!(delta.speedup.is_infinite());
        assert!((delta.improvement_percent - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_status_round_trips_through_name() {
        for status in [
            Status::Improved,
            Status::Regressed,
            Status::Unchanged,
            Status::BaselineZero,
        ] {
            assert_eq!(Status::parse(status.as_str()), Some(status));
            assert_eq!(
                serde_json::to_string(&status).unwrap(),
                format!("\"{}\"", status)
            );
        }
        assert_eq!(Status::parse("faster"), None);
    }
}
