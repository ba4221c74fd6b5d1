// Pairs two measurement sets by match key and compares each pair

use crate::comparison::delta::{compare, Status};
use crate::comparison::key::{KeyNormalizer, MatchKey, RawParams};
use crate::comparison::significance::SignificanceResult;
use crate::record::{MeasurementRecord, RunDetails};
use serde::Serialize;
use std::collections::HashMap;

/// One matched baseline/treatment pair, fully computed
///
/// Owns copies of everything it shows; holds no reference to the source records.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonRecord {
    pub benchmark: String,
    pub mode: String,
    pub threads: u32,
    pub unit: String,
    pub baseline_score: f64,
    pub baseline_error: f64,
    pub treatment_score: f64,
    pub treatment_error: f64,
    pub improvement_percent: f64,
    pub speedup: f64,
    pub status: Status,
    pub higher_is_better: bool,
    pub statistical_significance: SignificanceResult,
    pub baseline_details: RunDetails,
    pub treatment_details: RunDetails,
}

impl ComparisonRecord {
    /// Compare a matched pair; identity fields come from the baseline
    pub fn from_pair(baseline: &MeasurementRecord, treatment: &MeasurementRecord) -> Self {
        let delta = compare(baseline, treatment);

        Self {
            benchmark: baseline.benchmark.clone(),
            mode: baseline.mode.clone(),
            threads: baseline.threads,
            unit: baseline.score_unit.clone(),
            baseline_score: baseline.score,
            baseline_error: baseline.score_error,
            treatment_score: treatment.score,
            treatment_error: treatment.score_error,
            improvement_percent: delta.improvement_percent,
            speedup: delta.speedup,
            status: delta.status,
            higher_is_better: delta.higher_is_better,
            statistical_significance: delta.statistical_significance,
            baseline_details: RunDetails::from(baseline),
            treatment_details: RunDetails::from(treatment),
        }
    }

    /// True when the treatment is slower and the difference is credible
    pub fn is_significant_regression(&self) -> bool {
        self.status == Status::Regressed
            && self.statistical_significance.is_significant == Some(true)
    }
}

/// Index records by match key, last write wins
///
/// When two records collapse to the same key the later one replaces the
/// earlier. Input order therefore matters for duplicates, and callers that
/// load several files should feed them in a stable order.
pub fn index_by_key<'a, N, I>(records: I, normalizer: &N) -> HashMap<MatchKey, &'a MeasurementRecord>
where
    N: KeyNormalizer + ?Sized,
    I: IntoIterator<Item = &'a MeasurementRecord>,
{
    let mut index = HashMap::new();

    for record in records {
        let key = normalizer.normalize(record);
        if let Some(previous) = index.insert(key, record) {
            tracing::debug!(
                benchmark = %previous.benchmark,
                mode = %previous.mode,
                "duplicate match key, keeping later record"
            );
        }
    }

    index
}

/// Entry point of the comparison engine
///
/// # Example
/// ```
/// use jmh_compare::comparison::ComparisonBuilder;
/// use jmh_compare::record::MeasurementRecord;
///
/// let baseline = vec![MeasurementRecord::new("X", "thrpt", 100.0)];
/// let treatment = vec![
///     MeasurementRecord::new("X", "thrpt", 120.0),
///     MeasurementRecord::new("Y", "thrpt", 1.0), // no baseline, skipped
/// ];
///
/// let comparisons = ComparisonBuilder::new().build(&baseline, &treatment);
/// assert_eq!(comparisons.len(), 1);
/// assert!((comparisons[0].speedup - 1.2).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ComparisonBuilder<N = RawParams> {
    normalizer: N,
}

impl ComparisonBuilder<RawParams> {
    pub fn new() -> Self {
        Self {
            normalizer: RawParams,
        }
    }
}

impl<N: KeyNormalizer> ComparisonBuilder<N> {
    /// Use a different key normalization policy
    pub fn with_normalizer(normalizer: N) -> Self {
        Self { normalizer }
    }

    pub fn normalizer(&self) -> &N {
        &self.normalizer
    }

    /// Compare every key present on both sides
    ///
    /// Output order is unspecified; sort downstream if it matters. Records
    /// present on only one side are dropped silently. An empty intersection
    /// yields an empty vector.
    pub fn build<'a, B, T>(&self, baseline: B, treatment: T) -> Vec<ComparisonRecord>
    where
        B: IntoIterator<Item = &'a MeasurementRecord>,
        T: IntoIterator<Item = &'a MeasurementRecord>,
    {
        let baseline_index = index_by_key(baseline, &self.normalizer);
        let treatment_index = index_by_key(treatment, &self.normalizer);

        baseline_index
            .iter()
            .filter_map(|(key, baseline)| {
                treatment_index
                    .get(key)
                    .map(|treatment| ComparisonRecord::from_pair(baseline, treatment))
            })
            .collect()
    }
}

/// Compare two record sets with the default raw-string key policy
pub fn build<'a, B, T>(baseline: B, treatment: T) -> Vec<ComparisonRecord>
where
    B: IntoIterator<Item = &'a MeasurementRecord>,
    T: IntoIterator<Item = &'a MeasurementRecord>,
{
    ComparisonBuilder::new().build(baseline, treatment)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comparison::key::NumericParams;

    #[test]
    fn test_index_last_write_wins() {
        let records = vec![
            MeasurementRecord::new("X", "thrpt", 1.0),
            MeasurementRecord::new("X", "thrpt", 2.0),
        ];
        let index = index_by_key(&records, &RawParams);
        assert_eq!(index.len(), 1);
        assert_eq!(index.values().next().unwrap().score, 2.0);
    }

    #[test]
    fn test_build_skips_unmatched() {
        let baseline = vec![
            MeasurementRecord::new("A", "thrpt", 1.0),
            MeasurementRecord::new("B", "thrpt", 1.0),
        ];
        let treatment = vec![
            MeasurementRecord::new("B", "thrpt", 2.0),
            MeasurementRecord::new("C", "thrpt", 2.0),
        ];
        let comparisons = build(&baseline, &treatment);
        assert_eq!(comparisons.len(), 1);
        assert_eq!(comparisons[0].benchmark, "B");
    }

    #[test]
    fn test_build_empty_intersection() {
        let baseline = vec![MeasurementRecord::new("A", "thrpt", 1.0)];
        let treatment = vec![MeasurementRecord::new("A", "avgt", 1.0)];
        assert!(build(&baseline, &treatment).is_empty());
        let empty: Vec<MeasurementRecord> = Vec::new();
        assert!(build(&empty, &treatment).is_empty());
    }

    #[test]
    fn test_identity_and_details_copied() {
        let mut baseline = MeasurementRecord::new("A", "avgt", 4.0)
            .with_unit("ns/op")
            .with_error(0.1)
            .with_threads(2);
        baseline.jdk = "17.0.9".to_string();
        let mut treatment = MeasurementRecord::new("A", "avgt", 2.0)
            .with_unit("us/op")
            .with_error(0.2)
            .with_threads(2);
        treatment.jdk = "21.0.1".to_string();

        let comparison = ComparisonRecord::from_pair(&baseline, &treatment);
        assert_eq!(comparison.unit, "ns/op");
        assert_eq!(comparison.threads, 2);
        assert_eq!(comparison.baseline_error, 0.1);
        assert_eq!(comparison.treatment_error, 0.2);
        assert_eq!(comparison.baseline_details.jdk, "17.0.9");
        assert_eq!(comparison.treatment_details.jdk, "21.0.1");
        assert_eq!(comparison.status, Status::Improved);
        assert!((comparison.speedup - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_numeric_normalizer_pairs_reformatted_params() {
        let baseline = vec![MeasurementRecord::new("A", "thrpt", 1.0).with_param("n", "4")];
        let treatment = vec![MeasurementRecord::new("A", "thrpt", 2.0).with_param("n", "4.0")];

        assert!(ComparisonBuilder::new().build(&baseline, &treatment).is_empty());
        assert_eq!(
            ComparisonBuilder::with_normalizer(NumericParams)
                .build(&baseline, &treatment)
                .len(),
            1
        );
    }

    #[test]
    fn test_significant_regression_flag() {
        let baseline = MeasurementRecord::new("A", "thrpt", 100.0)
            .with_error(1.0)
            .with_iterations(10);
        let slower = MeasurementRecord::new("A", "thrpt", 80.0)
            .with_error(1.0)
            .with_iterations(10);
        let untestable = slower.clone().with_iterations(1);

        assert!(ComparisonRecord::from_pair(&baseline, &slower).is_significant_regression());
        assert!(!ComparisonRecord::from_pair(&baseline, &untestable).is_significant_regression());
    }
}
