//! Property-based tests for the comparison engine
//!
//! Invariants checked over random JMH-shaped inputs:
//! 1. Building twice from the same input gives the same comparisons
//! 2. Speedup direction always agrees with status
//! 3. Swapping baseline and treatment inverts the delta
//! 4. Parameter insertion order never changes the match key
//! 5. Significance is indeterminate exactly when a side has < 2 iterations

use jmh_compare::comparison::{
    build, canonical_params, normalize, ComparisonRecord, SignificanceOutcome, Status,
};
use jmh_compare::record::MeasurementRecord;
use proptest::prelude::*;

fn mode() -> impl Strategy<Value = &'static str> {
    prop_oneof![Just("thrpt"), Just("avgt"), Just("sample"), Just("ss")]
}

fn record(mode: &str, score: f64, error: f64, iterations: u32) -> MeasurementRecord {
    MeasurementRecord::new("org.example.Bench.run", mode, score)
        .with_error(error)
        .with_iterations(iterations)
}

fn identity(c: &ComparisonRecord) -> (String, String, u32, String) {
    (
        c.benchmark.clone(),
        c.mode.clone(),
        c.threads,
        canonical_params(&c.baseline_details.params),
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_build_is_idempotent(
        entries in prop::collection::vec(("[a-d]", mode(), 1u32..4, 0.1f64..1000.0, 0.1f64..1000.0), 0..20),
    ) {
        let baseline: Vec<MeasurementRecord> = entries
            .iter()
            .map(|(name, mode, threads, b, _)| MeasurementRecord::new(name.as_str(), *mode, *b).with_threads(*threads))
            .collect();
        let treatment: Vec<MeasurementRecord> = entries
            .iter()
            .map(|(name, mode, threads, _, t)| MeasurementRecord::new(name.as_str(), *mode, *t).with_threads(*threads))
            .collect();

        let mut first = build(&baseline, &treatment);
        let mut second = build(&baseline, &treatment);
        first.sort_by_key(identity);
        second.sort_by_key(identity);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_speedup_agrees_with_status(
        mode in mode(),
        b in 0.001f64..1e6,
        t in 0.001f64..1e6,
    ) {
        let c = ComparisonRecord::from_pair(&record(mode, b, 1.0, 5), &record(mode, t, 1.0, 5));
        match c.status {
            Status::Improved => prop_assert!(c.speedup > 1.0),
            Status::Regressed => prop_assert!(c.speedup < 1.0),
            Status::Unchanged => prop_assert_eq!(c.speedup, 1.0),
            Status::BaselineZero => prop_assert!(false, "baseline is never zero here"),
        }
    }

    #[test]
    fn prop_swapping_sides_inverts_delta(
        mode in mode(),
        b in 0.001f64..1e6,
        t in 0.001f64..1e6,
        error in 0.0f64..10.0,
    ) {
        let forward = ComparisonRecord::from_pair(&record(mode, b, error, 5), &record(mode, t, error, 5));
        let backward = ComparisonRecord::from_pair(&record(mode, t, error, 5), &record(mode, b, error, 5));

        prop_assert!((forward.speedup * backward.speedup - 1.0).abs() < 1e-9);
        prop_assert_eq!(
            forward.statistical_significance.is_significant,
            backward.statistical_significance.is_significant
        );
        match forward.status {
            Status::Improved => prop_assert_eq!(backward.status, Status::Regressed),
            Status::Regressed => prop_assert_eq!(backward.status, Status::Improved),
            Status::Unchanged => prop_assert_eq!(backward.status, Status::Unchanged),
            Status::BaselineZero => prop_assert!(false, "baseline is never zero here"),
        }
    }

    #[test]
    fn prop_param_order_is_irrelevant(
        params in prop::collection::btree_map("[a-z]{1,6}", "[0-9a-z]{0,4}", 0..6),
    ) {
        let mut forward = record("thrpt", 1.0, 0.0, 1);
        for (k, v) in params.iter() {
            forward = forward.with_param(k.as_str(), v.as_str());
        }
        let mut backward = record("thrpt", 1.0, 0.0, 1);
        for (k, v) in params.iter().rev() {
            backward = backward.with_param(k.as_str(), v.as_str());
        }

        prop_assert_eq!(normalize(&forward), normalize(&backward));
    }

    #[test]
    fn prop_indeterminate_iff_too_few_iterations(
        bi in 0u32..5,
        ti in 0u32..5,
        b in 1.0f64..100.0,
        t in 1.0f64..100.0,
    ) {
        let c = ComparisonRecord::from_pair(&record("avgt", b, 1.0, bi), &record("avgt", t, 1.0, ti));
        let indeterminate = c.statistical_significance.outcome() == SignificanceOutcome::Indeterminate;

        prop_assert_eq!(indeterminate, bi < 2 || ti < 2);
        prop_assert_eq!(indeterminate, c.statistical_significance.is_significant.is_none());
    }
}
