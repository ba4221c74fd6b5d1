// Benchmark comparison engine
//
// Pairs baseline and treatment measurement records by a normalized match key,
// computes a polarity-aware delta per pair, and classifies each delta's
// statistical credibility from reported score error and iteration counts.
//
// Pipeline (leaves first):
// - key:          record -> MatchKey (pluggable via `KeyNormalizer`)
// - significance: pair -> tri-state SignificanceResult (approximate t-test)
// - delta:        pair -> improvement %, speedup, status (+ significance)
// - builder:      two record sets -> Vec<ComparisonRecord>
//
// Every function here is pure and infallible. Anomalies (zero baseline, too
// few iterations, zero pooled error, unmatched records) are returned as
// values, never raised.

mod builder;
mod delta;
mod key;
mod significance;

pub use builder::{build, index_by_key, ComparisonBuilder, ComparisonRecord};
pub use delta::{compare, Delta, Polarity, Status};
pub use key::{canonical_params, normalize, KeyNormalizer, MatchKey, NumericParams, RawParams};
pub use significance::{
    classify, degrees_of_freedom, ConfidenceLevel, SignificanceOutcome, SignificanceResult,
    MAX_DEGREES_OF_FREEDOM, MIN_ITERATIONS, T_CRITICAL_01, T_CRITICAL_05,
};
