// Match keys: the identity that pairs a baseline record with its treatment
//
// Two records are comparable iff benchmark, mode, thread count and the
// canonical parameter string are all equal. Parameter values are compared as
// raw strings by default, so "4" and "4.0" do NOT match. `NumericParams` is
// the opt-in alternative that canonicalizes numeric values first.

use crate::record::MeasurementRecord;
use std::collections::BTreeMap;
use std::fmt;

/// Derived identity of a measurement record
///
/// Computed on demand, never mutated, never persisted on its own.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MatchKey {
    pub benchmark: String,
    pub mode: String,
    pub threads: u32,
    /// `key=value` pairs in ascending key order, joined by `&`
    pub params: String,
}

impl fmt::Display for MatchKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}_{}_{}_{}",
            self.benchmark, self.mode, self.threads, self.params
        )
    }
}

/// Strategy for deriving a `MatchKey` from a record
///
/// The comparison builder only ever talks to this trait, so a stricter
/// normalizer can be swapped in without touching the pairing logic.
pub trait KeyNormalizer {
    fn normalize(&self, record: &MeasurementRecord) -> MatchKey;
}

/// Default normalizer: parameter values are matched byte-for-byte
#[derive(Debug, Clone, Copy, Default)]
pub struct RawParams;

impl KeyNormalizer for RawParams {
    fn normalize(&self, record: &MeasurementRecord) -> MatchKey {
        key_with(record, |value| value.to_string())
    }
}

/// Numeric-aware normalizer: `"4"`, `"4.0"` and `"4.00"` all become `"4"`
///
/// Values that do not parse as a finite number are left as-is.
#[derive(Debug, Clone, Copy, Default)]
pub struct NumericParams;

impl KeyNormalizer for NumericParams {
    fn normalize(&self, record: &MeasurementRecord) -> MatchKey {
        key_with(record, canonical_number)
    }
}

/// Normalize a record with the default (raw string) policy
pub fn normalize(record: &MeasurementRecord) -> MatchKey {
    RawParams.normalize(record)
}

/// Serialize params as `k1=v1&k2=v2` with keys in ascending lexicographic order
///
/// Empty params yield an empty string.
pub fn canonical_params(params: &BTreeMap<String, String>) -> String {
    canonical_params_with(params, |value| value.to_string())
}

fn canonical_params_with<F>(params: &BTreeMap<String, String>, value_fn: F) -> String
where
    F: Fn(&str) -> String,
{
    // BTreeMap iterates in ascending key order
    params
        .iter()
        .map(|(key, value)| format!("{}={}", key, value_fn(value)))
        .collect::<Vec<_>>()
        .join("&")
}

fn key_with<F>(record: &MeasurementRecord, value_fn: F) -> MatchKey
where
    F: Fn(&str) -> String,
{
    MatchKey {
        benchmark: record.benchmark.clone(),
        mode: record.mode.clone(),
        threads: record.threads,
        params: canonical_params_with(&record.params, value_fn),
    }
}

fn canonical_number(value: &str) -> String {
    let trimmed = value.trim();
    // Integers stay exact past 2^53
    if let Ok(integer) = trimmed.parse::<i128>() {
        return integer.to_string();
    }

    match trimmed.parse::<f64>() {
        Ok(number) if number.is_finite() => {
            // Fold -0 into 0
            let number = if number == 0.0 { 0.0 } else { number };
            format!("{}", number)
        }
        _ => value.to_string(),
    }
}
