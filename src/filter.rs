//! Report filtering and row ordering
//!
//! Filters narrow the comparisons shown in a report without touching the
//! engine: a case-insensitive benchmark-name regex, a status, a mode, and a
//! significant-only switch. All set criteria must hold.

use crate::comparison::{canonical_params, ComparisonRecord, Status};
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FilterError {
    #[error("invalid benchmark pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("unknown status '{0}' (expected improved, regressed, unchanged or baseline_zero)")]
    UnknownStatus(String),
}

/// Criteria a comparison must satisfy to appear in a report
#[derive(Debug, Clone, Default)]
pub struct ComparisonFilter {
    benchmark: Option<Regex>,
    status: Option<Status>,
    mode: Option<String>,
    significant_only: bool,
}

impl ComparisonFilter {
    /// A filter that keeps everything
    pub fn all() -> Self {
        Self::default()
    }

    /// Keep benchmarks whose name matches `pattern` (case-insensitive, unanchored)
    pub fn with_benchmark_pattern(mut self, pattern: &str) -> Result<Self, FilterError> {
        let regex = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map_err(|e| FilterError::InvalidPattern {
                pattern: pattern.to_string(),
                source: e,
            })?;
        self.benchmark = Some(regex);
        Ok(self)
    }

    pub fn with_status(mut self, status: Status) -> Self {
        self.status = Some(status);
        self
    }

    /// Parse a status name such as `regressed`
    pub fn with_status_name(self, name: &str) -> Result<Self, FilterError> {
        let status =
            Status::parse(name.trim()).ok_or_else(|| FilterError::UnknownStatus(name.to_string()))?;
        Ok(self.with_status(status))
    }

    pub fn with_mode(mut self, mode: impl Into<String>) -> Self {
        self.mode = Some(mode.into());
        self
    }

    /// Drop comparisons that are not significant or cannot be tested
    pub fn significant_only(mut self, enabled: bool) -> Self {
        self.significant_only = enabled;
        self
    }

    pub fn is_pass_through(&self) -> bool {
        self.benchmark.is_none()
            && self.status.is_none()
            && self.mode.is_none()
            && !self.significant_only
    }

    pub fn matches(&self, comparison: &ComparisonRecord) -> bool {
        if let Some(regex) = &self.benchmark {
            if !regex.is_match(&comparison.benchmark) {
                return false;
            }
        }
        if let Some(status) = self.status {
            if comparison.status != status {
                return false;
            }
        }
        if let Some(mode) = &self.mode {
            if &comparison.mode != mode {
                return false;
            }
        }
        if self.significant_only && comparison.statistical_significance.is_significant != Some(true)
        {
            return false;
        }
        true
    }

    pub fn apply(&self, mut comparisons: Vec<ComparisonRecord>) -> Vec<ComparisonRecord> {
        if !self.is_pass_through() {
            comparisons.retain(|c| self.matches(c));
        }
        comparisons
    }
}

/// Row ordering for reports
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Benchmark name, ascending
    #[default]
    Benchmark,
    /// Largest speedup first
    Speedup,
    /// Largest improvement percentage first
    Improvement,
}

/// Sort comparisons in place; ties fall back to benchmark, mode, threads, params
pub fn sort_comparisons(comparisons: &mut [ComparisonRecord], key: SortKey) {
    comparisons.sort_by(|a, b| {
        let primary = match key {
            SortKey::Benchmark => Ordering::Equal,
            SortKey::Speedup => b.speedup.total_cmp(&a.speedup),
            SortKey::Improvement => b.improvement_percent.total_cmp(&a.improvement_percent),
        };
        primary.then_with(|| identity_order(a, b))
    });
}

fn identity_order(a: &ComparisonRecord, b: &ComparisonRecord) -> Ordering {
    a.benchmark
        .cmp(&b.benchmark)
        .then_with(|| a.mode.cmp(&b.mode))
        .then_with(|| a.threads.cmp(&b.threads))
        .then_with(|| {
            canonical_params(&a.baseline_details.params)
                .cmp(&canonical_params(&b.baseline_details.params))
        })
}
