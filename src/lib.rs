//! jmh-compare - Statistical comparison of JMH benchmark result sets
//!
//! Loads two directories of JMH JSON results (a baseline and a treatment),
//! pairs measurements by benchmark configuration, computes polarity-aware
//! speedups with a significance classification, and renders reports.

pub mod cli;
pub mod comparison;
pub mod config;
pub mod csv_output;
pub mod filter;
pub mod html_output;
pub mod json_output;
pub mod loader;
pub mod record;
pub mod report;
pub mod summary;
pub mod text_output;
