//! CLI argument parsing for jmh-compare

use crate::filter::SortKey;
use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Output format for comparison reports
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Self-contained HTML page (default)
    #[default]
    Html,
    /// JSON document for machine parsing
    Json,
    /// CSV for spreadsheet analysis
    Csv,
    /// Plain-text summary for terminals and CI logs
    Text,
}

impl OutputFormat {
    /// File extension of the default report file
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Html => "html",
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "jmh-compare")]
#[command(version)]
#[command(
    about = "Compare two sets of JMH benchmark results and report speedups and regressions",
    long_about = None
)]
pub struct Cli {
    /// Directory holding the `baseline` and `treatment` result directories
    #[arg(value_name = "BASEPATH")]
    pub base_path: PathBuf,

    /// Baseline results directory (default: BASEPATH/baseline)
    #[arg(long, value_name = "DIR")]
    pub baseline: Option<PathBuf>,

    /// Treatment results directory (default: BASEPATH/treatment)
    #[arg(long, value_name = "DIR")]
    pub treatment: Option<PathBuf>,

    /// Output format [default: html]
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Report file; `-` writes to stdout (default: BASEPATH/benchmark_comparison_report.EXT)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// TOML report configuration; command-line flags take precedence
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Report title
    #[arg(long)]
    pub title: Option<String>,

    /// Free-text experiment description shown under the title
    #[arg(long)]
    pub description: Option<String>,

    /// Only report benchmarks whose name matches this regex (case-insensitive)
    #[arg(long = "filter", value_name = "REGEX")]
    pub filter: Option<String>,

    /// Only report comparisons with this status (improved, regressed, unchanged, baseline_zero)
    #[arg(long, value_name = "STATUS")]
    pub status: Option<String>,

    /// Only report this JMH mode (e.g. thrpt, avgt)
    #[arg(long, value_name = "MODE")]
    pub mode: Option<String>,

    /// Only report statistically significant differences
    #[arg(long)]
    pub significant_only: bool,

    /// Row ordering [default: benchmark]
    #[arg(long, value_enum)]
    pub sort: Option<SortKey>,

    /// Treat numerically equal @Param values ("4" and "4.0") as the same configuration
    #[arg(long)]
    pub numeric_params: bool,

    /// Exit non-zero if any comparison is a statistically significant regression
    #[arg(long)]
    pub fail_on_regression: bool,

    /// Enable debug tracing output
    #[arg(long)]
    pub debug: bool,
}

impl Cli {
    pub fn baseline_dir(&self) -> PathBuf {
        self.baseline
            .clone()
            .unwrap_or_else(|| self.base_path.join("baseline"))
    }

    pub fn treatment_dir(&self) -> PathBuf {
        self.treatment
            .clone()
            .unwrap_or_else(|| self.base_path.join("treatment"))
    }
}
