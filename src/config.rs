//! Report configuration loaded from TOML
//!
//! Every field is optional in the file. Command-line flags take precedence
//! over file values (see [`ReportConfig::merge_cli`]).
//!
//! ```toml
//! title = "JDK 17 vs JDK 21"
//! description = "G1, 4 cores, nightly run"
//! format = "html"
//! sort = "speedup"
//! numeric_params = true
//! fail_on_regression = true
//!
//! [filter]
//! benchmark = "MapBench"
//! status = "regressed"
//! significant_only = true
//! ```

use crate::cli::{Cli, OutputFormat};
use crate::filter::{ComparisonFilter, FilterError, SortKey};
use crate::report::{ExperimentMetadata, DEFAULT_TITLE};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportConfig {
    pub title: String,
    pub description: String,
    pub format: OutputFormat,
    /// Report file; `-` means stdout
    pub output: Option<PathBuf>,
    pub sort: SortKey,
    /// Compare @Param values numerically when forming match keys
    pub numeric_params: bool,
    pub fail_on_regression: bool,
    pub filter: FilterConfig,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            description: String::new(),
            format: OutputFormat::default(),
            output: None,
            sort: SortKey::default(),
            numeric_params: false,
            fail_on_regression: false,
            filter: FilterConfig::default(),
        }
    }
}

/// The `[filter]` table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FilterConfig {
    /// Case-insensitive regex on the benchmark name
    pub benchmark: Option<String>,
    pub status: Option<String>,
    pub mode: Option<String>,
    pub significant_only: bool,
}

impl FilterConfig {
    pub fn build(&self) -> Result<ComparisonFilter, FilterError> {
        let mut filter = ComparisonFilter::all().significant_only(self.significant_only);
        if let Some(pattern) = &self.benchmark {
            filter = filter.with_benchmark_pattern(pattern)?;
        }
        if let Some(status) = &self.status {
            filter = filter.with_status_name(status)?;
        }
        if let Some(mode) = &self.mode {
            filter = filter.with_mode(mode.as_str());
        }
        Ok(filter)
    }
}

impl ReportConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;

        Self::from_toml_str(&content)
            .with_context(|| format!("Invalid config {}", path.display()))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).context("Failed to parse TOML")?;
        config.validate()?;
        Ok(config)
    }

    /// Reject filters that cannot be compiled
    pub fn validate(&self) -> Result<(), FilterError> {
        self.filter.build().map(|_| ())
    }

    /// Overlay command-line flags; a flag that was given always wins
    pub fn merge_cli(mut self, cli: &Cli) -> Self {
        if let Some(title) = &cli.title {
            self.title = title.clone();
        }
        if let Some(description) = &cli.description {
            self.description = description.clone();
        }
        if let Some(format) = cli.format {
            self.format = format;
        }
        if let Some(output) = &cli.output {
            self.output = Some(output.clone());
        }
        if let Some(sort) = cli.sort {
            self.sort = sort;
        }
        self.numeric_params |= cli.numeric_params;
        self.fail_on_regression |= cli.fail_on_regression;

        if let Some(pattern) = &cli.filter {
            self.filter.benchmark = Some(pattern.clone());
        }
        if let Some(status) = &cli.status {
            self.filter.status = Some(status.clone());
        }
        if let Some(mode) = &cli.mode {
            self.filter.mode = Some(mode.clone());
        }
        self.filter.significant_only |= cli.significant_only;

        self
    }

    pub fn metadata(&self) -> ExperimentMetadata {
        ExperimentMetadata::new(self.title.clone(), self.description.clone())
    }

    /// Where the report goes; `None` means stdout
    pub fn output_path(&self, base_path: &Path) -> Option<PathBuf> {
        match &self.output {
            Some(path) if path.as_os_str() == "-" => None,
            Some(path) => Some(path.clone()),
            None => Some(base_path.join(format!(
                "benchmark_comparison_report.{}",
                self.format.extension()
            ))),
        }
    }
}
