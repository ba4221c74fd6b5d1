//! Report assembly and format dispatch
//!
//! A [`Report`] is the sorted comparisons plus their summary and the
//! free-text experiment metadata. Renderers read it and never recompute
//! status, speedup or significance.

use crate::cli::OutputFormat;
use crate::comparison::{ComparisonRecord, SignificanceOutcome, SignificanceResult};
use crate::csv_output::CsvOutput;
use crate::filter::{sort_comparisons, SortKey};
use crate::html_output::HtmlOutput;
use crate::json_output::JsonReport;
use crate::summary::ComparisonSummary;
use crate::text_output::TextOutput;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_TITLE: &str = "JMH Benchmark Comparison Report";

/// Free-text description of the experiment, shown by renderers only
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentMetadata {
    pub title: String,
    #[serde(default)]
    pub description: String,
}

impl Default for ExperimentMetadata {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            description: String::new(),
        }
    }
}

impl ExperimentMetadata {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Report {
    metadata: ExperimentMetadata,
    summary: ComparisonSummary,
    comparisons: Vec<ComparisonRecord>,
    sort: SortKey,
}

impl Report {
    pub fn new(
        metadata: ExperimentMetadata,
        mut comparisons: Vec<ComparisonRecord>,
        sort: SortKey,
    ) -> Self {
        sort_comparisons(&mut comparisons, sort);
        let summary = ComparisonSummary::from_comparisons(&comparisons);

        Self {
            metadata,
            summary,
            comparisons,
            sort,
        }
    }

    pub fn metadata(&self) -> &ExperimentMetadata {
        &self.metadata
    }

    pub fn summary(&self) -> &ComparisonSummary {
        &self.summary
    }

    /// Comparisons in report order
    pub fn comparisons(&self) -> &[ComparisonRecord] {
        &self.comparisons
    }

    pub fn sort(&self) -> SortKey {
        self.sort
    }

    pub fn render(&self, format: OutputFormat) -> Result<String> {
        let rendered = match format {
            OutputFormat::Html => HtmlOutput::new(self).to_html(),
            OutputFormat::Json => JsonReport::from_report(self)
                .to_json()
                .context("Failed to serialize JSON report")?,
            OutputFormat::Csv => CsvOutput::new(self).to_csv(),
            OutputFormat::Text => TextOutput::new(self).to_text(),
        };
        Ok(rendered)
    }
}

/// "Yes" / "No" / "?" for the significance column
pub fn significance_answer(significance: &SignificanceResult) -> &'static str {
    match significance.outcome() {
        SignificanceOutcome::Significant => "Yes",
        SignificanceOutcome::NotSignificant => "No",
        SignificanceOutcome::Indeterminate => "?",
    }
}

/// Longer description for tooltips and text output
pub fn significance_description(significance: &SignificanceResult) -> String {
    match significance.outcome() {
        SignificanceOutcome::Indeterminate => "insufficient data".to_string(),
        SignificanceOutcome::Significant | SignificanceOutcome::NotSignificant => {
            match significance.t_statistic {
                Some(t) => format!("{} (t = {:.2})", significance.confidence_level, t),
                None => significance.confidence_level.to_string(),
            }
        }
    }
}

/// Speedup as `1.23x`; an unbounded ratio prints as `∞x`
pub fn format_speedup(speedup: f64) -> String {
    if speedup.is_infinite() {
        "∞x".to_string()
    } else {
        format!("{:.2}x", speedup)
    }
}

pub fn format_improvement(percent: f64) -> String {
    format!("{:+.2}%", percent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comparison::build;
    use crate::record::MeasurementRecord;

    fn report() -> Report {
        let baseline = vec![
            MeasurementRecord::new("b.Second", "thrpt", 100.0)
                .with_error(1.0)
                .with_iterations(5),
            MeasurementRecord::new("a.First", "avgt", 10.0)
                .with_error(0.1)
                .with_iterations(1),
        ];
        let treatment = vec![
            MeasurementRecord::new("b.Second", "thrpt", 130.0)
                .with_error(1.0)
                .with_iterations(5),
            MeasurementRecord::new("a.First", "avgt", 12.0)
                .with_error(0.1)
                .with_iterations(5),
        ];
        Report::new(
            ExperimentMetadata::default(),
            build(&baseline, &treatment),
            SortKey::Benchmark,
        )
    }

    #[test]
    fn test_report_sorts_and_summarizes() {
        let report = report();
        assert_eq!(report.comparisons()[0].benchmark, "a.First");
        assert_eq!(report.summary().total, 2);
        assert_eq!(report.summary().insufficient_data, 1);
        assert_eq!(report.metadata().title, DEFAULT_TITLE);
    }

    #[test]
    fn test_significance_answer_never_coerces_indeterminate() {
        let report = report();
        let indeterminate = &report.comparisons()[0].statistical_significance;
        assert_eq!(significance_answer(indeterminate), "?");
        assert_eq!(significance_description(indeterminate), "insufficient data");

        let significant = &report.comparisons()[1].statistical_significance;
        assert_eq!(significance_answer(significant), "Yes");
        assert!(significance_description(significant).starts_with("p < 0.01"));
    }

    #[test]
    fn test_render_every_format() {
        let report = report();
        for format in [
            OutputFormat::Html,
            OutputFormat::Json,
            OutputFormat::Csv,
            OutputFormat::Text,
        ] {
            let out = report.render(format).unwrap();
            assert!(out.contains("b.Second"), "{:?}", format);
        }
    }

    #[test]
    fn test_number_formatting() {
        assert_eq!(format_speedup(1.2), "1.20x");
        assert_eq!(format_speedup(f64::INFINITY), "∞x");
        assert_eq!(format_improvement(20.0), "+20.00%");
        assert_eq!(format_improvement(-5.5), "-5.50%");
    }
}
