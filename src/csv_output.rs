//! CSV output format for comparison reports
//!
//! One row per comparison for spreadsheet analysis. Significance is the
//! confidence label (`?` when indeterminate) and `t_statistic` is left empty
//! when no statistic exists.

use crate::comparison::{canonical_params, ComparisonRecord};
use crate::report::Report;

const HEADER: &str = "benchmark,mode,threads,params,baseline_score,baseline_error,treatment_score,treatment_error,unit,improvement_percent,speedup,status,significance,t_statistic";

/// CSV output formatter
#[derive(Debug)]
pub struct CsvOutput<'a> {
    report: &'a Report,
}

impl<'a> CsvOutput<'a> {
    pub fn new(report: &'a Report) -> Self {
        Self { report }
    }

    /// Escape CSV field (handle commas, quotes, newlines)
    fn escape_field(field: &str) -> String {
        if field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r')
        {
            format!("\"{}\"", field.replace('"', "\"\""))
        } else {
            field.to_string()
        }
    }

    fn format_comparison(comparison: &ComparisonRecord) -> String {
        let significance = &comparison.statistical_significance;
        let t_statistic = significance
            .t_statistic
            .map(|t| format!("{:.4}", t))
            .unwrap_or_default();

        let fields = [
            Self::escape_field(&comparison.benchmark),
            Self::escape_field(&comparison.mode),
            comparison.threads.to_string(),
            Self::escape_field(&canonical_params(&comparison.baseline_details.params)),
            comparison.baseline_score.to_string(),
            comparison.baseline_error.to_string(),
            comparison.treatment_score.to_string(),
            comparison.treatment_error.to_string(),
            Self::escape_field(&comparison.unit),
            format!("{:.4}", comparison.improvement_percent),
            format!("{:.4}", comparison.speedup),
            comparison.status.to_string(),
            Self::escape_field(significance.confidence_level.label()),
            t_statistic,
        ];

        fields.join(",")
    }

    /// Generate CSV output as string
    pub fn to_csv(&self) -> String {
        let mut output = String::new();

        output.push_str(HEADER);
        output.push('\n');

        for comparison in self.report.comparisons() {
            output.push_str(&Self::format_comparison(comparison));
            output.push('\n');
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comparison::build;
    use crate::filter::SortKey;
    use crate::record::MeasurementRecord;
    use crate::report::ExperimentMetadata;

    fn csv_for(baseline: Vec<MeasurementRecord>, treatment: Vec<MeasurementRecord>) -> String {
        let report = Report::new(
            ExperimentMetadata::default(),
            build(&baseline, &treatment),
            SortKey::Benchmark,
        );
        CsvOutput::new(&report).to_csv()
    }

    #[test]
    fn test_csv_escape_field() {
        assert_eq!(CsvOutput::escape_field("simple"), "simple");
        assert_eq!(CsvOutput::escape_field("a,b"), "\"a,b\"");
        assert_eq!(CsvOutput::escape_field("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(CsvOutput::escape_field("line\nbreak"), "\"line\nbreak\"");
    }

    #[test]
    fn test_csv_header_and_row() {
        let csv = csv_for(
            vec![MeasurementRecord::new("A", "thrpt", 100.0)
                .with_error(5.0)
                .with_iterations(10)
                .with_unit("ops/s")],
            vec![MeasurementRecord::new("A", "thrpt", 120.0)
                .with_error(5.0)
                .with_iterations(10)
                .with_unit("ops/s")],
        );
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], HEADER);
        assert_eq!(
            lines[1],
            "A,thrpt,1,,100,5,120,5,ops/s,20.0000,1.2000,improved,p < 0.01,2.8284"
        );
    }

    #[test]
    fn test_csv_params_are_quoted_and_indeterminate_is_blank() {
        let csv = csv_for(
            vec![MeasurementRecord::new("P", "avgt", 4.0)
                .with_param("b", "2")
                .with_param("a", "1,5")],
            vec![MeasurementRecord::new("P", "avgt", 2.0)
                .with_param("a", "1,5")
                .with_param("b", "2")],
        );
        let row = csv.lines().nth(1).unwrap();

        assert!(row.starts_with("P,avgt,1,\"a=1,5&b=2\","));
        assert!(row.ends_with(",improved,?,"));
    }
}
