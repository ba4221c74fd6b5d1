//! Plain-text output for terminals and CI logs

use crate::comparison::{canonical_params, ComparisonRecord, SignificanceOutcome, Status};
use crate::report::{format_improvement, format_speedup, significance_description, Report};

#[derive(Debug)]
pub struct TextOutput<'a> {
    report: &'a Report,
}

impl<'a> TextOutput<'a> {
    pub fn new(report: &'a Report) -> Self {
        Self { report }
    }

    fn verdict(&self) -> String {
        let summary = self.report.summary();
        let significant_regressions = summary.significant_regressions();
        let indeterminate_regressions = summary.indeterminate_regressions();

        if significant_regressions > 0 {
            format!(
                "❌ {} SIGNIFICANT REGRESSION{}\n",
                significant_regressions,
                if significant_regressions == 1 { "" } else { "S" }
            )
        } else if indeterminate_regressions > 0 {
            format!(
                "⚠️  {} REGRESSION{} WITH INSUFFICIENT DATA\n",
                indeterminate_regressions,
                if indeterminate_regressions == 1 { "" } else { "S" }
            )
        } else if summary.total > 0 && summary.insufficient_data == summary.total {
            "⚠️  INSUFFICIENT DATA\n".to_string()
        } else {
            "✅ NO SIGNIFICANT REGRESSION\n".to_string()
        }
    }

    fn marker(comparison: &ComparisonRecord) -> &'static str {
        match (comparison.status, comparison.statistical_significance.outcome()) {
            (Status::Regressed, SignificanceOutcome::Significant) => "❌",
            (Status::Improved, SignificanceOutcome::Significant) => "🚀",
            (_, SignificanceOutcome::Indeterminate) => "❔",
            _ => "  ",
        }
    }

    fn format_row(comparison: &ComparisonRecord) -> String {
        let params = canonical_params(&comparison.baseline_details.params);
        let name = if params.is_empty() {
            comparison.benchmark.clone()
        } else {
            format!("{} [{}]", comparison.benchmark, params)
        };

        let delta = match comparison.status {
            Status::BaselineZero => "baseline is zero".to_string(),
            _ => format!(
                "{} ({})",
                format_improvement(comparison.improvement_percent),
                format_speedup(comparison.speedup)
            ),
        };

        format!(
            "  {} {} {} threads={} {:.3} -> {:.3} {}  {}  {}\n",
            Self::marker(comparison),
            name,
            comparison.mode,
            comparison.threads,
            comparison.baseline_score,
            comparison.treatment_score,
            comparison.unit,
            delta,
            significance_description(&comparison.statistical_significance)
        )
    }

    pub fn to_text(&self) -> String {
        let metadata = self.report.metadata();
        let summary = self.report.summary();
        let mut text = String::new();

        text.push_str(&format!("{}\n", metadata.title));
        if !metadata.description.is_empty() {
            text.push_str(&format!("{}\n", metadata.description));
        }
        text.push('\n');

        text.push_str(&self.verdict());
        text.push('\n');

        text.push_str("📊 Summary:\n");
        text.push_str(&format!("  Compared:          {}\n", summary.total));
        text.push_str(&format!(
            "  Improved:          {}\n  Regressed:         {}\n  Unchanged:         {}\n",
            summary.improved, summary.regressed, summary.unchanged
        ));
        if summary.baseline_zero > 0 {
            text.push_str(&format!("  Zero baseline:     {}\n", summary.baseline_zero));
        }
        text.push_str(&format!(
            "  Significant:       {}\n  Insufficient data: {}\n",
            summary.significant, summary.insufficient_data
        ));
        text.push_str(&format!(
            "  Speedup:           mean {}, median {}\n",
            format_speedup(summary.speedup.mean),
            format_speedup(summary.speedup.median)
        ));
        text.push_str(&format!(
            "  Improvement:       mean {}, median {}\n",
            format_improvement(summary.improvement_percent.mean),
            format_improvement(summary.improvement_percent.median)
        ));

        if !self.report.comparisons().is_empty() {
            text.push_str("\n📋 Comparisons:\n");
            for comparison in self.report.comparisons() {
                text.push_str(&Self::format_row(comparison));
            }
        }

        text
    }
}
