//! HTML output format for comparison reports
//!
//! Self-contained page: embedded CSS, summary cards, one table row per
//! comparison and a collapsible details row with both sides' run metadata.

use crate::comparison::{canonical_params, ComparisonRecord, SignificanceOutcome, Status};
use crate::record::RunDetails;
use crate::report::{
    format_improvement, format_speedup, significance_answer, significance_description, Report,
};

/// HTML output formatter
#[derive(Debug)]
pub struct HtmlOutput<'a> {
    report: &'a Report,
}

impl<'a> HtmlOutput<'a> {
    pub fn new(report: &'a Report) -> Self {
        Self { report }
    }

    /// Escape HTML special characters to prevent XSS
    fn escape_html(text: &str) -> String {
        text.replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
            .replace('"', "&quot;")
            .replace('\'', "&#39;")
    }

    /// Generate embedded CSS styles
    fn generate_styles() -> &'static str {
        r#"
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            margin: 20px;
            background-color: #f5f5f5;
        }
        h1, h2 {
            color: #333;
        }
        .description {
            color: #555;
            max-width: 60em;
        }
        .cards {
            display: flex;
            flex-wrap: wrap;
            gap: 12px;
            margin: 20px 0;
        }
        .card {
            background-color: white;
            box-shadow: 0 1px 3px rgba(0,0,0,0.1);
            padding: 12px 16px;
            min-width: 140px;
        }
        .card .value {
            font-size: 1.6em;
            font-weight: bold;
        }
        .card .label {
            color: #888;
            font-size: 0.85em;
        }
        table {
            border-collapse: collapse;
            width: 100%;
            background-color: white;
            box-shadow: 0 1px 3px rgba(0,0,0,0.1);
            margin-bottom: 20px;
        }
        th, td {
            border: 1px solid #ddd;
            padding: 8px;
            text-align: left;
        }
        th {
            background-color: #4a90d9;
            color: white;
            font-weight: bold;
        }
        tr:hover {
            background-color: #f0f0f0;
        }
        .benchmark {
            font-family: monospace;
            font-weight: bold;
        }
        .score, .speedup, .improvement {
            font-family: monospace;
            text-align: right;
        }
        .status-improved {
            color: #2e7d32;
        }
        .status-regressed {
            color: #cc0000;
        }
        .status-unchanged, .status-baseline_zero {
            color: #666;
        }
        .significance-indeterminate {
            color: #b8860b;
        }
        .run-details td {
            background-color: #fafafa;
        }
        .run-details table {
            width: auto;
            display: inline-table;
            margin-right: 20px;
            vertical-align: top;
        }
        .run-details th {
            background-color: #5cb85c;
        }
        pre {
            font-size: 0.85em;
            white-space: pre-wrap;
        }
        .footer {
            margin-top: 20px;
            font-size: 0.8em;
            color: #888;
            text-align: center;
        }
        "#
    }

    fn summary_card(value: &str, label: &str) -> String {
        format!(
            "        <div class=\"card\"><div class=\"value\">{}</div><div class=\"label\">{}</div></div>\n",
            Self::escape_html(value),
            Self::escape_html(label)
        )
    }

    fn render_summary(&self) -> String {
        let summary = self.report.summary();
        let mut html = String::new();

        html.push_str("    <div class=\"cards\">\n");
        html.push_str(&Self::summary_card(&summary.total.to_string(), "Benchmarks compared"));
        html.push_str(&Self::summary_card(&summary.improved.to_string(), "Improved"));
        html.push_str(&Self::summary_card(&summary.regressed.to_string(), "Regressed"));
        html.push_str(&Self::summary_card(&summary.unchanged.to_string(), "Unchanged"));
        if summary.baseline_zero > 0 {
            html.push_str(&Self::summary_card(
                &summary.baseline_zero.to_string(),
                "Zero baseline",
            ));
        }
        html.push_str(&Self::summary_card(
            &summary.significant.to_string(),
            "Statistically significant",
        ));
        html.push_str(&Self::summary_card(
            &summary.insufficient_data.to_string(),
            "Insufficient data",
        ));
        html.push_str(&Self::summary_card(
            &format_speedup(summary.speedup.median),
            "Median speedup",
        ));
        html.push_str(&Self::summary_card(
            &format_improvement(summary.improvement_percent.mean),
            "Mean improvement",
        ));
        if summary.regressed > 0 {
            html.push_str(&Self::summary_card(
                &format_improvement(summary.regression_improvement_percent.mean),
                "Mean regression",
            ));
        }
        html.push_str("    </div>\n");

        html
    }

    fn generate_header() -> &'static str {
        "<tr><th>Benchmark</th><th>Mode</th><th>Threads</th><th>Params</th>\
         <th>Baseline</th><th>Treatment</th><th>Unit</th><th>Improvement</th>\
         <th>Speedup</th><th>Status</th><th>Significant</th></tr>"
    }

    const COLUMNS: usize = 11;

    fn format_comparison_row(comparison: &ComparisonRecord) -> String {
        let params = canonical_params(&comparison.baseline_details.params);
        let significance = &comparison.statistical_significance;
        let significance_class = match significance.outcome() {
            SignificanceOutcome::Significant => "significance-yes",
            SignificanceOutcome::NotSignificant => "significance-no",
            SignificanceOutcome::Indeterminate => "significance-indeterminate",
        };
        let (improvement, speedup) = match comparison.status {
            Status::BaselineZero => ("n/a".to_string(), "n/a".to_string()),
            _ => (
                format_improvement(comparison.improvement_percent),
                format_speedup(comparison.speedup),
            ),
        };

        let cells = [
            format!(
                r#"<td class="benchmark">{}</td>"#,
                Self::escape_html(&comparison.benchmark)
            ),
            format!("<td>{}</td>", Self::escape_html(&comparison.mode)),
            format!("<td>{}</td>", comparison.threads),
            format!(
                "<td>{}</td>",
                Self::escape_html(if params.is_empty() { "-" } else { params.as_str() })
            ),
            format!(
                r#"<td class="score">{:.3} &plusmn; {:.3}</td>"#,
                comparison.baseline_score, comparison.baseline_error
            ),
            format!(
                r#"<td class="score">{:.3} &plusmn; {:.3}</td>"#,
                comparison.treatment_score, comparison.treatment_error
            ),
            format!("<td>{}</td>", Self::escape_html(&comparison.unit)),
            format!(
                r#"<td class="improvement status-{}">{}</td>"#,
                comparison.status,
                Self::escape_html(&improvement)
            ),
            format!(
                r#"<td class="speedup status-{}">{}</td>"#,
                comparison.status,
                Self::escape_html(&speedup)
            ),
            format!(
                r#"<td class="status-{}">{}</td>"#,
                comparison.status, comparison.status
            ),
            format!(
                r#"<td class="{}" title="{}">{}</td>"#,
                significance_class,
                Self::escape_html(&significance_description(significance)),
                significance_answer(significance)
            ),
        ];

        format!("<tr>{}</tr>", cells.concat())
    }

    fn render_run_details(side: &str, details: &RunDetails) -> String {
        let confidence = match details.score_confidence {
            Some([low, high]) => format!("[{:.3}, {:.3}]", low, high),
            None => "-".to_string(),
        };
        let rows = [
            ("JDK", details.jdk.clone()),
            ("VM", details.vm_name.clone()),
            ("VM version", details.vm_version.clone()),
            ("JVM", details.jvm.clone()),
            ("JVM args", details.jvm_args.join(" ")),
            ("Forks", details.forks.to_string()),
            (
                "Warmup",
                format!("{} x {}", details.warmup_iterations, details.warmup_time),
            ),
            (
                "Measurement",
                format!(
                    "{} x {}",
                    details.measurement_iterations, details.measurement_time
                ),
            ),
            ("Confidence", confidence),
        ];

        let mut html = String::new();
        html.push_str(&format!(
            "<table><tr><th colspan=\"2\">{}</th></tr>",
            Self::escape_html(side)
        ));
        for (label, value) in rows {
            html.push_str(&format!(
                "<tr><td>{}</td><td>{}</td></tr>",
                label,
                Self::escape_html(&value)
            ));
        }
        for (key, value) in &details.params {
            html.push_str(&format!(
                "<tr><td>@Param {}</td><td>{}</td></tr>",
                Self::escape_html(key),
                Self::escape_html(value)
            ));
        }
        html.push_str("</table>");

        if !details.secondary_metrics.is_empty() {
            let metrics = serde_json::to_string_pretty(details.secondary_metrics.as_json())
                .unwrap_or_default();
            html.push_str(&format!(
                "<pre>{} secondary metrics:\n{}</pre>",
                Self::escape_html(side),
                Self::escape_html(&metrics)
            ));
        }

        html
    }

    fn format_details_row(comparison: &ComparisonRecord) -> String {
        format!(
            "<tr class=\"run-details\"><td colspan=\"{}\"><details><summary>Run details</summary>{}{}</details></td></tr>",
            Self::COLUMNS,
            Self::render_run_details("Baseline", &comparison.baseline_details),
            Self::render_run_details("Treatment", &comparison.treatment_details)
        )
    }

    /// Generate complete HTML document
    pub fn to_html(&self) -> String {
        let metadata = self.report.metadata();
        let title = Self::escape_html(&metadata.title);
        let mut html = String::new();

        html.push_str("<!DOCTYPE html>\n");
        html.push_str("<html lang=\"en\">\n");

        html.push_str("<head>\n");
        html.push_str("    <meta charset=\"UTF-8\">\n");
        html.push_str(
            "    <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n",
        );
        html.push_str(&format!("    <title>{}</title>\n", title));
        html.push_str("    <style>");
        html.push_str(Self::generate_styles());
        html.push_str("</style>\n");
        html.push_str("</head>\n");

        html.push_str("<body>\n");
        html.push_str(&format!("    <h1>{}</h1>\n", title));
        if !metadata.description.is_empty() {
            html.push_str(&format!(
                "    <p class=\"description\">{}</p>\n",
                Self::escape_html(&metadata.description)
            ));
        }

        html.push_str("    <h2>Summary</h2>\n");
        html.push_str(&self.render_summary());

        html.push_str("    <h2>Comparisons</h2>\n");
        html.push_str("    <table>\n");
        html.push_str("        ");
        html.push_str(Self::generate_header());
        html.push('\n');

        for comparison in self.report.comparisons() {
            html.push_str("        ");
            html.push_str(&Self::format_comparison_row(comparison));
            html.push('\n');
            html.push_str("        ");
            html.push_str(&Self::format_details_row(comparison));
            html.push('\n');
        }

        html.push_str("    </table>\n");

        html.push_str("    <div class=\"footer\">\n");
        html.push_str(&format!(
            "        Generated by jmh-compare {} &middot; sorted by {:?}\n",
            env!("CARGO_PKG_VERSION"),
            self.report.sort()
        ));
        html.push_str("    </div>\n");

        html.push_str("</body>\n");
        html.push_str("</html>\n");

        html
    }
}
