use anyhow::{Context, Result};
use clap::Parser;
use jmh_compare::cli::Cli;
use jmh_compare::comparison::{ComparisonBuilder, ComparisonRecord, NumericParams};
use jmh_compare::config::ReportConfig;
use jmh_compare::loader::{load_dir, ResultSet};
use jmh_compare::report::Report;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber; `--debug` raises the level to trace
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::from_default_env().add_directive(tracing::Level::TRACE.into())
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_side(label: &str, dir: &Path) -> Result<ResultSet> {
    tracing::info!("Loading {} results from {}", label, dir.display());

    let set = load_dir(dir).with_context(|| format!("Failed to load {} results", label))?;
    tracing::info!(
        "Loaded {} {} records from {} files ({} rejected)",
        set.record_count(),
        label,
        set.file_count(),
        set.rejected().len()
    );

    Ok(set)
}

fn compare(config: &ReportConfig, baseline: &ResultSet, treatment: &ResultSet) -> Vec<ComparisonRecord> {
    if config.numeric_params {
        ComparisonBuilder::with_normalizer(NumericParams).build(baseline.records(), treatment.records())
    } else {
        ComparisonBuilder::new().build(baseline.records(), treatment.records())
    }
}

fn write_report(path: Option<PathBuf>, rendered: &str) -> Result<()> {
    match path {
        Some(path) => {
            fs::write(&path, rendered)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            tracing::info!("Report written to {}", path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(rendered.as_bytes())
                .context("Failed to write report to stdout")?;
            stdout.flush()?;
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Cli::parse();

    init_tracing(args.debug);

    let config = match &args.config {
        Some(path) => ReportConfig::from_file(path)?,
        None => ReportConfig::default(),
    }
    .merge_cli(&args);
    let filter = config.filter.build()?;

    let baseline = load_side("baseline", &args.baseline_dir())?;
    let treatment = load_side("treatment", &args.treatment_dir())?;

    if baseline.is_empty() || treatment.is_empty() {
        tracing::info!("No benchmark records on one or both sides, nothing to compare");
        return Ok(());
    }

    let comparisons = compare(&config, &baseline, &treatment);
    tracing::info!("Matched {} benchmark configurations", comparisons.len());
    if comparisons.is_empty() {
        tracing::info!("No benchmarks present in both baseline and treatment, nothing to report");
        return Ok(());
    }

    let comparisons = filter.apply(comparisons);
    let report = Report::new(config.metadata(), comparisons, config.sort);
    let rendered = report.render(config.format)?;
    write_report(config.output_path(&args.base_path), &rendered)?;

    let regressions = report.summary().significant_regressions();
    let untested = report.summary().indeterminate_regressions();
    if untested > 0 {
        tracing::warn!(
            "{} regression{} could not be tested for significance (fewer than 2 measurement iterations)",
            untested,
            if untested == 1 { "" } else { "s" }
        );
    }
    if config.fail_on_regression && regressions > 0 {
        anyhow::bail!(
            "{} statistically significant regression{} detected",
            regressions,
            if regressions == 1 { "" } else { "s" }
        );
    }

    Ok(())
}
