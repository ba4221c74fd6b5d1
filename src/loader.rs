//! Loading JMH JSON result files
//!
//! A results directory holds any number of `*.json` files, each a JSON array
//! of JMH result objects (the output of `-rf json`). Files are read in
//! file-name order, so when two files report the same benchmark configuration
//! the one whose name sorts last wins.
//!
//! Bad input is isolated, never propagated: a file that is not a JSON array
//! is skipped whole, and a record missing a required field is skipped alone.
//! Both are kept in [`ResultSet::rejected`] for reporting.

use crate::record::{MeasurementRecord, Passthrough};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while loading result files
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("results directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed results file {}: {source}", .path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{}: record {index} is missing required field `{field}`", .path.display())]
    MissingField {
        path: PathBuf,
        index: usize,
        field: &'static str,
    },

    #[error("{}: record {index} has invalid `{field}`: {reason}", .path.display())]
    InvalidField {
        path: PathBuf,
        index: usize,
        field: &'static str,
        reason: String,
    },
}

/// Records parsed from one file
#[derive(Debug, Clone)]
pub struct ResultFile {
    /// File name without directory
    pub name: String,
    pub records: Vec<MeasurementRecord>,
}

/// Output of parsing a single file's contents
#[derive(Debug, Default)]
pub struct ParsedResults {
    pub records: Vec<MeasurementRecord>,
    /// Records that were dropped, one error each
    pub rejected: Vec<LoadError>,
}

/// Everything loaded from one results directory
#[derive(Debug, Default)]
pub struct ResultSet {
    files: Vec<ResultFile>,
    rejected: Vec<LoadError>,
}

impl ResultSet {
    pub fn files(&self) -> &[ResultFile] {
        &self.files
    }

    /// All records, in file-name order then file order
    pub fn records(&self) -> impl Iterator<Item = &MeasurementRecord> {
        self.files.iter().flat_map(|file| file.records.iter())
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    pub fn record_count(&self) -> usize {
        self.files.iter().map(|file| file.records.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.record_count() == 0
    }

    /// Files and records skipped during loading
    pub fn rejected(&self) -> &[LoadError] {
        &self.rejected
    }
}

/// JMH's on-disk shape; numeric fields are taken as raw JSON values because
/// JMH writes `"NaN"` strings where no estimate exists
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRecord {
    benchmark: Option<String>,
    mode: Option<String>,
    threads: Option<Value>,
    forks: Option<Value>,
    jvm: Option<String>,
    jvm_args: Option<Vec<String>>,
    jdk: Option<String>,
    jdk_version: Option<String>,
    vm_name: Option<String>,
    vm_version: Option<String>,
    warmup_iterations: Option<Value>,
    warmup_time: Option<String>,
    measurement_iterations: Option<Value>,
    measurement_time: Option<String>,
    primary_metric: Option<RawPrimaryMetric>,
    secondary_metrics: Option<Value>,
    params: Option<BTreeMap<String, Value>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPrimaryMetric {
    score: Option<Value>,
    score_error: Option<Value>,
    score_unit: Option<String>,
    score_confidence: Option<Vec<Value>>,
}

/// Parse one file's contents
///
/// Fails only if the text is not a JSON array; individual bad records are
/// collected in [`ParsedResults::rejected`].
pub fn parse_results(json: &str, source: &Path) -> Result<ParsedResults, LoadError> {
    let items: Vec<Value> = serde_json::from_str(json).map_err(|e| LoadError::Malformed {
        path: source.to_path_buf(),
        source: e,
    })?;

    let mut parsed = ParsedResults::default();

    for (index, item) in items.into_iter().enumerate() {
        let record = serde_json::from_value::<RawRecord>(item)
            .map_err(|e| LoadError::InvalidField {
                path: source.to_path_buf(),
                index,
                field: "record",
                reason: e.to_string(),
            })
            .and_then(|raw| raw.into_record(source, index));

        match record {
            Ok(record) => parsed.records.push(record),
            Err(e) => {
                tracing::warn!("Skipping record: {}", e);
                parsed.rejected.push(e);
            }
        }
    }

    Ok(parsed)
}

/// Read and parse one results file
pub fn load_file(path: &Path) -> Result<ParsedResults, LoadError> {
    let json = fs::read_to_string(path).map_err(|e| LoadError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    parse_results(&json, path)
}

/// Load every `*.json` file directly inside `dir`
pub fn load_dir(dir: &Path) -> Result<ResultSet, LoadError> {
    if !dir.is_dir() {
        return Err(LoadError::DirectoryNotFound(dir.to_path_buf()));
    }

    let entries = fs::read_dir(dir).map_err(|e| LoadError::Io {
        path: dir.to_path_buf(),
        source: e,
    })?;

    let mut paths: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
        })
        .collect();
    paths.sort();

    let mut set = ResultSet::default();

    for path in paths {
        tracing::info!("Loading {}", path.display());

        match load_file(&path) {
            Ok(parsed) => {
                set.rejected.extend(parsed.rejected);
                if !parsed.records.is_empty() {
                    let name = path
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_default();
                    set.files.push(ResultFile {
                        name,
                        records: parsed.records,
                    });
                }
            }
            Err(e) => {
                tracing::warn!("Skipping file: {}", e);
                set.rejected.push(e);
            }
        }
    }

    Ok(set)
}

impl RawRecord {
    fn into_record(self, path: &Path, index: usize) -> Result<MeasurementRecord, LoadError> {
        let missing = |field: &'static str| LoadError::MissingField {
            path: path.to_path_buf(),
            index,
            field,
        };
        let invalid = |field: &'static str, reason: String| LoadError::InvalidField {
            path: path.to_path_buf(),
            index,
            field,
            reason,
        };
        let count = |field: &'static str, value: Option<Value>, default: u32| match value {
            None | Some(Value::Null) => Ok(default),
            Some(v) => as_u32(&v).ok_or_else(|| invalid(field, format!("expected a count, got {}", v))),
        };

        let benchmark = self.benchmark.ok_or_else(|| missing("benchmark"))?;
        let mode = self.mode.ok_or_else(|| missing("mode"))?;
        let metric = self
            .primary_metric
            .ok_or_else(|| missing("primaryMetric.score"))?;

        let score = match metric.score {
            None | Some(Value::Null) => return Err(missing("primaryMetric.score")),
            Some(v) => match as_f64(&v) {
                Some(score) if score.is_finite() => score,
                _ => {
                    return Err(invalid(
                        "primaryMetric.score",
                        format!("expected a finite number, got {}", v),
                    ))
                }
            },
        };

        // Non-finite errors ("NaN" for single-iteration runs) carry no information
        let score_error = match metric.score_error.as_ref().and_then(as_f64) {
            Some(e) if e.is_finite() && e < 0.0 => {
                return Err(invalid(
                    "primaryMetric.scoreError",
                    format!("must be non-negative, got {}", e),
                ))
            }
            Some(e) if e.is_finite() => e,
            _ => 0.0,
        };

        let score_confidence = metric.score_confidence.and_then(|bounds| match bounds.as_slice() {
            [low, high] => match (as_f64(low), as_f64(high)) {
                (Some(low), Some(high)) if low.is_finite() && high.is_finite() => Some([low, high]),
                _ => None,
            },
            _ => None,
        });

        let params = self
            .params
            .unwrap_or_default()
            .into_iter()
            .map(|(key, value)| {
                let value = match value {
                    Value::String(s) => s,
                    other => other.to_string(),
                };
                (key, value)
            })
            .collect();

        Ok(MeasurementRecord {
            benchmark,
            mode,
            threads: count("threads", self.threads, 1)?,
            forks: count("forks", self.forks, 1)?,
            warmup_iterations: count("warmupIterations", self.warmup_iterations, 0)?,
            warmup_time: self.warmup_time.unwrap_or_default(),
            measurement_iterations: count("measurementIterations", self.measurement_iterations, 0)?,
            measurement_time: self.measurement_time.unwrap_or_default(),
            score,
            score_error,
            score_unit: metric.score_unit.unwrap_or_default(),
            score_confidence,
            secondary_metrics: Passthrough::new(
                self.secondary_metrics
                    .unwrap_or_else(|| Value::Object(Default::default())),
            ),
            params,
            jvm: self.jvm.unwrap_or_default(),
            jvm_args: self.jvm_args.unwrap_or_default(),
            jdk: self.jdk.or(self.jdk_version).unwrap_or_default(),
            vm_name: self.vm_name.unwrap_or_default(),
            vm_version: self.vm_version.unwrap_or_default(),
        })
    }
}

/// Number or numeric string (`"NaN"`, `"1.5"`) as f64
fn as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

fn as_u32(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse::<u32>().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const JMH_SAMPLE: &str = r#"[
        {
            "jmhVersion": "1.37",
            "benchmark": "org.example.MapBench.get",
            "mode": "thrpt",
            "threads": 1,
            "forks": 2,
            "jvm": "/usr/lib/jvm/java-17/bin/java",
            "jvmArgs": ["-Xmx2g", "-XX:+UseG1GC"],
            "jdkVersion": "17.0.9",
            "vmName": "OpenJDK 64-Bit Server VM",
            "vmVersion": "17.0.9+9",
            "warmupIterations": 5,
            "warmupTime": "10 s",
            "measurementIterations": 5,
            "measurementTime": "10 s",
            "params": {"size": "1024", "loadFactor": 0.75},
            "primaryMetric": {
                "score": 1523.4,
                "scoreError": 12.5,
                "scoreConfidence": [1510.9, 1535.9],
                "scoreUnit": "ops/ms",
                "rawData": [[1520.0, 1530.0]]
            },
            "secondaryMetrics": {"·gc.alloc.rate": {"score": 0.01, "scoreUnit": "MB/sec"}}
        },
        {
            "benchmark": "org.example.MapBench.put",
            "mode": "avgt",
            "measurementIterations": 1,
            "primaryMetric": {"score": 42.0, "scoreError": "NaN", "scoreConfidence": ["NaN", "NaN"], "scoreUnit": "ns/op"}
        }
    ]"#;

    fn path() -> PathBuf {
        PathBuf::from("baseline/run.json")
    }

    #[test]
    fn test_parse_jmh_sample() {
        let parsed = parse_results(JMH_SAMPLE, &path()).unwrap();
        assert!(parsed.rejected.is_empty());
        assert_eq!(parsed.records.len(), 2);

        let get = &parsed.records[0];
        assert_eq!(get.benchmark, "org.example.MapBench.get");
        assert_eq!(get.forks, 2);
        assert_eq!(get.jdk, "17.0.9");
        assert_eq!(get.jvm_args, vec!["-Xmx2g", "-XX:+UseG1GC"]);
        assert_eq!(get.score_unit, "ops/ms");
        assert_eq!(get.score_confidence, Some([1510.9, 1535.9]));
        assert_eq!(get.params.get("loadFactor").map(String::as_str), Some("0.75"));
        assert!(!get.secondary_metrics.is_empty());
    }

    #[test]
    fn test_parse_defaults_and_nan_error() {
        let parsed = parse_results(JMH_SAMPLE, &path()).unwrap();
        let put = &parsed.records[1];

        assert_eq!(put.threads, 1);
        assert_eq!(put.forks, 1);
        assert_eq!(put.warmup_iterations, 0);
        assert_eq!(put.measurement_iterations, 1);
        assert_eq!(put.score_error, 0.0);
        assert_eq!(put.score_confidence, None);
        assert!(put.params.is_empty());
        assert!(put.jvm_args.is_empty());
        assert_eq!(put.secondary_metrics.as_json(), &serde_json::json!({}));
    }

    #[test]
    fn test_both_jdk_keys_prefer_jdk() {
        let json = r#"[{
            "benchmark": "A",
            "mode": "thrpt",
            "jdk": "21.0.1",
            "jdkVersion": "21.0.1+12",
            "primaryMetric": {"score": 1.0}
        }]"#;
        let parsed = parse_results(json, &path()).unwrap();

        assert!(parsed.rejected.is_empty());
        assert_eq!(parsed.records[0].jdk, "21.0.1");
    }

    #[test]
    fn test_missing_required_field_rejects_record_only() {
        let json = r#"[
            {"benchmark": "A", "mode": "thrpt", "primaryMetric": {"score": 1.0}},
            {"benchmark": "B", "primaryMetric": {"score": 1.0}},
            {"benchmark": "C", "mode": "thrpt"}
        ]"#;
        let parsed = parse_results(json, &path()).unwrap();

        assert_eq!(parsed.records.len(), 1);
        assert_eq!(parsed.rejected.len(), 2);
        assert!(matches!(
            parsed.rejected[0],
            LoadError::MissingField { field: "mode", index: 1, .. }
        ));
        assert!(matches!(
            parsed.rejected[1],
            LoadError::MissingField { field: "primaryMetric.score", index: 2, .. }
        ));
    }

    #[test]
    fn test_negative_error_is_invalid() {
        let json = r#"[{"benchmark": "A", "mode": "thrpt", "primaryMetric": {"score": 1.0, "scoreError": -0.5}}]"#;
        let parsed = parse_results(json, &path()).unwrap();
        assert!(parsed.records.is_empty());
        assert!(matches!(
            parsed.rejected[0],
            LoadError::InvalidField { field: "primaryMetric.scoreError", .. }
        ));
    }

    #[test]
    fn test_wrong_type_is_invalid_record() {
        let json = r#"[{"benchmark": 7, "mode": "thrpt", "primaryMetric": {"score": 1.0}}]"#;
        let parsed = parse_results(json, &path()).unwrap();
        assert!(matches!(
            parsed.rejected[0],
            LoadError::InvalidField { field: "record", .. }
        ));
    }

    #[test]
    fn test_malformed_file() {
        assert!(matches!(
            parse_results("{not json", &path()),
            Err(LoadError::Malformed { .. })
        ));
        assert!(matches!(
            parse_results(r#"{"benchmark": "A"}"#, &path()),
            Err(LoadError::Malformed { .. })
        ));
    }

    #[test]
    fn test_load_dir_missing() {
        let err = load_dir(Path::new("/definitely/not/here")).unwrap_err();
        assert!(matches!(err, LoadError::DirectoryNotFound(_)));
        assert!(err.to_string().contains("/definitely/not/here"));
    }

    #[test]
    fn test_load_dir_skips_bad_files_and_orders_by_name() {
        let dir = tempfile::tempdir().unwrap();
        let write = |name: &str, contents: &str| {
            let mut f = fs::File::create(dir.path().join(name)).unwrap();
            f.write_all(contents.as_bytes()).unwrap();
        };

        write("b.json", r#"[{"benchmark": "B", "mode": "thrpt", "primaryMetric": {"score": 2.0}}]"#);
        write("a.json", r#"[{"benchmark": "A", "mode": "thrpt", "primaryMetric": {"score": 1.0}}]"#);
        write("broken.json", "[{");
        write("empty.json", "[]");
        write("notes.txt", "ignored");

        let set = load_dir(dir.path()).unwrap();
        assert_eq!(set.file_count(), 2);
        assert_eq!(set.record_count(), 2);
        assert_eq!(set.rejected().len(), 1);
        assert_eq!(set.files()[0].name, "a.json");

        let names: Vec<&str> = set.records().map(|r| r.benchmark.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);
    }
}
