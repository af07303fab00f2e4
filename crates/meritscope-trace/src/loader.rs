//! Reading trace documents from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;
use tracing::info;

use meritscope_types::{VizError, VizResult};

use crate::record::{IterationRecord, OptimizerRun};

/// Encoding of a trace document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceFormat {
    Yaml,
    Json,
}

impl TraceFormat {
    /// `.json` files are JSON, everything else is read as YAML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => TraceFormat::Json,
            _ => TraceFormat::Yaml,
        }
    }
}

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Decode a sequence of iteration records.
pub fn decode_records(text: &str, format: TraceFormat) -> Result<Vec<IterationRecord>, DecodeError> {
    let records = match format {
        TraceFormat::Yaml => serde_yaml::from_str(text)?,
        TraceFormat::Json => serde_json::from_str(text)?,
    };
    Ok(records)
}

/// Load one solver run. A missing, unreadable or undecodable file is fatal.
pub fn load_run(path: impl AsRef<Path>, label: impl Into<String>) -> VizResult<OptimizerRun> {
    let path = path.as_ref();
    let unavailable = |reason: String| VizError::TraceUnavailable {
        path: path.to_path_buf(),
        reason,
    };

    let text = fs::read_to_string(path).map_err(|err| unavailable(err.to_string()))?;
    let records = decode_records(&text, TraceFormat::from_path(path)).map_err(|err| unavailable(err.to_string()))?;

    let run = OptimizerRun::new(label, records);
    info!(path = %path.display(), run = %run.label, iterations = run.len(), "loaded trace");
    Ok(run)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const YAML_TRACE: &str = "\
- PANOC:
    - x: [1.0, 1.0]
      γ: 0.5
    - x: [1.2, 0.9]
  y: [0.0, 0.0]
  Σ: [1.0, 1.0]
- PANOC:
    - x: [1.2, 0.9]
  y: [0.3, 0.0]
  Σ: [10.0, 10.0]
";

    fn temp_trace(suffix: &str, contents: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(TraceFormat::from_path(Path::new("/tmp/1.yaml")), TraceFormat::Yaml);
        assert_eq!(TraceFormat::from_path(Path::new("run.JSON")), TraceFormat::Json);
        assert_eq!(TraceFormat::from_path(Path::new("trace")), TraceFormat::Yaml);
    }

    #[test]
    fn test_decode_yaml() {
        let records = decode_records(YAML_TRACE, TraceFormat::Yaml).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].inner.as_ref().map(Vec::len), Some(2));
        assert_eq!(records[1].lambda, Some(vec![0.3, 0.0]));
        assert_eq!(records[1].sigma, Some(vec![10.0, 10.0]));
    }

    #[test]
    fn test_load_yaml_run() {
        let file = temp_trace(".yaml", YAML_TRACE);
        let run = load_run(file.path(), "PANOC + L-BFGS").unwrap();
        assert_eq!(run.label, "PANOC + L-BFGS");
        assert_eq!(run.len(), 2);
    }

    #[test]
    fn test_load_json_run() {
        let file = temp_trace(".json", r#"[{"PANOC": [{"x": [0.5, 0.5]}], "y": [0, 0], "Σ": [1, 1]}]"#);
        let run = load_run(file.path(), "2nd order PANOC").unwrap();
        assert_eq!(run.len(), 1);
        assert_eq!(run.records[0].lambda, Some(vec![0.0, 0.0]));
    }

    #[test]
    fn test_missing_file_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.yaml");
        let err = load_run(&path, "run").unwrap_err();
        match err {
            VizError::TraceUnavailable { path: p, .. } => assert_eq!(p, path),
            other => panic!("Expected TraceUnavailable, got {:?}", other),
        }
    }

    #[test]
    fn test_undecodable_file_is_unavailable() {
        let file = temp_trace(".yaml", "PANOC: [not, a, sequence, of, records");
        assert!(matches!(
            load_run(file.path(), "run"),
            Err(VizError::TraceUnavailable { .. })
        ));
    }
}
