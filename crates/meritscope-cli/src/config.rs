//! Figure configuration
//!
//! Every field has a default reproducing the reference experiment, so a
//! config file only needs the values it changes. YAML or JSON, chosen by
//! file extension.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use meritscope_numerical::{levels, ProblemKind};
use meritscope_render::PlanOptions;
use meritscope_types::{BoxConstraint, Domain, VizResult};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// `arange(start, stop, step)` contour levels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LevelRange {
    pub start: f64,
    pub stop: f64,
    pub step: f64,
}

impl LevelRange {
    pub fn to_levels(&self) -> VizResult<Vec<f64>> {
        levels(self.start, self.stop, self.step)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VizConfig {
    pub xlim: [f64; 2],
    pub ylim: [f64; 2],
    /// Grid spacing for every sampled field
    pub step: f64,
    /// Levels for the plain objective
    pub levels: LevelRange,
    /// Levels used instead when the merit field is shown
    pub merit_levels: LevelRange,
    pub show_merit_field: bool,
    pub bounds: BoxConstraint,
    pub problem: ProblemKind,
    /// Row labels, one per compared run
    pub labels: [String; 2],
    pub figure_size: [u32; 2],
}

impl Default for VizConfig {
    fn default() -> Self {
        Self {
            xlim: [0.0, 5.0],
            ylim: [0.0, 5.0],
            step: 0.025,
            levels: LevelRange {
                start: 0.0,
                stop: 12.0,
                step: 0.25,
            },
            merit_levels: LevelRange {
                start: 0.0,
                stop: 100.0,
                step: 0.25,
            },
            show_merit_field: false,
            bounds: BoxConstraint::default(),
            problem: ProblemKind::default(),
            labels: ["PANOC + L-BFGS".to_string(), "2nd order PANOC".to_string()],
            figure_size: [2400, 1350],
        }
    }
}

impl VizConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json(&content),
            _ => Self::from_yaml(&content),
        }
    }

    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn domain(&self) -> Domain {
        Domain::new(self.xlim.into(), self.ylim.into())
    }

    /// Level set matching the field being drawn.
    pub fn active_levels(&self) -> VizResult<Vec<f64>> {
        if self.show_merit_field {
            self.merit_levels.to_levels()
        } else {
            self.levels.to_levels()
        }
    }

    pub fn plan_options(&self) -> PlanOptions {
        PlanOptions {
            show_merit_field: self.show_merit_field,
            step: self.step,
        }
    }
}
