//! Shape of a trace document.
//!
//! Every field is optional at this layer: a record missing its trajectory or
//! its duals still decodes, and [`crate::normalize`] reports what is wrong
//! with it. Unknown fields (step sizes, residual norms, ...) are ignored.

use serde::{Deserialize, Serialize};

/// One inner-solver iterate
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InnerIterate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<Vec<f64>>,
}

impl InnerIterate {
    pub fn at(x: f64, y: f64) -> Self {
        Self {
            x: Some(vec![x, y]),
        }
    }
}

/// One outer iteration of a solver run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IterationRecord {
    /// Inner-solver trajectory, stored under the solver's name
    #[serde(rename = "PANOC", alias = "inner", default, skip_serializing_if = "Option::is_none")]
    pub inner: Option<Vec<InnerIterate>>,

    /// Dual vector λ
    #[serde(rename = "y", alias = "lambda", default, skip_serializing_if = "Option::is_none")]
    pub lambda: Option<Vec<f64>>,

    /// Diagonal of the penalty matrix Σ
    #[serde(
        rename = "Σ",
        alias = "Sigma",
        alias = "sigma",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub sigma: Option<Vec<f64>>,
}

/// Ordered outer iterations of one solver variant
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OptimizerRun {
    pub label: String,
    pub records: Vec<IterationRecord>,
}

impl OptimizerRun {
    pub fn new(label: impl Into<String>, records: Vec<IterationRecord>) -> Self {
        Self {
            label: label.into(),
            records,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, iteration: usize) -> Option<&IterationRecord> {
        self.records.get(iteration)
    }
}
