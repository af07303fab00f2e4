//! Error taxonomy shared by every meritscope crate.
//!
//! None of these are recoverable: the tools stop before producing a
//! misleading plot. The one tolerated mismatch (runs of different length)
//! is not an error at all and never shows up here.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by sampling, merit evaluation and trace handling
#[derive(Debug, Clone, PartialEq, Error)]
pub enum VizError {
    /// Bad sampling bounds or step size
    #[error("Invalid domain: {reason}")]
    InvalidDomain { reason: String },

    /// Dual/penalty vectors or coordinate arrays with the wrong shape
    #[error("Dimension mismatch in {context}: expected {expected}, got {got}")]
    DimensionMismatch {
        context: String,
        expected: String,
        got: String,
    },

    /// A trace iteration record is missing required fields
    #[error("{}", malformed_message(.index, .reason))]
    MalformedRecord {
        index: Option<usize>,
        reason: String,
    },

    /// Trace source missing, unreadable or undecodable
    #[error("Trace unavailable at '{}': {reason}", .path.display())]
    TraceUnavailable { path: PathBuf, reason: String },
}

fn malformed_message(index: &Option<usize>, reason: &str) -> String {
    match index {
        Some(i) => format!("Malformed record at iteration {}: {}", i, reason),
        None => format!("Malformed record: {}", reason),
    }
}

impl VizError {
    pub fn invalid_domain(reason: impl Into<String>) -> Self {
        VizError::InvalidDomain {
            reason: reason.into(),
        }
    }

    pub fn dimension_mismatch(
        context: impl Into<String>,
        expected: impl Into<String>,
        got: impl Into<String>,
    ) -> Self {
        VizError::DimensionMismatch {
            context: context.into(),
            expected: expected.into(),
            got: got.into(),
        }
    }

    pub fn malformed(reason: impl Into<String>) -> Self {
        VizError::MalformedRecord {
            index: None,
            reason: reason.into(),
        }
    }

    /// Attach the outer-iteration index to a record error.
    ///
    /// Other variants pass through untouched, and an index already present
    /// is kept.
    pub fn at_iteration(self, iteration: usize) -> Self {
        match self {
            VizError::MalformedRecord { index: None, reason } => VizError::MalformedRecord {
                index: Some(iteration),
                reason,
            },
            other => other,
        }
    }
}

pub type VizResult<T> = Result<T, VizError>;
