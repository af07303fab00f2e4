//! Trace Normalizer
//!
//! Pulls the plottable parts out of one iteration record: the inner
//! trajectory (order preserved) and the `(λ, Σ)` snapshot.

use tracing::debug;

use meritscope_types::{DualState, VizError, VizResult};

use crate::record::{IterationRecord, OptimizerRun};

/// Plot-ready view of one outer iteration
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedIteration {
    pub trajectory: Vec<[f64; 2]>,
    pub dual: DualState,
}

impl NormalizedIteration {
    pub fn inner_iterations(&self) -> usize {
        self.trajectory.len()
    }

    pub fn last_iterate(&self) -> Option<[f64; 2]> {
        self.trajectory.last().copied()
    }
}

pub fn normalize(record: &IterationRecord) -> VizResult<NormalizedIteration> {
    let inner = match &record.inner {
        Some(entries) if !entries.is_empty() => entries,
        Some(_) => return Err(VizError::malformed("inner-solver trajectory is empty")),
        None => return Err(VizError::malformed("inner-solver trajectory is missing")),
    };

    let trajectory = inner
        .iter()
        .enumerate()
        .map(|(k, entry)| match entry.x.as_deref() {
            Some(&[x, y]) => Ok([x, y]),
            Some(other) => Err(VizError::malformed(format!(
                "inner iterate {} has {} coordinates, expected 2",
                k,
                other.len()
            ))),
            None => Err(VizError::malformed(format!(
                "inner iterate {} has no position 'x'",
                k
            ))),
        })
        .collect::<VizResult<Vec<_>>>()?;

    let lambda = record
        .lambda
        .as_deref()
        .ok_or_else(|| VizError::malformed("dual vector 'y' is missing"))?;
    let sigma = record
        .sigma
        .as_deref()
        .ok_or_else(|| VizError::malformed("penalty vector 'Σ' is missing"))?;
    let dual = DualState::from_slices(lambda, sigma).map_err(|err| VizError::malformed(err.to_string()))?;

    Ok(NormalizedIteration { trajectory, dual })
}

/// Normalize every record of a run, tagging failures with their iteration.
pub fn normalize_run(run: &OptimizerRun) -> VizResult<Vec<NormalizedIteration>> {
    let normalized = run
        .records
        .iter()
        .enumerate()
        .map(|(i, record)| normalize(record).map_err(|err| err.at_iteration(i)))
        .collect::<VizResult<Vec<_>>>()?;

    debug!(
        run = %run.label,
        iterations = normalized.len(),
        inner_total = normalized.iter().map(|n| n.inner_iterations()).sum::<usize>(),
        "normalized run"
    );
    Ok(normalized)
}
