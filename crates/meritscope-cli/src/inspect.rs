//! Per-iteration summary of one trace, for the `inspect` command

use serde::{Deserialize, Serialize};

use meritscope_trace::{normalize_run, OptimizerRun};
use meritscope_types::VizResult;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IterationSummary {
    pub iteration: usize,
    pub inner_iterations: usize,
    pub lambda: [f64; 2],
    pub sigma: [f64; 2],
    pub final_iterate: [f64; 2],
}

pub fn summarize(run: &OptimizerRun) -> VizResult<Vec<IterationSummary>> {
    let normalized = normalize_run(run)?;
    Ok(normalized
        .into_iter()
        .enumerate()
        .map(|(iteration, n)| IterationSummary {
            iteration,
            inner_iterations: n.inner_iterations(),
            lambda: n.dual.lambda(),
            sigma: n.dual.sigma(),
            // normalize() rejects empty trajectories
            final_iterate: n.last_iterate().unwrap_or([f64::NAN, f64::NAN]),
        })
        .collect())
}

pub fn format_summary(summary: &IterationSummary) -> String {
    format!(
        "  [{}] inner it: {:>4}  λ = [{:.4}, {:.4}]  Σ = [{:.2}, {:.2}]  x = ({:.4}, {:.4})",
        summary.iteration,
        summary.inner_iterations,
        summary.lambda[0],
        summary.lambda[1],
        summary.sigma[0],
        summary.sigma[1],
        summary.final_iterate[0],
        summary.final_iterate[1],
    )
}
