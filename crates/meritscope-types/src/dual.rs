//! Dual vector and diagonal penalty snapshot for one outer iteration.

use serde::{Deserialize, Serialize};

use crate::error::{VizError, VizResult};
use crate::NUM_CONSTRAINTS;

/// Immutable `(λ, Σ)` pair, one component per constraint
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DualState {
    lambda: [f64; NUM_CONSTRAINTS],
    sigma: [f64; NUM_CONSTRAINTS],
}

impl DualState {
    pub const fn new(lambda: [f64; NUM_CONSTRAINTS], sigma: [f64; NUM_CONSTRAINTS]) -> Self {
        Self { lambda, sigma }
    }

    /// Build from arbitrary-length slices, failing unless both have exactly
    /// two components.
    pub fn from_slices(lambda: &[f64], sigma: &[f64]) -> VizResult<Self> {
        Ok(Self {
            lambda: exactly_two("dual vector λ", lambda)?,
            sigma: exactly_two("penalty vector Σ", sigma)?,
        })
    }

    pub fn lambda(&self) -> [f64; NUM_CONSTRAINTS] {
        self.lambda
    }

    pub fn sigma(&self) -> [f64; NUM_CONSTRAINTS] {
        self.sigma
    }

    /// `λ ⊘ Σ`, the shift applied to the constraint values before projection.
    ///
    /// A zero penalty weight yields an infinite or NaN shift.
    pub fn shift(&self) -> [f64; NUM_CONSTRAINTS] {
        [
            self.lambda[0] / self.sigma[0],
            self.lambda[1] / self.sigma[1],
        ]
    }
}

impl Default for DualState {
    fn default() -> Self {
        Self::new([0.0, 0.0], [1.0, 1.0])
    }
}

fn exactly_two(context: &str, values: &[f64]) -> VizResult<[f64; NUM_CONSTRAINTS]> {
    <[f64; NUM_CONSTRAINTS]>::try_from(values).map_err(|_| {
        VizError::dimension_mismatch(
            context,
            format!("{} components", NUM_CONSTRAINTS),
            format!("{} components", values.len()),
        )
    })
}
