//! Function Library
//!
//! Scalar functions of two real variables. Everything here is pure; the
//! array helpers apply the same scalar rule elementwise so that a single
//! point and a full grid go through identical arithmetic.

use ndarray::{Array, ArrayBase, Data, Dimension, Zip};
use serde::{Deserialize, Serialize};

use meritscope_types::{VizError, VizResult};

/// A scalar function `(x, y) -> z`
pub trait Field2 {
    fn eval(&self, x: f64, y: f64) -> f64;

    /// Apply elementwise over two arrays of identical shape.
    fn eval_array<S, T, D>(&self, x: &ArrayBase<S, D>, y: &ArrayBase<T, D>) -> VizResult<Array<f64, D>>
    where
        S: Data<Elem = f64>,
        T: Data<Elem = f64>,
        D: Dimension,
    {
        if x.shape() != y.shape() {
            return Err(VizError::dimension_mismatch(
                "function arguments",
                format!("y of shape {:?}", x.shape()),
                format!("{:?}", y.shape()),
            ));
        }
        Ok(Zip::from(x).and(y).map_collect(|&a, &b| self.eval(a, b)))
    }
}

impl<F> Field2 for F
where
    F: Fn(f64, f64) -> f64,
{
    #[inline]
    fn eval(&self, x: f64, y: f64) -> f64 {
        self(x, y)
    }
}

// ============================================================================
// Fixed problem functions
// ============================================================================

/// `f(x, y) = x⁴/48 − 2xy + x²y⁴/24 + 10`
pub fn objective(x: f64, y: f64) -> f64 {
    x.powi(4) / 48.0 - 2.0 * x * y + x.powi(2) * y.powi(4) / 24.0 + 10.0
}

/// `g1(x, y) = −4x² + x²y²/4`
pub fn g1(x: f64, y: f64) -> f64 {
    -4.0 * x.powi(2) + 0.25 * x.powi(2) * y.powi(2)
}

/// `g2(x, y) = x⁴/8 − xy`
pub fn g2(x: f64, y: f64) -> f64 {
    0.125 * x.powi(4) - y * x
}

/// Convex quadratic `4x² − 4xy + 3y²`, an alternative objective for the same
/// constraints.
pub fn quadratic_objective(x: f64, y: f64) -> f64 {
    const A11: f64 = 4.0;
    const A12: f64 = -2.0;
    const A22: f64 = 3.0;
    x * x * A11 + 2.0 * x * y * A12 + y * y * A22
}

// ============================================================================
// Problem
// ============================================================================

/// Named problem presets, selectable from configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProblemKind {
    #[default]
    Quartic,
    Quadratic,
}

/// One objective and exactly two inequality constraints `g(x, y) ∈ box`
#[derive(Debug, Clone, Copy)]
pub struct Problem {
    pub objective: fn(f64, f64) -> f64,
    pub constraints: [fn(f64, f64) -> f64; 2],
}

impl Problem {
    pub fn quartic() -> Self {
        Self {
            objective,
            constraints: [g1, g2],
        }
    }

    pub fn quadratic() -> Self {
        Self {
            objective: quadratic_objective,
            constraints: [g1, g2],
        }
    }

    pub fn from_kind(kind: ProblemKind) -> Self {
        match kind {
            ProblemKind::Quartic => Self::quartic(),
            ProblemKind::Quadratic => Self::quadratic(),
        }
    }

    pub fn objective_at(&self, x: f64, y: f64) -> f64 {
        (self.objective)(x, y)
    }

    pub fn constraints_at(&self, x: f64, y: f64) -> [f64; 2] {
        [(self.constraints[0])(x, y), (self.constraints[1])(x, y)]
    }
}

impl Default for Problem {
    fn default() -> Self {
        Self::quartic()
    }
}
