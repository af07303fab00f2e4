//! Box-Constrained Merit Evaluator
//!
//! Projected quadratic-penalty augmented Lagrangian
//!
//! ```text
//! ζ = g(x, y) + λ ⊘ Σ
//! ẑ = clamp(ζ, lower, upper)
//! d = ζ − ẑ
//! ψ(x, y) = f(x, y) + ½ dᵀ Σ d
//! ```
//!
//! `d` vanishes wherever the shifted constraint lies inside the box, so ψ
//! coincides with the objective there and grows quadratically outside.

use ndarray::{Array, ArrayBase, Axis, Data, Dimension, Zip};
use tracing::debug;

use meritscope_types::{BoxConstraint, Domain, DualState, ScalarField2D, VizError, VizResult};

use crate::broadcast::{stack_components, tile};
use crate::functions::{Field2, Problem};
use crate::grid::{arange, meshgrid};

#[derive(Debug, Clone, Copy, Default)]
pub struct MeritFunction {
    problem: Problem,
    bounds: BoxConstraint,
}

impl MeritFunction {
    pub fn new(problem: Problem, bounds: BoxConstraint) -> Self {
        Self { problem, bounds }
    }

    pub fn problem(&self) -> &Problem {
        &self.problem
    }

    pub fn bounds(&self) -> &BoxConstraint {
        &self.bounds
    }

    // ========================================================================
    // Single point
    // ========================================================================

    /// ψ at one point, with λ and Σ given as raw slices.
    pub fn value_at(&self, x: f64, y: f64, lambda: &[f64], sigma: &[f64]) -> VizResult<f64> {
        let dual = DualState::from_slices(lambda, sigma)?;
        Ok(self.value(x, y, &dual))
    }

    pub fn value(&self, x: f64, y: f64, dual: &DualState) -> f64 {
        self.problem.objective_at(x, y) + self.penalty(x, y, dual)
    }

    /// The term `½ dᵀ Σ d` alone.
    pub fn penalty(&self, x: f64, y: f64, dual: &DualState) -> f64 {
        let d = self.residual(x, y, dual);
        let sigma = dual.sigma();
        let y_hat = [sigma[0] * d[0], sigma[1] * d[1]];
        0.5 * (d[0] * y_hat[0] + d[1] * y_hat[1])
    }

    /// `d = ζ − clamp(ζ)` at one point.
    pub fn residual(&self, x: f64, y: f64, dual: &DualState) -> [f64; 2] {
        let g = self.problem.constraints_at(x, y);
        let shift = dual.shift();
        self.bounds.residual([g[0] + shift[0], g[1] + shift[1]])
    }

    // ========================================================================
    // Arrays
    // ========================================================================

    /// ψ elementwise over matching-shape coordinate arrays.
    pub fn evaluate<S, T, D>(
        &self,
        x: &ArrayBase<S, D>,
        y: &ArrayBase<T, D>,
        lambda: &[f64],
        sigma: &[f64],
    ) -> VizResult<Array<f64, D>>
    where
        S: Data<Elem = f64>,
        T: Data<Elem = f64>,
        D: Dimension,
    {
        let dual = DualState::from_slices(lambda, sigma)?;
        self.evaluate_dual(x, y, &dual)
    }

    pub fn evaluate_dual<S, T, D>(
        &self,
        x: &ArrayBase<S, D>,
        y: &ArrayBase<T, D>,
        dual: &DualState,
    ) -> VizResult<Array<f64, D>>
    where
        S: Data<Elem = f64>,
        T: Data<Elem = f64>,
        D: Dimension,
    {
        if x.shape() != y.shape() {
            return Err(VizError::dimension_mismatch(
                "merit arguments",
                format!("y of shape {:?}", x.shape()),
                format!("{:?}", y.shape()),
            ));
        }
        let shape = x.shape().to_vec();

        let f = self.problem.objective.eval_array(x, y)?;
        let g1 = self.problem.constraints[0].eval_array(x, y)?;
        let g2 = self.problem.constraints[1].eval_array(x, y)?;

        // (2, shape...) arrays, leading axis = constraint index
        let zeta = stack_components([g1.view().into_dyn(), g2.view().into_dyn()])?
            + tile(dual.shift(), &shape);
        let upper = tile(self.bounds.upper(), &shape);
        let lower = tile(self.bounds.lower(), &shape);
        let z_hat = Zip::from(&zeta)
            .and(&upper)
            .and(&lower)
            .map_collect(|&z, &u, &l| z.min(u).max(l));
        let d = &zeta - &z_hat;
        let y_hat = tile(dual.sigma(), &shape) * &d;

        let penalty = (&d.index_axis(Axis(0), 0) * &y_hat.index_axis(Axis(0), 0)
            + &d.index_axis(Axis(0), 1) * &y_hat.index_axis(Axis(0), 1))
            * 0.5;

        (f.into_dyn() + penalty)
            .into_dimensionality::<D>()
            .map_err(|err| VizError::dimension_mismatch("merit result", format!("{:?}", shape), err.to_string()))
    }

    /// Sample ψ over `domain` for one dual snapshot.
    pub fn sample(&self, domain: &Domain, step: f64, dual: &DualState) -> VizResult<ScalarField2D> {
        domain.validate()?;
        let xs = arange(domain.x, step)?;
        let ys = arange(domain.y, step)?;
        let (x, y) = meshgrid(&xs, &ys);
        let z = self.evaluate_dual(&x, &y, dual)?;

        debug!(
            lambda = ?dual.lambda(),
            sigma = ?dual.sigma(),
            rows = ys.len(),
            cols = xs.len(),
            "sampled merit field"
        );
        ScalarField2D::new(x, y, z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::functions::{g2, objective};
    use approx::assert_relative_eq;
    use ndarray::{array, Array2};
    use proptest::prelude::*;

    fn merit() -> MeritFunction {
        MeritFunction::default()
    }

    #[test]
    fn test_value_at_2_2_hand_computed() {
        // ζ = [-12, -2] lies inside (-inf, -1] × (-inf, 0]: nothing active
        let psi = merit().value_at(2.0, 2.0, &[0.0, 0.0], &[1.0, 1.0]).unwrap();
        assert_eq!(psi, objective(2.0, 2.0));
    }

    #[test]
    fn test_value_with_both_constraints_active() {
        // λ/Σ = [20, 4] pushes ζ to [8, 2]: d = [9, 2]
        let dual = DualState::new([20.0, 4.0], [1.0, 1.0]);
        let psi = merit().value(2.0, 2.0, &dual);
        assert_relative_eq!(psi, objective(2.0, 2.0) + 0.5 * (81.0 + 4.0), epsilon = 1e-12);
        assert_eq!(merit().residual(2.0, 2.0, &dual), [9.0, 2.0]);
    }

    #[test]
    fn test_penalty_scales_with_sigma() {
        // λ = 0, g2(3, 1) = 81/8 - 3 = 7.125 > 0
        let m = merit();
        let one = m.penalty(3.0, 1.0, &DualState::new([0.0, 0.0], [1.0, 1.0]));
        let ten = m.penalty(3.0, 1.0, &DualState::new([0.0, 0.0], [10.0, 10.0]));
        assert!(one > 0.0);
        assert_relative_eq!(ten, 10.0 * one, max_relative = 1e-12);
    }

    #[test]
    fn test_value_at_rejects_bad_duals() {
        let m = merit();
        assert!(matches!(
            m.value_at(1.0, 1.0, &[0.0], &[1.0, 1.0]),
            Err(VizError::DimensionMismatch { .. })
        ));
        assert!(matches!(
            m.value_at(1.0, 1.0, &[0.0, 0.0], &[1.0, 1.0, 1.0]),
            Err(VizError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_evaluate_matches_pointwise() {
        let x = array![[0.5, 2.0, 3.0], [1.0, 2.5, 4.0]];
        let y = array![[0.1, 2.0, 1.0], [4.5, 0.2, 3.0]];
        let lambda = [3.0, 0.5];
        let sigma = [2.0, 5.0];
        let dual = DualState::new(lambda, sigma);

        let psi = merit().evaluate(&x, &y, &lambda, &sigma).unwrap();
        assert_eq!(psi.dim(), (2, 3));
        for ((&a, &b), &v) in x.iter().zip(y.iter()).zip(psi.iter()) {
            assert_relative_eq!(v, merit().value(a, b, &dual), max_relative = 1e-12);
        }
    }

    #[test]
    fn test_evaluate_one_dimensional() {
        let x = array![2.0, 3.0];
        let y = array![2.0, 1.0];
        let psi = merit().evaluate(&x, &y, &[0.0, 0.0], &[1.0, 1.0]).unwrap();
        assert_eq!(psi[0], objective(2.0, 2.0));
        assert!(psi[1] > objective(3.0, 1.0));
    }

    #[test]
    fn test_evaluate_rejects_shape_mismatch() {
        let x = Array2::<f64>::zeros((2, 2));
        let y = Array2::<f64>::zeros((2, 3));
        assert!(matches!(
            merit().evaluate(&x, &y, &[0.0, 0.0], &[1.0, 1.0]),
            Err(VizError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_sample_shape() {
        let field = merit()
            .sample(&Domain::default(), 0.5, &DualState::default())
            .unwrap();
        assert_eq!(field.shape(), (10, 10));
        // g(0, 0) = [0, 0]: g1 violates its bound of -1 by 1
        assert_eq!(field.z()[[0, 0]], objective(0.0, 0.0) + 0.5);
    }

    #[test]
    fn test_continuous_across_boundary() {
        // At x = 2, g2 = 2 - 2y crosses 0 at y = 1 while g1 stays inactive.
        let m = merit();
        let dual = DualState::default();
        assert_eq!(g2(2.0, 1.0), 0.0);

        let mut previous_gap = f64::INFINITY;
        for k in 1..8 {
            let eps = 10f64.powi(-k);
            let inactive = m.value(2.0, 1.0 + eps, &dual);
            let active = m.value(2.0, 1.0 - eps, &dual);
            let gap = (active - inactive).abs();
            assert!(gap < previous_gap);
            previous_gap = gap;
        }
        assert!(previous_gap < 1e-5);
    }

    #[test]
    fn test_monotone_in_active_residual() {
        // Along x = 2, ζ₁ = 2 - 2y grows as y decreases below 1.
        let m = merit();
        let dual = DualState::new([0.0, 0.0], [3.0, 3.0]);
        let penalties: Vec<f64> = [0.9, 0.7, 0.5, 0.2, 0.0]
            .iter()
            .map(|&y| m.penalty(2.0, y, &dual))
            .collect();
        assert!(penalties.windows(2).all(|w| w[0] <= w[1]));
    }

    proptest! {
        #[test]
        fn prop_inactive_merit_equals_objective(
            x in 0.0f64..5.0,
            y in 0.0f64..5.0,
            margin0 in 0.01f64..10.0,
            margin1 in 0.01f64..10.0,
            s0 in 0.1f64..100.0,
            s1 in 0.1f64..100.0,
        ) {
            // Pick λ so that ζ = upper - margin, strictly inside the box
            let m = merit();
            let g = m.problem().constraints_at(x, y);
            let upper = m.bounds().upper();
            let lambda = [
                (upper[0] - margin0 - g[0]) * s0,
                (upper[1] - margin1 - g[1]) * s1,
            ];
            let dual = DualState::new(lambda, [s0, s1]);
            prop_assume!(m.residual(x, y, &dual) == [0.0, 0.0]);
            prop_assert_eq!(m.value(x, y, &dual), objective(x, y));
        }

        #[test]
        fn prop_penalty_non_negative(
            x in -5.0f64..5.0,
            y in -5.0f64..5.0,
            l0 in -50.0f64..50.0,
            l1 in -50.0f64..50.0,
            s0 in 0.0f64..100.0,
            s1 in 0.0f64..100.0,
        ) {
            prop_assume!(s0 > 0.0 && s1 > 0.0);
            let m = merit();
            let dual = DualState::new([l0, l1], [s0, s1]);
            prop_assert!(m.penalty(x, y, &dual) >= 0.0);
            prop_assert!(m.value(x, y, &dual) >= objective(x, y));
        }
    }
}
