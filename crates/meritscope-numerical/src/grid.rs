//! Grid Sampler
//!
//! `arange` + `meshgrid` + elementwise evaluation. Coordinates advance by a
//! fixed step from each interval's minimum up to, but excluding, its maximum.

use ndarray::{Array1, Array2};
use tracing::debug;

use meritscope_types::{Domain, Interval, ScalarField2D, VizError, VizResult};

use crate::functions::Field2;

fn validate_step(step: f64) -> VizResult<()> {
    if !step.is_finite() || step <= 0.0 {
        return Err(VizError::invalid_domain(format!(
            "step must be positive and finite, got {}",
            step
        )));
    }
    Ok(())
}

/// Upper limit on the coordinates generated along one axis.
pub const MAX_POINTS_PER_AXIS: usize = 1 << 16;

/// Number of points `ceil((max - min) / step)` produced by [`arange`].
///
/// Counts that overflow or exceed [`MAX_POINTS_PER_AXIS`] are rejected
/// before any allocation.
pub fn point_count(interval: Interval, step: f64) -> VizResult<usize> {
    let count = (interval.width() / step).ceil();
    if !count.is_finite() || count > MAX_POINTS_PER_AXIS as f64 {
        return Err(VizError::invalid_domain(format!(
            "step {} over [{}, {}) yields {} points, limit is {}",
            step, interval.min, interval.max, count, MAX_POINTS_PER_AXIS
        )));
    }
    Ok(count as usize)
}

/// Evenly stepped coordinates `min, min + step, ...` strictly below `max`
pub fn arange(interval: Interval, step: f64) -> VizResult<Array1<f64>> {
    validate_step(step)?;
    interval.validate("sampling")?;

    let n = point_count(interval, step)?;
    Ok(Array1::from_shape_fn(n, |i| interval.min + i as f64 * step))
}

/// Contour level set `start, start + step, ...` strictly below `stop`
pub fn levels(start: f64, stop: f64, step: f64) -> VizResult<Vec<f64>> {
    Ok(arange(Interval::new(start, stop), step)?.to_vec())
}

/// Outer product of two coordinate vectors.
///
/// Both outputs have shape `(ys.len(), xs.len())`; X varies along columns
/// and Y along rows.
pub fn meshgrid(xs: &Array1<f64>, ys: &Array1<f64>) -> (Array2<f64>, Array2<f64>) {
    let shape = (ys.len(), xs.len());
    let x = Array2::from_shape_fn(shape, |(_, j)| xs[j]);
    let y = Array2::from_shape_fn(shape, |(i, _)| ys[i]);
    (x, y)
}

/// Sample `function` over `[x_bounds) × [y_bounds)` with spacing `step`.
pub fn sample<F>(function: F, x_bounds: Interval, y_bounds: Interval, step: f64) -> VizResult<ScalarField2D>
where
    F: Field2,
{
    validate_step(step)?;
    x_bounds.validate("x")?;
    y_bounds.validate("y")?;

    let xs = arange(x_bounds, step)?;
    let ys = arange(y_bounds, step)?;
    let (x, y) = meshgrid(&xs, &ys);
    let z = function.eval_array(&x, &y)?;

    debug!(rows = ys.len(), cols = xs.len(), step, "sampled scalar field");
    ScalarField2D::new(x, y, z)
}

pub fn sample_domain<F>(function: F, domain: &Domain, step: f64) -> VizResult<ScalarField2D>
where
    F: Field2,
{
    sample(function, domain.x, domain.y, step)
}
