//! Explicit broadcasting of per-constraint vectors over sample grids.
//!
//! Constraint quantities over a grid of shape `s` are stored as one array of
//! shape `(2, s...)`, leading axis = constraint index. Per-constraint
//! constants (λ/Σ, Σ, the box bounds) are tiled to that same shape before
//! they are combined, so no implicit shape coercion is involved.

use ndarray::{stack, ArrayD, ArrayViewD, Axis, IxDyn};

use meritscope_types::{VizError, VizResult, NUM_CONSTRAINTS};

/// Repeat `values[k]` over `shape` for every constraint `k`.
///
/// Output shape is `(2, shape...)`.
pub fn tile(values: [f64; NUM_CONSTRAINTS], shape: &[usize]) -> ArrayD<f64> {
    let mut full = Vec::with_capacity(shape.len() + 1);
    full.push(NUM_CONSTRAINTS);
    full.extend_from_slice(shape);
    ArrayD::from_shape_fn(IxDyn(&full), |idx| values[idx[0]])
}

/// Stack per-constraint arrays along a new leading axis.
pub fn stack_components(components: [ArrayViewD<'_, f64>; NUM_CONSTRAINTS]) -> VizResult<ArrayD<f64>> {
    stack(Axis(0), &components).map_err(|err| {
        VizError::dimension_mismatch(
            "constraint stack",
            "constraint arrays of equal shape",
            err.to_string(),
        )
    })
}
