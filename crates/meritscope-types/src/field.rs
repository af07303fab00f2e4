//! Sampled scalar fields over a rectangular grid.

use ndarray::{Array2, ArrayView2};

use crate::error::{VizError, VizResult};

/// Coordinates and values `(X, Y, Z)` of a function sampled on a grid.
///
/// All three arrays have shape `(ny, nx)`: X varies along columns, Y along
/// rows. Contour extraction relies on this orientation.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarField2D {
    x: Array2<f64>,
    y: Array2<f64>,
    z: Array2<f64>,
}

impl ScalarField2D {
    pub fn new(x: Array2<f64>, y: Array2<f64>, z: Array2<f64>) -> VizResult<Self> {
        if x.dim() != y.dim() || x.dim() != z.dim() {
            return Err(VizError::dimension_mismatch(
                "scalar field",
                format!("X, Y, Z of equal shape (X is {:?})", x.dim()),
                format!("Y {:?}, Z {:?}", y.dim(), z.dim()),
            ));
        }
        Ok(Self { x, y, z })
    }

    pub fn x(&self) -> ArrayView2<'_, f64> {
        self.x.view()
    }

    pub fn y(&self) -> ArrayView2<'_, f64> {
        self.y.view()
    }

    pub fn z(&self) -> ArrayView2<'_, f64> {
        self.z.view()
    }

    /// `(rows, cols)` = `(ny, nx)`
    pub fn shape(&self) -> (usize, usize) {
        self.z.dim()
    }

    pub fn into_parts(self) -> (Array2<f64>, Array2<f64>, Array2<f64>) {
        (self.x, self.y, self.z)
    }

    /// Minimum and maximum of Z, skipping NaN. `None` if nothing is finite
    /// or comparable.
    pub fn z_range(&self) -> Option<(f64, f64)> {
        self.z
            .iter()
            .copied()
            .filter(|v| !v.is_nan())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}
