//! Sampling intervals, plotting domains and the box on shifted constraints.

use serde::{Deserialize, Serialize};

use crate::error::{VizError, VizResult};
use crate::NUM_CONSTRAINTS;

// ============================================================================
// Interval / Domain
// ============================================================================

/// Half-open interval `[min, max)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub min: f64,
    pub max: f64,
}

impl Interval {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Reject empty or non-finite intervals.
    pub fn validate(&self, axis: &str) -> VizResult<()> {
        if !self.min.is_finite() || !self.max.is_finite() {
            return Err(VizError::invalid_domain(format!(
                "{} interval [{}, {}) has non-finite bounds",
                axis, self.min, self.max
            )));
        }
        if self.min >= self.max {
            return Err(VizError::invalid_domain(format!(
                "{} interval [{}, {}) is empty",
                axis, self.min, self.max
            )));
        }
        Ok(())
    }

    pub fn width(&self) -> f64 {
        self.max - self.min
    }
}

impl From<[f64; 2]> for Interval {
    fn from(bounds: [f64; 2]) -> Self {
        Self::new(bounds[0], bounds[1])
    }
}

/// Shared plotting window (xlim, ylim)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Domain {
    pub x: Interval,
    pub y: Interval,
}

impl Domain {
    pub const fn new(x: Interval, y: Interval) -> Self {
        Self { x, y }
    }

    pub fn validate(&self) -> VizResult<()> {
        self.x.validate("x")?;
        self.y.validate("y")
    }
}

impl Default for Domain {
    fn default() -> Self {
        Self::new(Interval::new(0.0, 5.0), Interval::new(0.0, 5.0))
    }
}

// ============================================================================
// BoxConstraint
// ============================================================================

/// Elementwise bounds `lower <= ζ <= upper` on the shifted constraint values.
///
/// Lower bounds may be `-inf` for one-sided constraints.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawBox", into = "RawBox")]
pub struct BoxConstraint {
    lower: [f64; NUM_CONSTRAINTS],
    upper: [f64; NUM_CONSTRAINTS],
}

impl BoxConstraint {
    pub fn new(lower: [f64; NUM_CONSTRAINTS], upper: [f64; NUM_CONSTRAINTS]) -> VizResult<Self> {
        for i in 0..NUM_CONSTRAINTS {
            if lower[i].is_nan() || upper[i].is_nan() {
                return Err(VizError::invalid_domain(format!(
                    "box bound {} is NaN",
                    i
                )));
            }
            if lower[i] > upper[i] {
                return Err(VizError::invalid_domain(format!(
                    "box bound {}: lower {} exceeds upper {}",
                    i, lower[i], upper[i]
                )));
            }
        }
        Ok(Self { lower, upper })
    }

    pub fn lower(&self) -> [f64; NUM_CONSTRAINTS] {
        self.lower
    }

    pub fn upper(&self) -> [f64; NUM_CONSTRAINTS] {
        self.upper
    }

    /// Project one component onto `[lower[i], upper[i]]`.
    ///
    /// `min` then `max`, no branching. NaN bounds cannot occur, and a NaN
    /// `zeta` maps to the bound like C `fmin`/`fmax`.
    #[inline]
    pub fn clamp_component(&self, i: usize, zeta: f64) -> f64 {
        zeta.min(self.upper[i]).max(self.lower[i])
    }

    pub fn clamp(&self, zeta: [f64; NUM_CONSTRAINTS]) -> [f64; NUM_CONSTRAINTS] {
        [self.clamp_component(0, zeta[0]), self.clamp_component(1, zeta[1])]
    }

    /// `ζ - clamp(ζ)`, zero for components inside the box.
    pub fn residual(&self, zeta: [f64; NUM_CONSTRAINTS]) -> [f64; NUM_CONSTRAINTS] {
        let projected = self.clamp(zeta);
        [zeta[0] - projected[0], zeta[1] - projected[1]]
    }

    pub fn contains(&self, zeta: [f64; NUM_CONSTRAINTS]) -> bool {
        (0..NUM_CONSTRAINTS).all(|i| self.lower[i] <= zeta[i] && zeta[i] <= self.upper[i])
    }
}

impl Default for BoxConstraint {
    /// `g1 <= -1`, `g2 <= 0`, both one-sided.
    fn default() -> Self {
        Self {
            lower: [f64::NEG_INFINITY, f64::NEG_INFINITY],
            upper: [-1.0, 0.0],
        }
    }
}

/// Serialized form; `null` stands for an unbounded side.
#[derive(Serialize, Deserialize)]
struct RawBox {
    lower: [Option<f64>; NUM_CONSTRAINTS],
    upper: [Option<f64>; NUM_CONSTRAINTS],
}

impl TryFrom<RawBox> for BoxConstraint {
    type Error = VizError;

    fn try_from(raw: RawBox) -> VizResult<Self> {
        let lower = raw.lower.map(|b| b.unwrap_or(f64::NEG_INFINITY));
        let upper = raw.upper.map(|b| b.unwrap_or(f64::INFINITY));
        BoxConstraint::new(lower, upper)
    }
}

impl From<BoxConstraint> for RawBox {
    fn from(bounds: BoxConstraint) -> Self {
        let finite = |v: f64| if v.is_finite() { Some(v) } else { None };
        RawBox {
            lower: bounds.lower.map(finite),
            upper: bounds.upper.map(finite),
        }
    }
}
