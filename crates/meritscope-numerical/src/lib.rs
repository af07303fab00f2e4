//! Numerical core of meritscope
//!
//! - [`functions`]: objective and constraint polynomials, the `Field2` trait
//! - [`grid`]: `arange`/`meshgrid` style sampling into a `ScalarField2D`
//! - [`broadcast`]: explicit tiling of per-constraint vectors over a grid
//! - [`merit`]: the box-constrained augmented Lagrangian merit function ψ

pub mod broadcast;
pub mod functions;
pub mod grid;
pub mod merit;

pub use functions::{Field2, Problem, ProblemKind};
pub use grid::{arange, levels, meshgrid, sample, sample_domain};
pub use merit::MeritFunction;
