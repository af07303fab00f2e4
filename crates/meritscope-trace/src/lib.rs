//! Optimizer traces
//!
//! One trace document holds one solver run: an ordered sequence of outer
//! (ALM) iterations, each with its inner-solver trajectory, dual vector and
//! penalty weights. This crate owns the shape of those records, turns them
//! into plottable arrays and loads them from YAML or JSON files.

pub mod loader;
pub mod normalize;
pub mod record;

pub use loader::{decode_records, load_run, DecodeError, TraceFormat};
pub use normalize::{normalize, normalize_run, NormalizedIteration};
pub use record::{InnerIterate, IterationRecord, OptimizerRun};
