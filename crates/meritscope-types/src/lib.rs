pub mod bounds;
pub mod dual;
pub mod error;
pub mod field;

// Re-exports
pub use bounds::{BoxConstraint, Domain, Interval};
pub use dual::DualState;
pub use error::{VizError, VizResult};
pub use field::ScalarField2D;

/// Number of inequality constraints handled everywhere in meritscope.
pub const NUM_CONSTRAINTS: usize = 2;
