//! Comparative rendering
//!
//! [`compare::plan`] turns two (or more) solver runs into a grid of panels,
//! one row per run and one column per outer iteration. A [`FigureRenderer`]
//! draws that plan; [`svg::SvgRenderer`] is the bundled implementation.

pub mod compare;
pub mod contour;
pub mod renderer;
pub mod svg;

pub use compare::{plan, Boundary, ComparisonDataset, FigurePlan, Panel, PanelSlot, PlanOptions};
pub use contour::{contour_segments, Segment};
pub use renderer::{FigureRenderer, RenderError};
pub use svg::SvgRenderer;
