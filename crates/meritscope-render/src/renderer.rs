use thiserror::Error;

use meritscope_types::VizError;

use crate::compare::FigurePlan;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error(transparent)]
    Viz(#[from] VizError),

    #[error("Figure has no panels to draw")]
    EmptyFigure,

    #[error("Drawing backend error: {0}")]
    Backend(String),
}

/// Draws a fully planned comparison figure.
///
/// Implementations must keep the plan's grid: disabled slots stay in place
/// as blank panels so both runs line up column by column.
pub trait FigureRenderer {
    fn render(&mut self, plan: &FigurePlan) -> Result<(), RenderError>;
}
