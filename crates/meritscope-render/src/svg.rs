//! SVG backend built on `plotters`.

use std::path::{Path, PathBuf};

use plotters::coord::Shift;
use plotters::prelude::*;
use tracing::info;

use crate::compare::{FigurePlan, Panel, PanelSlot};
use crate::contour::contour_segments;
use crate::renderer::{FigureRenderer, RenderError};

/// 1.5 × (16, 9) inches at 100 dpi
pub const DEFAULT_SIZE: (u32, u32) = (2400, 1350);

const TITLE_FONT: (&str, u32) = ("serif", 20);
const LABEL_FONT: (&str, u32) = ("serif", 18);

const MARGIN: i32 = 8;
const X_LABEL_AREA: i32 = 28;

/// Writes the whole comparison figure to one SVG file
#[derive(Debug, Clone)]
pub struct SvgRenderer {
    path: PathBuf,
    size: (u32, u32),
}

impl SvgRenderer {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            size: DEFAULT_SIZE,
        }
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.size = (width, height);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FigureRenderer for SvgRenderer {
    fn render(&mut self, plan: &FigurePlan) -> Result<(), RenderError> {
        let (rows, columns) = (plan.row_count(), plan.column_count());
        if rows == 0 || columns == 0 {
            return Err(RenderError::EmptyFigure);
        }

        let root = SVGBackend::new(&self.path, self.size).into_drawing_area();
        root.fill(&WHITE).map_err(backend)?;
        let areas = root.split_evenly((rows, columns));

        for ((row, column, slot), area) in plan.slots().zip(areas.iter()) {
            // Disabled slots keep their cell and stay blank.
            if let PanelSlot::Active(panel) = slot {
                let row_label = plan.row_labels.get(row).map(String::as_str).filter(|_| column == 0);
                draw_panel(area, plan, panel, row_label)?;
            }
        }

        root.present().map_err(backend)?;
        info!(path = %self.path.display(), rows, columns, "wrote figure");
        Ok(())
    }
}

fn draw_panel(
    area: &DrawingArea<SVGBackend<'_>, Shift>,
    plan: &FigurePlan,
    panel: &Panel,
    row_label: Option<&str>,
) -> Result<(), RenderError> {
    let x_range = plan.domain.x.min..plan.domain.x.max;
    let y_range = plan.domain.y.min..plan.domain.y.max;

    let cell = area.titled(&panel.title, TITLE_FONT).map_err(backend)?;
    let y_label_area: i32 = if row_label.is_some() { 56 } else { 28 };
    let (pad_x, pad_y) = equal_aspect_padding(
        cell.dim_in_pixel(),
        (2 * MARGIN + y_label_area, 2 * MARGIN + X_LABEL_AREA),
        plan.domain.x.width(),
        plan.domain.y.width(),
    );
    let plot_area = cell.margin(pad_y, pad_y, pad_x, pad_x);

    let mut chart = ChartBuilder::on(&plot_area)
        .margin(MARGIN)
        .x_label_area_size(X_LABEL_AREA)
        .y_label_area_size(y_label_area)
        .build_cartesian_2d(x_range, y_range)
        .map_err(backend)?;

    {
        let mut mesh = chart.configure_mesh();
        mesh.disable_mesh().label_style(LABEL_FONT);
        if let Some(label) = row_label {
            mesh.y_desc(label);
        }
        mesh.draw().map_err(backend)?;
    }

    let level_count = plan.levels.len();
    for (k, &level) in plan.levels.iter().enumerate() {
        let style = level_color(k, level_count).stroke_width(1);
        let segments = contour_segments(&panel.field, level);
        chart
            .draw_series(
                segments
                    .into_iter()
                    .map(|[a, b]| PathElement::new(vec![(a[0], a[1]), (b[0], b[1])], style)),
            )
            .map_err(backend)?;
    }

    for boundary in &plan.boundaries {
        let segments = contour_segments(&boundary.field, boundary.level);
        chart
            .draw_series(
                segments
                    .into_iter()
                    .map(|[a, b]| PathElement::new(vec![(a[0], a[1]), (b[0], b[1])], BLACK.stroke_width(2))),
            )
            .map_err(backend)?;
    }

    let points: Vec<(f64, f64)> = panel.trajectory.iter().map(|p| (p[0], p[1])).collect();
    chart
        .draw_series(LineSeries::new(points.iter().copied(), RED.stroke_width(1)))
        .map_err(backend)?;
    chart
        .draw_series(points.iter().map(|&p| Circle::new(p, 3, RED.filled())))
        .map_err(backend)?;

    Ok(())
}

/// Padding `(horizontal, vertical)` on each side of a cell so that one unit
/// of x and one unit of y cover the same number of pixels.
///
/// `reserved` is the space taken by margins and label areas.
fn equal_aspect_padding(cell: (u32, u32), reserved: (i32, i32), x_span: f64, y_span: f64) -> (i32, i32) {
    let plot_w = (cell.0 as i32 - reserved.0) as f64;
    let plot_h = (cell.1 as i32 - reserved.1) as f64;
    if plot_w <= 0.0 || plot_h <= 0.0 {
        return (0, 0);
    }

    let target = x_span / y_span;
    if plot_w / plot_h > target {
        (((plot_w - plot_h * target) / 2.0).floor() as i32, 0)
    } else {
        (0, ((plot_h - plot_w / target) / 2.0).floor() as i32)
    }
}

/// Blue for the lowest level through to red for the highest.
fn level_color(k: usize, count: usize) -> HSLColor {
    let t = if count > 1 {
        k as f64 / (count - 1) as f64
    } else {
        0.0
    };
    HSLColor(0.66 * (1.0 - t), 0.75, 0.45)
}

fn backend<E: std::fmt::Display>(err: E) -> RenderError {
    RenderError::Backend(err.to_string())
}
