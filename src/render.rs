//! Drawing with `plotters`.
//!
//! [`draw`] works on any backend; [`render_svg`] is the common case. The
//! frame is a function of the heatmap, the view and the time, so an
//! animation is a sequence of `draw` calls with increasing `now`.

use std::time::Duration;

use miette::Diagnostic;
use plotters::{
    coord::Shift,
    element::{PathElement, Polygon, Rectangle, Text},
    prelude::*,
    style::text_anchor::{HPos, Pos, VPos},
};
use thiserror::Error;

use crate::{
    heatmap::Heatmap,
    color::LEGEND_TICKS,
    interaction::View,
    layout::Rect,
    month_name,
    sparkline::{self, Field},
};

const BACKGROUND: RGBColor = RGBColor(0x1b, 0x1d, 0x23);
const AXIS: RGBColor = RGBColor(0x55, 0x55, 0x55);
const LABEL: RGBColor = RGBColor(0xcc, 0xcc, 0xcc);
const HOVER: RGBColor = RGBColor(0xff, 0xff, 0xff);
/// Daily minimums, cool.
const MIN_LINE: RGBAColor = RGBAColor(120, 190, 255, 0.85);
/// Daily maximums, warm.
const MAX_LINE: RGBAColor = RGBAColor(255, 150, 60, 0.9);
const TOOLTIP: RGBAColor = RGBAColor(0x10, 0x10, 0x14, 0.9);

const FONT: &str = "sans-serif";
/// Distance between the grid and its axes.
const AXIS_OFFSET: f64 = 6.0;
const TICK_SIZE: f64 = 4.0;
const YEAR_LABEL_AREA: f64 = 30.0;
const MONTH_LABEL_AREA: f64 = 80.0;
const LEGEND_LABEL_AREA: f64 = 60.0;
const LEGEND_TICK_SIZE: f64 = 6.0;
const CORNER_RADIUS: f64 = 2.0;
const CORNER_STEPS: usize = 3;

#[derive(Debug, Error, Diagnostic)]
pub enum RenderError {
    #[error("Drawing failed: {0}")]
    #[diagnostic(code(heatmap::render))]
    Draw(String),
}

type DrawResult<DB> = Result<(), DrawingAreaErrorKind<<DB as DrawingBackend>::ErrorType>>;

fn px(x: f64, y: f64) -> (i32, i32) {
    (x.round() as i32, y.round() as i32)
}

/// Draws the frame shown at `now`.
pub fn draw<DB: DrawingBackend>(
    heatmap: &Heatmap,
    view: &View,
    now: Duration,
    area: &DrawingArea<DB, Shift>,
) -> DrawResult<DB> {
    area.fill(&BACKGROUND)?;
    draw_axes(heatmap, area)?;
    draw_cells(heatmap, view, now, area)?;
    draw_sparklines(heatmap, area)?;
    draw_legend(heatmap, view, area)?;
    draw_tooltip(heatmap, view, area)?;
    Ok(())
}

pub fn render_svg(heatmap: &Heatmap, view: &View, now: Duration) -> Result<String, RenderError> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, heatmap.layout().size()).into_drawing_area();
        draw(heatmap, view, now, &root).map_err(|e| RenderError::Draw(e.to_string()))?;
        root.present().map_err(|e| RenderError::Draw(e.to_string()))?;
    }
    Ok(svg)
}

/// Year and month axes. The chart coordinates are surface pixels, so the
/// key points are the band centers of the layout and the labels come from
/// inverting them.
fn draw_axes<DB: DrawingBackend>(heatmap: &Heatmap, area: &DrawingArea<DB, Shift>) -> DrawResult<DB> {
    let layout = heatmap.layout();
    let margin = heatmap.config().margin;
    let left = (margin.left - AXIS_OFFSET).max(0.0);
    let top = (margin.top - AXIS_OFFSET).max(0.0);
    let right = (layout.width - margin.right).max(left + 1.0);
    let bottom = layout.height - margin.bottom;
    let year_labels = YEAR_LABEL_AREA.min(top);
    let month_labels = MONTH_LABEL_AREA.min(left);

    let years: Vec<f64> = layout
        .x
        .domain()
        .iter()
        .filter_map(|year| layout.x.center(year))
        .collect();
    let months: Vec<f64> = layout
        .y
        .domain()
        .iter()
        .filter_map(|month| layout.y.center(month))
        .collect();

    let mut chart = ChartBuilder::on(area)
        .margin_top(top - year_labels)
        .margin_left(left - month_labels)
        .margin_right(margin.right)
        .margin_bottom(margin.bottom)
        .top_x_label_area_size(year_labels)
        .y_label_area_size(month_labels)
        .build_cartesian_2d(
            (left..right).with_key_points(years),
            // top to bottom on screen
            (bottom..top).with_key_points(months),
        )?;

    let year_label = |x: &f64| {
        layout
            .x
            .invert(*x)
            .map(|year| year.to_string())
            .unwrap_or_default()
    };
    let month_label = |y: &f64| {
        layout
            .y
            .invert(*y)
            .map(|month| month_name(*month).to_string())
            .unwrap_or_default()
    };
    chart
        .configure_mesh()
        .disable_mesh()
        .axis_style(AXIS.stroke_width(1))
        .set_all_tick_mark_size(TICK_SIZE)
        .x_label_formatter(&year_label)
        .y_label_formatter(&month_label)
        .x_label_style((FONT, 12.0).into_font().color(&LABEL))
        .y_label_style((FONT, 12.0).into_font().color(&LABEL))
        .draw()
}

/// Outline of a rectangle with rounded corners, clockwise from the top
/// right corner.
fn rounded_rect(rect: &Rect, radius: f64) -> Vec<(i32, i32)> {
    let r = radius.min(rect.width / 2.0).min(rect.height / 2.0).max(0.0);
    let corners = [
        (rect.x + rect.width - r, rect.y + r, -90.0_f64),
        (rect.x + rect.width - r, rect.y + rect.height - r, 0.0),
        (rect.x + r, rect.y + rect.height - r, 90.0),
        (rect.x + r, rect.y + r, 180.0),
    ];
    corners
        .iter()
        .flat_map(|&(cx, cy, start)| {
            (0..=CORNER_STEPS).map(move |step| {
                let angle = (start + 90.0 * step as f64 / CORNER_STEPS as f64).to_radians();
                px(cx + r * angle.cos(), cy + r * angle.sin())
            })
        })
        .collect()
}

fn draw_cells<DB: DrawingBackend>(
    heatmap: &Heatmap,
    view: &View,
    now: Duration,
    area: &DrawingArea<DB, Shift>,
) -> DrawResult<DB> {
    let layout = heatmap.layout();
    for (i, cell) in heatmap.cells().iter().enumerate() {
        let Some(rect) = layout.cell_rect(cell) else {
            continue;
        };
        let outline = rounded_rect(&rect, CORNER_RADIUS);
        area.draw(&Polygon::new(outline.clone(), view.fill_at(i, now).filled()))?;

        if view.hovered() == Some(i) {
            let mut border = outline;
            if let Some(&first) = border.first() {
                border.push(first);
            }
            area.draw(&PathElement::new(border, HOVER.stroke_width(2)))?;
        }
    }
    Ok(())
}

fn draw_sparklines<DB: DrawingBackend>(
    heatmap: &Heatmap,
    area: &DrawingArea<DB, Shift>,
) -> DrawResult<DB> {
    let layout = heatmap.layout();
    for cell in heatmap.cells() {
        let Some(rect) = layout.cell_rect(cell) else {
            continue;
        };
        let x = sparkline::day_scale(cell, rect.width);
        for (field, color) in [(Field::Min, MIN_LINE), (Field::Max, MAX_LINE)] {
            for line in sparkline::trace(cell, field, &x, &layout.spark_y) {
                if line.len() < 2 {
                    continue;
                }
                let points: Vec<(i32, i32)> = line
                    .iter()
                    .map(|&(x, y)| px(rect.x + x, rect.y + y))
                    .collect();
                area.draw(&PathElement::new(points, color.stroke_width(1)))?;
            }
        }
    }
    Ok(())
}

fn draw_legend<DB: DrawingBackend>(
    heatmap: &Heatmap,
    view: &View,
    area: &DrawingArea<DB, Shift>,
) -> DrawResult<DB> {
    let bar = heatmap.layout().legend;
    let legend = view.legend();

    // one strip per pixel row, sampled like a vertical linear gradient
    let rows = bar.height.round().max(1.0) as usize;
    for row in 0..rows {
        let t = if rows > 1 {
            row as f64 / (rows - 1) as f64
        } else {
            0.0
        };
        let y = bar.y + row as f64;
        area.draw(&Rectangle::new(
            [px(bar.x, y), px(bar.x + bar.width, y + 1.0)],
            legend.sample(t).filled(),
        ))?;
    }

    if !(legend.hot.is_finite() && legend.cold.is_finite()) {
        return Ok(());
    }
    let (cold, hot) = if legend.hot > legend.cold {
        (legend.cold, legend.hot)
    } else {
        (legend.cold - 0.5, legend.hot + 0.5)
    };

    // the bar is the plotting area, the labels go right of it
    let axis_area = area
        .clone()
        .shrink((bar.x, bar.y), (bar.width + LEGEND_LABEL_AREA, bar.height));
    let mut chart = ChartBuilder::on(&axis_area)
        .right_y_label_area_size(LEGEND_LABEL_AREA)
        .build_cartesian_2d(0.0..1.0, cold..hot)?;

    let unit = heatmap.config().unit;
    let tick_label = |t: &f64| unit.label(*t);
    chart
        .configure_mesh()
        .disable_mesh()
        .disable_x_axis()
        .y_labels(LEGEND_TICKS)
        .axis_style(LABEL.stroke_width(1))
        .set_all_tick_mark_size(LEGEND_TICK_SIZE)
        .y_label_formatter(&tick_label)
        .y_label_style((FONT, 10.0).into_font().color(&LABEL))
        .draw()
}

fn draw_tooltip<DB: DrawingBackend>(
    heatmap: &Heatmap,
    view: &View,
    area: &DrawingArea<DB, Shift>,
) -> DrawResult<DB> {
    let Some(tooltip) = view.tooltip() else {
        return Ok(());
    };
    let size = heatmap.config().tooltip;
    area.draw(&Rectangle::new(
        [
            px(tooltip.x, tooltip.y),
            px(tooltip.x + size.width, tooltip.y + size.height),
        ],
        TOOLTIP.filled(),
    ))?;
    let style = (FONT, 12.0)
        .into_font()
        .color(&HOVER)
        .pos(Pos::new(HPos::Left, VPos::Center));
    area.draw(&Text::new(
        tooltip.text.clone(),
        px(tooltip.x + 6.0, tooltip.y + size.height / 2.0),
        style,
    ))?;
    Ok(())
}
