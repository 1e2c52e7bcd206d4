use crate::{
    aggregate::{GlobalRange, MonthCell},
    config::HeatmapConfig,
    scale::{BandScale, LinearScale},
};

/// Inset of sparklines inside their cell.
pub const SPARK_INSET_X: f64 = 4.0;
pub const SPARK_INSET_Y: f64 = 6.0;

/// Gap between the legend bar and the right edge of the grid.
const LEGEND_GAP: f64 = 20.0;

/// Axis-aligned rectangle in surface pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x <= self.x + self.width && y >= self.y && y <= self.y + self.height
    }
}

/// Where everything goes on the surface. Built once; toggling the mode
/// never changes it.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub width: f64,
    pub height: f64,
    /// Years, left to right.
    pub x: BandScale<i32>,
    /// Months 1 to 12, top to bottom.
    pub y: BandScale<u8>,
    /// Shared by every sparkline so heights compare across cells.
    pub spark_y: LinearScale,
    pub legend: Rect,
}

impl Layout {
    pub fn new(config: &HeatmapConfig, years: &[i32], range: &GlobalRange) -> Self {
        let margin = config.margin;
        let width = margin.left
            + years.len() as f64 * (config.cell_width + config.cell_gap)
            + margin.right;
        let height = margin.top + 12.0 * (config.cell_height + config.cell_gap) + margin.bottom;

        let x = BandScale::new(
            years.to_vec(),
            (margin.left, width - margin.right),
            config.cell_padding,
        );
        let y: BandScale<u8> = BandScale::new(
            (1..=12).collect(),
            (margin.top, height - margin.bottom),
            config.cell_padding,
        );
        let spark_y = LinearScale::new(
            (range.min, range.max),
            (y.bandwidth() - SPARK_INSET_Y, SPARK_INSET_Y),
        );
        let legend = Rect {
            x: width - margin.right + LEGEND_GAP,
            y: margin.top,
            width: config.legend_width,
            height: config.legend_height,
        };

        Self {
            width,
            height,
            x,
            y,
            spark_y,
            legend,
        }
    }

    /// Surface rectangle of a cell, `None` if its year is outside the grid.
    pub fn cell_rect(&self, cell: &MonthCell) -> Option<Rect> {
        Some(Rect {
            x: self.x.position(&cell.year)?,
            y: self.y.position(&cell.month)?,
            width: self.x.bandwidth(),
            height: self.y.bandwidth(),
        })
    }

    /// Size in whole pixels, for backends.
    pub fn size(&self) -> (u32, u32) {
        (self.width.ceil() as u32, self.height.ceil() as u32)
    }
}
