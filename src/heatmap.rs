use std::{io, path::Path, time::Duration};

use crate::{
    aggregate::{aggregate, GlobalRange, MonthCell},
    config::HeatmapConfig,
    interaction::View,
    layout::Layout,
    loader::{self, LoadError, RawRow},
    normalize::{self, DailyRecord, ParseError},
    render::{self, RenderError},
};

/// The aggregated grid, ready to draw. Read-only once built.
#[derive(Debug, Clone)]
pub struct Heatmap {
    config: HeatmapConfig,
    years: Vec<i32>,
    cells: Vec<MonthCell>,
    range: GlobalRange,
    layout: Layout,
    rejected: Vec<ParseError>,
    missing_values: usize,
}

impl Heatmap {
    pub fn from_path(path: impl AsRef<Path>, config: HeatmapConfig) -> Result<Self, LoadError> {
        let rows = loader::load_path(path, &config.columns)?;
        Ok(Self::from_rows(&rows, config))
    }

    pub fn from_reader<R: io::Read>(reader: R, config: HeatmapConfig) -> Result<Self, LoadError> {
        let rows = loader::load_reader(reader, &config.columns)?;
        Ok(Self::from_rows(&rows, config))
    }

    pub fn from_rows(rows: &[RawRow], config: HeatmapConfig) -> Self {
        let normalized = normalize::normalize(rows, &config.columns);
        let mut heatmap = Self::from_records(&normalized.records, config);
        heatmap.rejected = normalized.rejected;
        heatmap.missing_values = normalized.missing_values;
        heatmap
    }

    pub fn from_records(records: &[DailyRecord], config: HeatmapConfig) -> Self {
        let aggregation = aggregate(records, config.year_window);
        let range = GlobalRange::of(&aggregation.cells);
        let layout = Layout::new(&config, &aggregation.years, &range);
        Self {
            config,
            years: aggregation.years,
            cells: aggregation.cells,
            range,
            layout,
            rejected: Vec::new(),
            missing_values: 0,
        }
    }

    pub fn config(&self) -> &HeatmapConfig {
        &self.config
    }

    /// Shown years, ascending.
    pub fn years(&self) -> &[i32] {
        &self.years
    }

    /// Sorted by (year, month).
    pub fn cells(&self) -> &[MonthCell] {
        &self.cells
    }

    pub fn cell(&self, year: i32, month: u8) -> Option<&MonthCell> {
        self.index_of(year, month).map(|i| &self.cells[i])
    }

    fn index_of(&self, year: i32, month: u8) -> Option<usize> {
        self.cells
            .binary_search_by_key(&(year, month), |cell| (cell.year, cell.month))
            .ok()
    }

    pub fn range(&self) -> GlobalRange {
        self.range
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Rows dropped because their date could not be read.
    pub fn rejected(&self) -> &[ParseError] {
        &self.rejected
    }

    /// Records kept with a missing temperature.
    pub fn missing_values(&self) -> usize {
        self.missing_values
    }

    /// Index of the cell drawn under a surface point.
    pub fn cell_at(&self, x: f64, y: f64) -> Option<usize> {
        let year = *self.layout.x.invert(x)?;
        let month = *self.layout.y.invert(y)?;
        self.index_of(year, month)
    }

    pub fn view(&self) -> View {
        View::new(self)
    }

    pub fn render_svg(&self, view: &View, now: Duration) -> Result<String, RenderError> {
        render::render_svg(self, view, now)
    }
}
