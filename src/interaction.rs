//! View state and the events that change it.
//!
//! A [`View`] never touches the cells: toggling the mode only rebuilds the
//! color scale, the legend and the target fills, then animates the
//! displayed fills toward them. Time is passed in by the caller as the
//! [`Duration`] since any fixed origin, which keeps every frame
//! reproducible.

use std::time::Duration;

use plotters::style::RGBColor;

use crate::{
    aggregate::MonthCell,
    color::{interpolate_rgb, ColorScale, Legend},
    config::TooltipConfig,
    heatmap::Heatmap,
};

/// Which reading drives the fills and the legend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Max,
    Min,
}

impl Mode {
    pub fn toggled(self) -> Self {
        match self {
            Self::Max => Self::Min,
            Self::Min => Self::Max,
        }
    }

    /// Label of the toggle control: it names the action, so the other mode.
    pub fn toggle_label(self) -> &'static str {
        match self {
            Self::Max => "Switch to Min Temperature",
            Self::Min => "Switch to Max Temperature",
        }
    }

    pub fn value(self, cell: &MonthCell) -> f64 {
        match self {
            Self::Max => cell.max,
            Self::Min => cell.min,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tooltip {
    pub text: String,
    /// Top left corner, in viewport pixels.
    pub x: f64,
    pub y: f64,
}

/// Below right of the pointer, or below left when that would cross the
/// right edge of the viewport. Never left of the viewport.
pub fn tooltip_position(pointer: Point, viewport_width: f64, config: &TooltipConfig) -> (f64, f64) {
    let y = pointer.y + config.offset;
    let x = pointer.x + config.offset;
    if x + config.width > viewport_width {
        ((pointer.x - config.width - config.offset).max(0.0), y)
    } else {
        (x, y)
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Transition {
    /// Fills displayed when the transition started.
    from: Vec<RGBColor>,
    started: Duration,
    duration: Duration,
}

impl Transition {
    /// Eased progress in [0, 1].
    fn progress(&self, now: Duration) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let t = now.saturating_sub(self.started).as_secs_f64() / self.duration.as_secs_f64();
        ease_cubic_in_out(t.min(1.0))
    }

    fn is_running(&self, now: Duration) -> bool {
        now < self.started + self.duration
    }
}

fn ease_cubic_in_out(t: f64) -> f64 {
    let t = t * 2.0;
    if t <= 1.0 {
        t * t * t / 2.0
    } else {
        let t = t - 2.0;
        (t * t * t + 2.0) / 2.0
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Hover {
    cell: usize,
    tooltip: Tooltip,
}

/// Everything about the picture that changes after it is built.
#[derive(Debug, Clone, PartialEq)]
pub struct View {
    mode: Mode,
    scale: ColorScale,
    legend: Legend,
    /// Target fill of every cell, same order as the heatmap's cells.
    fills: Vec<RGBColor>,
    transition: Option<Transition>,
    hover: Option<Hover>,
}

impl View {
    pub fn new(heatmap: &Heatmap) -> Self {
        Self::with_mode(heatmap, Mode::default())
    }

    pub fn with_mode(heatmap: &Heatmap, mode: Mode) -> Self {
        let scale = ColorScale::for_mode(mode, heatmap.cells());
        let mut view = Self {
            mode,
            scale,
            legend: Legend::new(&scale),
            fills: Vec::new(),
            transition: None,
            hover: None,
        };
        view.apply(heatmap);
        view
    }

    /// Rebuilds scale, legend and target fills from the current mode.
    /// Calling it again without a mode change changes nothing.
    fn apply(&mut self, heatmap: &Heatmap) {
        self.scale = ColorScale::for_mode(self.mode, heatmap.cells());
        self.legend = Legend::new(&self.scale);
        self.fills = heatmap
            .cells()
            .iter()
            .map(|cell| self.scale.color(self.mode.value(cell)))
            .collect();
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn scale(&self) -> &ColorScale {
        &self.scale
    }

    pub fn legend(&self) -> &Legend {
        &self.legend
    }

    pub fn toggle_label(&self) -> &'static str {
        self.mode.toggle_label()
    }

    /// Flips the mode and animates every fill toward the new scale.
    ///
    /// A toggle while a transition is running replaces it: the new one
    /// starts from the colors shown at `now`.
    pub fn toggle(&mut self, heatmap: &Heatmap, now: Duration) {
        let from: Vec<RGBColor> = (0..self.fills.len()).map(|i| self.fill_at(i, now)).collect();
        if self.is_animating(now) {
            log::debug!("toggle during a transition, restarting from current fills");
        }

        self.mode = self.mode.toggled();
        self.apply(heatmap);
        self.transition = Some(Transition {
            from,
            started: now,
            duration: heatmap.config().transition(),
        });
        log::debug!(
            "mode {:?}, scale {} to {}",
            self.mode,
            self.scale.hot,
            self.scale.cold
        );
    }

    /// Color of cell `index` as displayed at `now`.
    pub fn fill_at(&self, index: usize, now: Duration) -> RGBColor {
        let target = self.fills.get(index).copied().unwrap_or(crate::color::MISSING);
        match &self.transition {
            Some(transition) if transition.is_running(now) => {
                let from = transition.from.get(index).copied().unwrap_or(target);
                interpolate_rgb(from, target, transition.progress(now))
            }
            _ => target,
        }
    }

    pub fn is_animating(&self, now: Duration) -> bool {
        self.transition
            .as_ref()
            .map_or(false, |transition| transition.is_running(now))
    }

    /// Forgets a finished transition.
    pub fn settle(&mut self, now: Duration) {
        if !self.is_animating(now) {
            self.transition = None;
        }
    }

    /// Pointer moved to `pointer`. Highlights the cell under it and places
    /// the tooltip, or clears both when no cell is hit. Sparklines are not
    /// hit-tested.
    pub fn hover(&mut self, heatmap: &Heatmap, pointer: Point, viewport_width: f64) -> Option<usize> {
        let Some(index) = heatmap.cell_at(pointer.x, pointer.y) else {
            self.pointer_out();
            return None;
        };
        let cell = &heatmap.cells()[index];
        let config = heatmap.config();
        let (x, y) = tooltip_position(pointer, viewport_width, &config.tooltip);
        let text = format!(
            "Date: {}, max: {} min: {}",
            cell.label(),
            config.unit.label(cell.max),
            config.unit.label(cell.min)
        );

        if self.hovered() != Some(index) {
            log::debug!("hover {}", cell.label());
        }
        self.hover = Some(Hover {
            cell: index,
            tooltip: Tooltip { text, x, y },
        });
        Some(index)
    }

    /// Pointer moved while over the grid. The tooltip follows it across
    /// the hovered cell; entering another cell or a gap hit-tests again.
    pub fn pointer_move(
        &mut self,
        heatmap: &Heatmap,
        pointer: Point,
        viewport_width: f64,
    ) -> Option<usize> {
        let hit = heatmap.cell_at(pointer.x, pointer.y);
        if let Some(hover) = self.hover.as_mut().filter(|hover| Some(hover.cell) == hit) {
            let (x, y) = tooltip_position(pointer, viewport_width, &heatmap.config().tooltip);
            hover.tooltip.x = x;
            hover.tooltip.y = y;
            return Some(hover.cell);
        }
        self.hover(heatmap, pointer, viewport_width)
    }

    pub fn pointer_out(&mut self) {
        self.hover = None;
    }

    pub fn hovered(&self) -> Option<usize> {
        self.hover.as_ref().map(|hover| hover.cell)
    }

    pub fn tooltip(&self) -> Option<&Tooltip> {
        self.hover.as_ref().map(|hover| &hover.tooltip)
    }
}
