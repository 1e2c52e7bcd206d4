use plotters::style::RGBColor;

use crate::{
    aggregate::{finite_max, GlobalRange, MonthCell},
    interaction::Mode,
};

/// ColorBrewer RdYlBu, from hot to cold.
const RD_YL_BU: [RGBColor; 11] = [
    RGBColor(0xa5, 0x00, 0x26),
    RGBColor(0xd7, 0x30, 0x27),
    RGBColor(0xf4, 0x6d, 0x43),
    RGBColor(0xfd, 0xae, 0x61),
    RGBColor(0xfe, 0xe0, 0x90),
    RGBColor(0xff, 0xff, 0xbf),
    RGBColor(0xe0, 0xf3, 0xf8),
    RGBColor(0xab, 0xd9, 0xe9),
    RGBColor(0x74, 0xad, 0xd1),
    RGBColor(0x45, 0x75, 0xb4),
    RGBColor(0x31, 0x36, 0x95),
];

/// Fill of a cell without any reading for the active field.
pub const MISSING: RGBColor = RGBColor(0x6b, 0x6b, 0x6b);

pub const LEGEND_STOPS: usize = 11;
pub const LEGEND_TICKS: usize = 5;

/// Uniform cubic B-spline through the scheme colors, `t` clamped to [0, 1].
pub fn interpolate_rd_yl_bu(t: f64) -> RGBColor {
    let n = RD_YL_BU.len() - 1;
    let (t, i) = if t.is_nan() || t <= 0.0 {
        (0.0, 0)
    } else if t >= 1.0 {
        (1.0, n - 1)
    } else {
        (t, (t * n as f64).floor() as usize)
    };

    let channel = |c: fn(&RGBColor) -> u8| {
        let v1 = f64::from(c(&RD_YL_BU[i]));
        let v2 = f64::from(c(&RD_YL_BU[i + 1]));
        let v0 = if i > 0 {
            f64::from(c(&RD_YL_BU[i - 1]))
        } else {
            2.0 * v1 - v2
        };
        let v3 = if i < n - 1 {
            f64::from(c(&RD_YL_BU[i + 2]))
        } else {
            2.0 * v2 - v1
        };
        to_channel(basis((t - i as f64 / n as f64) * n as f64, v0, v1, v2, v3))
    };

    RGBColor(channel(|c| c.0), channel(|c| c.1), channel(|c| c.2))
}

fn basis(t1: f64, v0: f64, v1: f64, v2: f64, v3: f64) -> f64 {
    let t2 = t1 * t1;
    let t3 = t2 * t1;
    ((1.0 - 3.0 * t1 + 3.0 * t2 - t3) * v0
        + (4.0 - 6.0 * t2 + 3.0 * t3) * v1
        + (1.0 + 3.0 * t1 + 3.0 * t2 - 3.0 * t3) * v2
        + t3 * v3)
        / 6.0
}

fn to_channel(v: f64) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

/// Straight RGB blend, `t` = 0 gives `from`.
pub fn interpolate_rgb(from: RGBColor, to: RGBColor, t: f64) -> RGBColor {
    let t = t.clamp(0.0, 1.0);
    let mix = |a: u8, b: u8| to_channel(f64::from(a) + (f64::from(b) - f64::from(a)) * t);
    RGBColor(mix(from.0, to.0), mix(from.1, to.1), mix(from.2, to.2))
}

/// `#rrggbb`
pub fn hex(color: RGBColor) -> String {
    format!("#{:02x}{:02x}{:02x}", color.0, color.1, color.2)
}

/// Continuous hot to cold mapping: `hot` gets the red end of RdYlBu and
/// `cold` the blue end.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorScale {
    pub hot: f64,
    pub cold: f64,
}

impl ColorScale {
    pub fn new(hot: f64, cold: f64) -> Self {
        Self { hot, cold }
    }

    /// In max mode the scale spans the whole range; in min mode its hot end
    /// is the warmest monthly minimum, so min fills use the full spectrum.
    pub fn for_mode(mode: Mode, cells: &[MonthCell]) -> Self {
        let range = GlobalRange::of(cells);
        let hot = match mode {
            Mode::Max => range.max,
            Mode::Min => finite_max(cells.iter().map(|c| c.min)),
        };
        Self::new(hot, range.min)
    }

    pub fn color(&self, value: f64) -> RGBColor {
        if !value.is_finite() {
            return MISSING;
        }
        let t = if self.hot == self.cold {
            0.0
        } else {
            (value - self.hot) / (self.cold - self.hot)
        };
        interpolate_rd_yl_bu(t)
    }
}

/// Everything needed to draw the gradient bar: its domain and the colors
/// from top (hot) to bottom (cold).
#[derive(Debug, Clone, PartialEq)]
pub struct Legend {
    pub hot: f64,
    pub cold: f64,
    pub stops: Vec<RGBColor>,
}

impl Legend {
    pub fn new(scale: &ColorScale) -> Self {
        let ColorScale { hot, cold } = *scale;
        let last = (LEGEND_STOPS - 1) as f64;
        let stops = (0..LEGEND_STOPS)
            .map(|i| scale.color(hot - (i as f64 / last) * (hot - cold)))
            .collect();
        Self { hot, cold, stops }
    }

    /// Gradient color at `t` from the top (0) to the bottom (1) of the bar,
    /// linear between stops.
    pub fn sample(&self, t: f64) -> RGBColor {
        let Some(&first) = self.stops.first() else {
            return MISSING;
        };
        if self.stops.len() == 1 {
            return first;
        }
        let position = t.clamp(0.0, 1.0) * (self.stops.len() - 1) as f64;
        let i = (position.floor() as usize).min(self.stops.len() - 2);
        interpolate_rgb(self.stops[i], self.stops[i + 1], position - i as f64)
    }
}
