//! Daily trend lines drawn inside each cell.
//!
//! Points are smoothed with a monotone cubic in x (Steffen's method, as
//! d3's `curveMonotoneX`), which never overshoots the daily values. Days
//! with a missing reading split the line.

use crate::{
    aggregate::MonthCell,
    layout::SPARK_INSET_X,
    normalize::DailyRecord,
    scale::LinearScale,
};

/// Bezier samples per segment between two days.
const SAMPLES_PER_SEGMENT: usize = 6;

/// Which daily reading a line traces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Max,
    Min,
}

impl Field {
    pub fn of(self, record: &DailyRecord) -> f64 {
        match self {
            Self::Max => record.max,
            Self::Min => record.min,
        }
    }
}

/// Horizontal scale of one cell: first day at the left inset, last day at
/// the right inset.
pub fn day_scale(cell: &MonthCell, cell_width: f64) -> LinearScale {
    let first = cell.daily.first().map(|d| f64::from(d.day)).unwrap_or(1.0);
    let last = cell.daily.last().map(|d| f64::from(d.day)).unwrap_or(1.0);
    LinearScale::new((first, last), (SPARK_INSET_X, cell_width - SPARK_INSET_X))
}

/// Polylines, relative to the cell's top left corner, tracing `field`.
/// One polyline per run of days with a value.
pub fn trace(
    cell: &MonthCell,
    field: Field,
    x: &LinearScale,
    y: &LinearScale,
) -> Vec<Vec<(f64, f64)>> {
    let mut runs = Vec::new();
    let mut run = Vec::new();
    for record in &cell.daily {
        let value = field.of(record);
        if value.is_finite() {
            run.push((x.apply(f64::from(record.day)), y.apply(value)));
        } else if !run.is_empty() {
            runs.push(std::mem::take(&mut run));
        }
    }
    if !run.is_empty() {
        runs.push(run);
    }

    runs.iter().map(|points| monotone_x(points)).collect()
}

/// Monotone cubic through `points`, flattened into a polyline.
/// `points` must be ascending in x.
pub fn monotone_x(points: &[(f64, f64)]) -> Vec<(f64, f64)> {
    if points.len() < 3 {
        return points.to_vec();
    }

    let n = points.len();
    let mut tangents = vec![0.0; n];
    for i in 1..n - 1 {
        tangents[i] = slope3(points[i - 1], points[i], points[i + 1]);
    }
    tangents[0] = slope2(points[0], points[1], tangents[1]);
    tangents[n - 1] = slope2(points[n - 2], points[n - 1], tangents[n - 2]);

    let mut line = Vec::with_capacity((n - 1) * SAMPLES_PER_SEGMENT + 1);
    line.push(points[0]);
    for i in 0..n - 1 {
        let (x0, y0) = points[i];
        let (x1, y1) = points[i + 1];
        let dx = (x1 - x0) / 3.0;
        let c0 = (x0 + dx, y0 + dx * tangents[i]);
        let c1 = (x1 - dx, y1 - dx * tangents[i + 1]);
        for step in 1..=SAMPLES_PER_SEGMENT {
            let t = step as f64 / SAMPLES_PER_SEGMENT as f64;
            line.push(cubic_bezier(points[i], c0, c1, points[i + 1], t));
        }
    }
    line
}

fn sign(v: f64) -> f64 {
    if v > 0.0 {
        1.0
    } else if v < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Tangent at `b` from both neighbouring secants, zero at local extrema.
fn slope3(a: (f64, f64), b: (f64, f64), c: (f64, f64)) -> f64 {
    let h0 = b.0 - a.0;
    let h1 = c.0 - b.0;
    if h0 == 0.0 || h1 == 0.0 {
        return 0.0;
    }
    let s0 = (b.1 - a.1) / h0;
    let s1 = (c.1 - b.1) / h1;
    let p = (s0 * h1 + s1 * h0) / (h0 + h1);
    let slope = (sign(s0) + sign(s1)) * s0.abs().min(s1.abs()).min(0.5 * p.abs());
    if slope.is_finite() {
        slope
    } else {
        0.0
    }
}

/// Tangent at an end of the line, from the secant and the inner tangent.
fn slope2(a: (f64, f64), b: (f64, f64), inner: f64) -> f64 {
    let h = b.0 - a.0;
    if h == 0.0 {
        inner
    } else {
        (3.0 * (b.1 - a.1) / h - inner) / 2.0
    }
}

fn cubic_bezier(
    p0: (f64, f64),
    p1: (f64, f64),
    p2: (f64, f64),
    p3: (f64, f64),
    t: f64,
) -> (f64, f64) {
    let u = 1.0 - t;
    let (a, b, c, d) = (u * u * u, 3.0 * u * u * t, 3.0 * u * t * t, t * t * t);
    (
        a * p0.0 + b * p1.0 + c * p2.0 + d * p3.0,
        a * p0.1 + b * p1.1 + c * p2.1 + d * p3.1,
    )
}
