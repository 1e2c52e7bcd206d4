//! Calendar heatmap of daily temperature records.
//!
//! A CSV of daily readings goes through [`loader`], [`normalize`] and
//! [`aggregate`] to become one [`MonthCell`] per (year, month). A [`Heatmap`]
//! lays those cells out on a year × month grid, and a [`View`] holds the
//! interactive state (max/min mode, hover, running transition) that
//! [`render`] draws with `plotters`.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

pub mod aggregate;
pub mod color;
pub mod config;
pub mod heatmap;
pub mod interaction;
pub mod layout;
pub mod loader;
pub mod normalize;
pub mod render;
pub mod scale;
pub mod sparkline;

pub use aggregate::{aggregate, select_years, Aggregation, GlobalRange, MonthCell};
pub use color::{ColorScale, Legend};
pub use config::{ConfigError, HeatmapConfig};
pub use heatmap::Heatmap;
pub use interaction::{Mode, Point, Tooltip, View};
pub use loader::{LoadError, RawRow};
pub use normalize::{DailyRecord, Normalized, ParseError};
pub use render::RenderError;

pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Name of a month numbered from 1.
pub fn month_name(month: u8) -> &'static str {
    MONTH_NAMES
        .get(usize::from(month).wrapping_sub(1))
        .copied()
        .unwrap_or("?")
}

/// Unit printed after every temperature shown to the user.
/// The input file carries no unit, so this only affects labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

impl TemperatureUnit {
    /// `12 Celsius`, or `n/a` when the reading is missing.
    pub fn label(&self, value: f64) -> String {
        if value.is_finite() {
            format!("{value} {self}")
        } else {
            String::from("n/a")
        }
    }
}

impl fmt::Display for TemperatureUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Celsius => f.write_str("Celsius"),
            Self::Fahrenheit => f.write_str("Fahrenheit"),
        }
    }
}

impl FromStr for TemperatureUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ºC" | "°C" | "C" | "celsius" | "Celsius" => Ok(Self::Celsius),
            "ºF" | "°F" | "F" | "fahrenheit" | "Fahrenheit" => Ok(Self::Fahrenheit),
            s => Err(format!(
                "Unknown temperature unit {s}. Expecting `ºC` or `ºF`"
            )),
        }
    }
}
