use std::{path::Path, time::Duration};

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::TemperatureUnit;

/// Everything that shapes the picture. The defaults draw the classic
/// ten year grid with 100×80 cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HeatmapConfig {
    pub margin: Margin,
    pub cell_width: f64,
    pub cell_height: f64,
    /// Inner padding of both band scales, as a fraction of a step.
    pub cell_padding: f64,
    /// Spacing added to every cell when sizing the surface.
    pub cell_gap: f64,
    pub legend_width: f64,
    pub legend_height: f64,
    /// How many of the most recent years are shown.
    pub year_window: usize,
    pub transition_ms: u64,
    pub tooltip: TooltipConfig,
    pub columns: Columns,
    pub unit: TemperatureUnit,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Margin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TooltipConfig {
    /// Distance between the pointer and the tooltip corner.
    pub offset: f64,
    pub width: f64,
    pub height: f64,
}

/// Names of the CSV columns read by the loader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Columns {
    pub date: String,
    pub max: String,
    pub min: String,
}

impl Default for HeatmapConfig {
    fn default() -> Self {
        Self {
            margin: Margin::default(),
            cell_width: 100.0,
            cell_height: 80.0,
            cell_padding: 0.06,
            cell_gap: 6.0,
            legend_width: 18.0,
            legend_height: 220.0,
            year_window: 10,
            transition_ms: 400,
            tooltip: TooltipConfig::default(),
            columns: Columns::default(),
            unit: TemperatureUnit::default(),
        }
    }
}

impl Default for Margin {
    fn default() -> Self {
        Self {
            top: 50.0,
            right: 100.0,
            bottom: 30.0,
            left: 95.0,
        }
    }
}

impl Default for TooltipConfig {
    fn default() -> Self {
        Self {
            offset: 12.0,
            width: 230.0,
            height: 24.0,
        }
    }
}

impl Default for Columns {
    fn default() -> Self {
        Self {
            date: String::from("date"),
            max: String::from("max_temperature"),
            min: String::from("min_temperature"),
        }
    }
}

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("Could not read config file `{path}`")]
    #[diagnostic(code(heatmap::config::io))]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Bad config: {0}")]
    #[diagnostic(
        code(heatmap::config::json),
        help("every field is optional, unknown fields are rejected")
    )]
    Json(#[from] serde_json::Error),
}

impl HeatmapConfig {
    pub fn from_json(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&content)
    }

    pub fn transition(&self) -> Duration {
        Duration::from_millis(self.transition_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config =
            HeatmapConfig::from_json(r#"{ "year_window": 5, "margin": { "top": 10 } }"#).unwrap();
        assert_eq!(config.year_window, 5);
        assert_eq!(config.margin.top, 10.0);
        assert_eq!(config.margin.left, 95.0);
        assert_eq!(config.cell_width, 100.0);
        assert_eq!(config.columns.date, "date");
    }

    #[test]
    fn unit_and_columns_from_json() {
        let config = HeatmapConfig::from_json(
            r#"{ "unit": "fahrenheit", "columns": { "max": "tmax", "min": "tmin" } }"#,
        )
        .unwrap();
        assert_eq!(config.unit, TemperatureUnit::Fahrenheit);
        assert_eq!(config.columns.max, "tmax");
        assert_eq!(config.columns.date, "date");
    }

    #[test]
    fn unknown_field_is_rejected() {
        let err = HeatmapConfig::from_json(r#"{ "colour": "red" }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn missing_file() {
        let err = HeatmapConfig::from_path("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn transition_duration() {
        assert_eq!(
            HeatmapConfig::default().transition(),
            Duration::from_millis(400)
        );
    }
}
