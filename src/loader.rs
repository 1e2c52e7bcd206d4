//! CSV loading.
//!
//! The file must have a header row naming at least the three configured
//! columns (by default `date,max_temperature,min_temperature`). Other columns
//! are kept in the raw rows but ignored downstream.
//!
//! ```text
//! date,max_temperature,min_temperature
//! 2017-07-01,31.2,17.8
//! ```

use std::{collections::HashMap, fs::File, io, path::Path};

use miette::Diagnostic;
use thiserror::Error;

use crate::config::Columns;

/// One CSV record keyed by header name, with trimmed values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    /// 1-based line in the source, for error reports.
    pub line: u64,
    fields: HashMap<String, String>,
}

impl RawRow {
    pub fn new(line: u64, fields: HashMap<String, String>) -> Self {
        Self { line, fields }
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }
}

#[derive(Debug, Error, Diagnostic)]
pub enum LoadError {
    #[error("Could not open `{path}`")]
    #[diagnostic(code(heatmap::load::io))]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("Malformed CSV: {0}")]
    #[diagnostic(code(heatmap::load::csv))]
    Csv(#[from] csv::Error),
    #[error("Missing column `{0}`")]
    #[diagnostic(
        code(heatmap::load::missing_column),
        help("the header row needs a date, a max temperature and a min temperature column")
    )]
    MissingColumn(String),
}

pub fn load_path(path: impl AsRef<Path>, columns: &Columns) -> Result<Vec<RawRow>, LoadError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    log::info!("loading {}", path.display());
    load_reader(file, columns)
}

pub fn load_reader<R: io::Read>(reader: R, columns: &Columns) -> Result<Vec<RawRow>, LoadError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    for column in [&columns.date, &columns.max, &columns.min] {
        if !headers.iter().any(|h| h == column) {
            return Err(LoadError::MissingColumn(column.clone()));
        }
    }

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let line = record.position().map(|p| p.line()).unwrap_or_default();
        let fields = headers
            .iter()
            .zip(record.iter())
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();
        rows.push(RawRow::new(line, fields));
    }

    log::info!("loaded {} rows", rows.len());
    Ok(rows)
}
