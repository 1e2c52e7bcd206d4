use logos::Logos;
use miette::Diagnostic;
use thiserror::Error;
use time::{macros::format_description, Date};

use crate::{config::Columns, loader::RawRow};

#[derive(Logos, Debug, PartialEq)]
#[logos(skip r"[ \t]+")]
enum Token {
    #[regex(r"[+-]?([0-9]+(\.[0-9]*)?|\.[0-9]+)([eE][+-]?[0-9]+)?")]
    Number,
    #[token("---")]
    #[regex("[nN]/?[aA]")]
    MissingData,
}

/// What a temperature field contained.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Reading {
    Value(f64),
    /// Empty, `N/A`, `NA` or `---`.
    Missing,
    /// Anything else.
    Garbage,
}

impl Reading {
    fn parse(s: &str) -> Self {
        let mut lex = Token::lexer(s);
        let reading = match lex.next() {
            None => return Self::Missing,
            Some(Ok(Token::Number)) => match lex.slice().parse() {
                Ok(value) => Self::Value(value),
                Err(_) => Self::Garbage,
            },
            Some(Ok(Token::MissingData)) => Self::Missing,
            Some(Err(())) => return Self::Garbage,
        };

        match lex.next() {
            None => reading,
            Some(_) => Self::Garbage,
        }
    }

    fn value(self) -> f64 {
        match self {
            Self::Value(v) => v,
            Self::Missing | Self::Garbage => f64::NAN,
        }
    }
}

/// Temperature from a text field, `NaN` when it does not hold a number.
pub fn parse_temperature(s: &str) -> f64 {
    Reading::parse(s).value()
}

/// One day of readings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyRecord {
    pub date: Date,
    pub year: i32,
    /// 1 to 12
    pub month: u8,
    pub day: u8,
    pub max: f64,
    pub min: f64,
}

impl DailyRecord {
    pub fn new(date: Date, max: f64, min: f64) -> Self {
        Self {
            date,
            year: date.year(),
            month: u8::from(date.month()),
            day: date.day(),
            max,
            min,
        }
    }

    pub fn has_missing_values(&self) -> bool {
        !self.max.is_finite() || !self.min.is_finite()
    }
}

#[derive(Debug, Clone, Error, Diagnostic, PartialEq)]
pub enum ParseError {
    #[error("Line {line}: missing `{column}` field")]
    #[diagnostic(code(heatmap::normalize::missing_field))]
    MissingField { line: u64, column: String },
    #[error("Line {line}: bad date `{value}`, expecting YYYY-MM-DD")]
    #[diagnostic(code(heatmap::normalize::bad_date))]
    BadDate { line: u64, value: String },
}

pub fn parse_date(s: &str) -> Result<Date, time::error::Parse> {
    Date::parse(s.trim(), format_description!("[year]-[month]-[day]"))
}

fn read_temperature(row: &RawRow, column: &str) -> f64 {
    let Some(raw) = row.get(column) else {
        return f64::NAN;
    };
    let reading = Reading::parse(raw);
    if reading == Reading::Garbage {
        log::warn!("line {}: unreadable `{column}` value `{raw}`", row.line);
    }
    reading.value()
}

pub fn normalize_row(row: &RawRow, columns: &Columns) -> Result<DailyRecord, ParseError> {
    let raw_date = row.get(&columns.date).ok_or_else(|| ParseError::MissingField {
        line: row.line,
        column: columns.date.clone(),
    })?;
    let date = parse_date(raw_date).map_err(|_| ParseError::BadDate {
        line: row.line,
        value: raw_date.to_string(),
    })?;

    let max = read_temperature(row, &columns.max);
    let min = read_temperature(row, &columns.min);

    Ok(DailyRecord::new(date, max, min))
}

/// Result of normalizing a whole table.
#[derive(Debug, Default)]
pub struct Normalized {
    pub records: Vec<DailyRecord>,
    /// Rows that could not be placed on the calendar.
    pub rejected: Vec<ParseError>,
    /// Records kept with at least one `NaN` temperature.
    pub missing_values: usize,
}

/// Rows with a bad date are dropped and reported, rows with bad
/// temperatures are kept with `NaN` in place of the value.
pub fn normalize(rows: &[RawRow], columns: &Columns) -> Normalized {
    let mut normalized = Normalized::default();

    for row in rows {
        match normalize_row(row, columns) {
            Ok(record) => {
                if record.has_missing_values() {
                    log::debug!("line {}: missing temperature on {}", row.line, record.date);
                    normalized.missing_values += 1;
                }
                normalized.records.push(record);
            }
            Err(e) => {
                log::warn!("{e}");
                normalized.rejected.push(e);
            }
        }
    }

    log::info!(
        "normalized {} records, rejected {}, {} with missing temperatures",
        normalized.records.len(),
        normalized.rejected.len(),
        normalized.missing_values
    );
    normalized
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use time::Month;

    use super::*;

    fn row(line: u64, date: &str, max: &str, min: &str) -> RawRow {
        let fields = HashMap::from([
            (String::from("date"), date.to_string()),
            (String::from("max_temperature"), max.to_string()),
            (String::from("min_temperature"), min.to_string()),
        ]);
        RawRow::new(line, fields)
    }

    #[test]
    fn temperatures() {
        assert_eq!(parse_temperature("12"), 12.0);
        assert_eq!(parse_temperature("-4.5"), -4.5);
        assert_eq!(parse_temperature("+3"), 3.0);
        assert_eq!(parse_temperature(".5"), 0.5);
        assert_eq!(parse_temperature(" 7.25 "), 7.25);
        assert_eq!(parse_temperature("1e1"), 10.0);
        assert!(parse_temperature("N/A").is_nan());
        assert!(parse_temperature("").is_nan());
        assert!(parse_temperature("12abc").is_nan());
        assert!(parse_temperature("12 13").is_nan());
        assert!(parse_temperature("warm").is_nan());
    }

    #[test]
    fn missing_markers_differ_from_garbage() {
        assert_eq!(Reading::parse("N/A"), Reading::Missing);
        assert_eq!(Reading::parse("na"), Reading::Missing);
        assert_eq!(Reading::parse("---"), Reading::Missing);
        assert_eq!(Reading::parse("  "), Reading::Missing);
        assert_eq!(Reading::parse("hot"), Reading::Garbage);
        assert_eq!(Reading::parse("-"), Reading::Garbage);
        assert_eq!(Reading::parse("-0.5"), Reading::Value(-0.5));
    }

    #[test]
    fn dates() {
        let date = parse_date("2015-07-04").unwrap();
        assert_eq!(date.year(), 2015);
        assert_eq!(date.month(), Month::July);
        assert_eq!(date.day(), 4);
        assert!(parse_date("2015/07/04").is_err());
        assert!(parse_date("2015-02-30").is_err());
        assert!(parse_date("04-07-2015").is_err());
        assert!(parse_date("2015-07-04T00:00").is_err());
    }

    #[test]
    fn record_fields_come_from_the_date() {
        let record = normalize_row(&row(2, "2011-12-31", "3.5", "-1"), &Columns::default()).unwrap();
        assert_eq!(record.year, 2011);
        assert_eq!(record.month, 12);
        assert_eq!(record.day, 31);
        assert_eq!(record.max, 3.5);
        assert_eq!(record.min, -1.0);
    }

    #[test]
    fn bad_date_is_an_error() {
        let err = normalize_row(&row(7, "yesterday", "1", "0"), &Columns::default()).unwrap_err();
        assert_eq!(
            err,
            ParseError::BadDate {
                line: 7,
                value: String::from("yesterday")
            }
        );
    }

    #[test]
    fn bad_rows_do_not_stop_the_table() {
        let rows = vec![
            row(2, "2020-01-01", "10", "2"),
            row(3, "2020-13-01", "10", "2"),
            row(4, "2020-01-02", "N/A", "1"),
            row(5, "2020-01-03", "9", "0"),
        ];
        let normalized = normalize(&rows, &Columns::default());
        assert_eq!(normalized.records.len(), 3);
        assert_eq!(normalized.rejected.len(), 1);
        assert_eq!(normalized.missing_values, 1);
        assert!(normalized.records[1].max.is_nan());
        assert_eq!(normalized.records[1].min, 1.0);
    }
}
