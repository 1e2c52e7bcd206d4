use std::collections::{btree_map::Entry, BTreeMap, BTreeSet};

use crate::normalize::DailyRecord;

/// Aggregated readings of one (year, month).
#[derive(Debug, Clone, PartialEq)]
pub struct MonthCell {
    pub year: i32,
    pub month: u8,
    /// Highest daily max of the month, `NaN` if no day has one.
    pub max: f64,
    /// Lowest daily min of the month, `NaN` if no day has one.
    pub min: f64,
    /// Never empty, strictly ascending by day.
    pub daily: Vec<DailyRecord>,
}

impl MonthCell {
    /// `YYYY-MM`
    pub fn label(&self) -> String {
        format!("{}-{:02}", self.year, self.month)
    }
}

/// Extremes over every cell, ignoring missing values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlobalRange {
    pub min: f64,
    pub max: f64,
}

impl GlobalRange {
    pub fn of(cells: &[MonthCell]) -> Self {
        Self {
            min: finite_min(cells.iter().map(|c| c.min)),
            max: finite_max(cells.iter().map(|c| c.max)),
        }
    }

    pub fn is_empty(&self) -> bool {
        !self.min.is_finite() || !self.max.is_finite()
    }
}

/// Smallest finite value, `NaN` if there is none.
pub fn finite_min(values: impl IntoIterator<Item = f64>) -> f64 {
    values
        .into_iter()
        .filter(|v| v.is_finite())
        .min_by(|left, right| left.total_cmp(right))
        .unwrap_or(f64::NAN)
}

/// Largest finite value, `NaN` if there is none.
pub fn finite_max(values: impl IntoIterator<Item = f64>) -> f64 {
    values
        .into_iter()
        .filter(|v| v.is_finite())
        .max_by(|left, right| left.total_cmp(right))
        .unwrap_or(f64::NAN)
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Aggregation {
    /// Ascending.
    pub years: Vec<i32>,
    /// Sorted by (year, month).
    pub cells: Vec<MonthCell>,
}

/// The `window` most recent distinct years, ascending.
pub fn select_years(records: &[DailyRecord], window: usize) -> Vec<i32> {
    let years: BTreeSet<i32> = records.iter().map(|r| r.year).collect();
    let skip = years.len().saturating_sub(window);
    years.into_iter().skip(skip).collect()
}

/// Groups the records of the most recent `window` years into month cells.
///
/// Two records for the same day are merged into one holding the extremes
/// of both.
pub fn aggregate(records: &[DailyRecord], window: usize) -> Aggregation {
    let years = select_years(records, window);
    let Some(&first_year) = years.first() else {
        return Aggregation::default();
    };

    let mut groups: BTreeMap<(i32, u8), BTreeMap<u8, DailyRecord>> = BTreeMap::new();
    for record in records.iter().filter(|r| r.year >= first_year) {
        let days = groups.entry((record.year, record.month)).or_default();
        match days.entry(record.day) {
            Entry::Vacant(entry) => {
                entry.insert(*record);
            }
            Entry::Occupied(mut entry) => {
                log::warn!("merging duplicate records for {}", record.date);
                let existing = entry.get_mut();
                existing.max = finite_max([existing.max, record.max]);
                existing.min = finite_min([existing.min, record.min]);
            }
        }
    }

    let cells: Vec<MonthCell> = groups
        .into_iter()
        .map(|((year, month), days)| {
            let daily: Vec<DailyRecord> = days.into_values().collect();
            MonthCell {
                year,
                month,
                max: finite_max(daily.iter().map(|d| d.max)),
                min: finite_min(daily.iter().map(|d| d.min)),
                daily,
            }
        })
        .collect();

    log::info!(
        "aggregated {} cells over {} years ({:?})",
        cells.len(),
        years.len(),
        years
    );
    Aggregation { years, cells }
}

#[cfg(test)]
mod tests {
    use time::{Date, Month};

    use super::*;

    fn record(year: i32, month: u8, day: u8, max: f64, min: f64) -> DailyRecord {
        let month = Month::try_from(month).unwrap();
        DailyRecord::new(Date::from_calendar_date(year, month, day).unwrap(), max, min)
    }

    #[test]
    fn window_keeps_the_latest_years() {
        let records: Vec<_> = (2000..2015).map(|y| record(y, 1, 1, 1.0, 0.0)).collect();
        assert_eq!(select_years(&records, 10), (2005..2015).collect::<Vec<_>>());
        assert_eq!(select_years(&records[..3], 10), vec![2000, 2001, 2002]);
        assert!(select_years(&[], 10).is_empty());
    }

    #[test]
    fn cells_hold_month_extremes() {
        let records = vec![
            record(2020, 3, 2, 14.0, 3.0),
            record(2020, 3, 1, 12.0, 1.0),
            record(2020, 3, 3, 9.0, 4.0),
            record(2020, 4, 1, 20.0, 8.0),
        ];
        let aggregation = aggregate(&records, 10);
        assert_eq!(aggregation.years, vec![2020]);
        assert_eq!(aggregation.cells.len(), 2);

        let march = &aggregation.cells[0];
        assert_eq!((march.year, march.month), (2020, 3));
        assert_eq!(march.max, 14.0);
        assert_eq!(march.min, 1.0);
        let days: Vec<u8> = march.daily.iter().map(|d| d.day).collect();
        assert_eq!(days, vec![1, 2, 3]);
        assert_eq!(march.label(), "2020-03");
    }

    #[test]
    fn old_years_are_dropped() {
        let records = vec![
            record(2001, 5, 1, 1.0, 0.0),
            record(2002, 5, 1, 1.0, 0.0),
            record(2003, 5, 1, 1.0, 0.0),
        ];
        let aggregation = aggregate(&records, 2);
        assert_eq!(aggregation.years, vec![2002, 2003]);
        assert!(aggregation.cells.iter().all(|c| c.year != 2001));
    }

    #[test]
    fn duplicate_days_are_merged() {
        let records = vec![
            record(2020, 1, 5, 10.0, 2.0),
            record(2020, 1, 5, 8.0, -1.0),
            record(2020, 1, 6, 7.0, 1.0),
        ];
        let cell = &aggregate(&records, 10).cells[0];
        assert_eq!(cell.daily.len(), 2);
        assert_eq!(cell.daily[0].max, 10.0);
        assert_eq!(cell.daily[0].min, -1.0);
    }

    #[test]
    fn missing_values_are_ignored() {
        let records = vec![
            record(2020, 1, 1, f64::NAN, 2.0),
            record(2020, 1, 2, 8.0, f64::NAN),
            record(2020, 2, 1, f64::NAN, f64::NAN),
        ];
        let cells = aggregate(&records, 10).cells;
        assert_eq!(cells[0].max, 8.0);
        assert_eq!(cells[0].min, 2.0);
        assert_eq!(cells[0].daily.len(), 2);
        assert!(cells[1].max.is_nan());
        assert!(cells[1].min.is_nan());

        let range = GlobalRange::of(&cells);
        assert_eq!(range, GlobalRange { min: 2.0, max: 8.0 });
    }

    #[test]
    fn global_range_bounds_every_cell() {
        let records: Vec<_> = (1..=12)
            .flat_map(|m| (1..=3).map(move |d| record(2019, m, d, 10.0 + f64::from(m) + f64::from(d), f64::from(m) - f64::from(d))))
            .collect();
        let cells = aggregate(&records, 10).cells;
        let range = GlobalRange::of(&cells);
        for cell in &cells {
            assert!(range.min <= cell.min);
            assert!(cell.min <= cell.max);
            assert!(cell.max <= range.max);
        }
        assert_eq!(range.max, 25.0);
        assert_eq!(range.min, -2.0);
    }

    #[test]
    fn empty_range() {
        assert!(GlobalRange::of(&[]).is_empty());
        assert!(aggregate(&[], 10).cells.is_empty());
    }
}
