//! Daily and weekly order quantity aggregation.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{Datelike, Duration, NaiveDate};

use super::SummaryError;
use super::columns::OrderColumns;
use crate::tabular::{Cell, TabularDataset};

/// Grouping key for weekly totals.
///
/// Keys order integers first, then dates, then free-form labels.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum WeekKey {
    Number(i64),
    Date(NaiveDate),
    Label(String),
}

impl fmt::Display for WeekKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeekKey::Number(n) => write!(f, "{n}"),
            WeekKey::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            WeekKey::Label(s) => f.write_str(s),
        }
    }
}

/// Aggregated order statistics.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregationResult {
    /// Number of rows, not the sum of quantities.
    pub total_count: u64,
    /// Summed quantity per calendar day, ascending by date.
    pub daily_totals: Vec<(NaiveDate, f64)>,
    /// Summed quantity per week, ascending by key.
    pub weekly_totals: Vec<(WeekKey, f64)>,
    /// Day with the largest total; the earliest such day on ties.
    pub max_day: Option<(NaiveDate, f64)>,
}

impl AggregationResult {
    /// Daily totals as `(label, value)` pairs.
    pub fn daily_series(&self) -> Vec<(String, f64)> {
        self.daily_totals
            .iter()
            .map(|(day, total)| (day.format("%Y-%m-%d").to_string(), *total))
            .collect()
    }

    /// Weekly totals as `(label, value)` pairs.
    pub fn weekly_series(&self) -> Vec<(String, f64)> {
        self.weekly_totals
            .iter()
            .map(|(week, total)| (week.to_string(), *total))
            .collect()
    }
}

/// Aggregates order quantities by day and by week.
///
/// Null quantities count as zero. A quantity that is not a finite number
/// (including `NaN` and `Infinity` text) fails the whole aggregation. Rows
/// with a null date are
/// counted but left out of the daily and weekly groups.
pub fn summarize(
    dataset: &TabularDataset,
    columns: &OrderColumns,
) -> Result<AggregationResult, SummaryError> {
    let mut daily: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    let mut weekly: BTreeMap<WeekKey, f64> = BTreeMap::new();

    for (row_index, row) in dataset.rows().iter().enumerate() {
        let quantity = quantity_of(&row[columns.quantity.index], row_index)?;
        let day = day_of(&row[columns.date.index], row_index)?;

        if let Some(day) = day {
            *daily.entry(day).or_default() += quantity;
        }

        let week = match &columns.week {
            Some(week) => week_key_of(&row[week.index]),
            None => day.map(|d| WeekKey::Date(week_start(d))),
        };
        if let Some(week) = week {
            *weekly.entry(week).or_default() += quantity;
        }
    }

    let daily_totals: Vec<(NaiveDate, f64)> = daily.into_iter().collect();
    let max_day = daily_totals
        .iter()
        .copied()
        .fold(None, |best: Option<(NaiveDate, f64)>, entry| match best {
            Some(b) if b.1 >= entry.1 => Some(b),
            _ => Some(entry),
        });

    Ok(AggregationResult {
        total_count: dataset.len() as u64,
        daily_totals,
        weekly_totals: weekly.into_iter().collect(),
        max_day,
    })
}

/// Monday of the ISO week containing `day`.
pub fn week_start(day: NaiveDate) -> NaiveDate {
    day - Duration::days(i64::from(day.weekday().num_days_from_monday()))
}

/// Parses the calendar day from a date-like text value.
///
/// Accepts `YYYY-MM-DD` optionally followed by a time part separated by a
/// space or `T`; the written date is used as is, offsets are not applied.
pub fn parse_day(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    let (head, rest) = text.split_at_checked(10)?;
    if !(rest.is_empty() || rest.starts_with([' ', 'T'])) {
        return None;
    }
    NaiveDate::parse_from_str(head, "%Y-%m-%d").ok()
}

fn quantity_of(cell: &Cell, row: usize) -> Result<f64, SummaryError> {
    let invalid = || SummaryError::InvalidQuantity {
        row,
        value: cell.to_string(),
    };
    let quantity = match cell {
        Cell::Null => 0.0,
        Cell::Integer(i) => *i as f64,
        Cell::Float(f) => *f,
        Cell::Text(s) => s.trim().parse::<f64>().map_err(|_| invalid())?,
        Cell::Bool(_) => return Err(invalid()),
    };
    if quantity.is_finite() {
        Ok(quantity)
    } else {
        Err(invalid())
    }
}

fn day_of(cell: &Cell, row: usize) -> Result<Option<NaiveDate>, SummaryError> {
    match cell {
        Cell::Null => Ok(None),
        Cell::Text(s) => parse_day(s)
            .map(Some)
            .ok_or_else(|| SummaryError::InvalidDate {
                row,
                value: s.clone(),
            }),
        other => Err(SummaryError::InvalidDate {
            row,
            value: other.to_string(),
        }),
    }
}

fn week_key_of(cell: &Cell) -> Option<WeekKey> {
    match cell {
        Cell::Null => None,
        Cell::Integer(i) => Some(WeekKey::Number(*i)),
        Cell::Float(f) if f.fract() == 0.0 && f.is_finite() => Some(WeekKey::Number(*f as i64)),
        Cell::Text(s) => {
            let s = s.trim();
            if let Ok(n) = s.parse::<i64>() {
                Some(WeekKey::Number(n))
            } else if let Some(d) = parse_day(s) {
                Some(WeekKey::Date(d))
            } else {
                Some(WeekKey::Label(s.to_string()))
            }
        }
        other => Some(WeekKey::Label(other.to_string())),
    }
}
