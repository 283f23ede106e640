// src/filter.rs

use crate::dataset::{date_parser, UnifiedTable};
use crate::error::{DashboardError, Result};
use arrow::array::{Array, BooleanArray};
use chrono::NaiveDate;
use tracing::debug;

/// A range boundary as it arrives from the date picker: either an already
/// parsed date or ISO text (`2024-01-01`, `2024-01-01T00:00:00`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateInput {
    Date(NaiveDate),
    Text(String),
}

impl DateInput {
    pub fn resolve(&self) -> Result<NaiveDate> {
        match self {
            DateInput::Date(date) => Ok(*date),
            DateInput::Text(text) => date_parser::parse_iso_date(text)
                .ok_or_else(|| DashboardError::date_parse(text.as_str())),
        }
    }
}

impl From<NaiveDate> for DateInput {
    fn from(date: NaiveDate) -> Self {
        DateInput::Date(date)
    }
}

impl From<&str> for DateInput {
    fn from(text: &str) -> Self {
        DateInput::Text(text.to_string())
    }
}

impl From<String> for DateInput {
    fn from(text: String) -> Self {
        DateInput::Text(text)
    }
}

/// Rows of `table` whose `column` date lies in `[start, end]`, both ends
/// inclusive. Null dates never match and an inverted range matches nothing.
pub fn filter_by_date(
    table: &UnifiedTable,
    column: &str,
    start: impl Into<DateInput>,
    end: impl Into<DateInput>,
) -> Result<UnifiedTable> {
    let start = start.into().resolve()?;
    let end = end.into().resolve()?;
    filter_between(table, column, start, end)
}

pub fn filter_between(
    table: &UnifiedTable,
    column: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<UnifiedTable> {
    let dates = table.dates(column)?;
    let lo = date_parser::to_date32(start);
    let hi = date_parser::to_date32(end);

    let mask: BooleanArray = (0..dates.len())
        .map(|i| Some(dates.is_valid(i) && (lo..=hi).contains(&dates.value(i))))
        .collect();
    let filtered = table.filter(&mask)?;

    debug!(
        column,
        %start,
        %end,
        kept = filtered.num_rows(),
        of = table.num_rows(),
        "filtered by date"
    );
    Ok(filtered)
}
