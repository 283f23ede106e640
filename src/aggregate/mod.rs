//! Per-chart aggregates over a filtered [`UnifiedTable`].
//!
//! Each aggregate is rebuilt on every render and handed straight to its
//! chart builder. Time-series keys order by (year, calendar month), never
//! by the `"Jan 2024"` label text.

pub mod category;
pub mod geo;
pub mod segment;

pub use category::{sales_by_category, CategorySales, SalesByCategory};
pub use geo::{geo_points, GeoPoint, GeoPoints};
pub use segment::{sales_by_segment, SalesBySegment, SegmentShare};

use crate::dataset::{date_parser, DateField, UnifiedTable};
use crate::error::{DashboardError, Result};
use arrow::array::{Array, Int32Array, StringArray};
use serde::Serialize;

/// Calendar month key; orders chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct MonthYear {
    pub year: i32,
    /// 1..=12
    pub month: u32,
}

impl MonthYear {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    pub fn month_abbreviation(&self) -> &'static str {
        date_parser::MONTH_ABBREVIATIONS[(self.month.clamp(1, 12) - 1) as usize]
    }

    pub fn label(&self) -> String {
        format!("{} {}", self.month_abbreviation(), self.year)
    }
}

/// Grand total of one month-year across the whole dimension.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthTotal {
    pub month_year: MonthYear,
    pub label: String,
    pub sales: f64,
}

/// The year / month / label columns of one date field.
pub(crate) struct TimeAxis<'a> {
    field: DateField,
    years: &'a Int32Array,
    months: &'a StringArray,
    labels: &'a StringArray,
}

impl<'a> TimeAxis<'a> {
    pub(crate) fn new(table: &'a UnifiedTable, field: DateField) -> Result<Self> {
        Ok(Self {
            field,
            years: table.ints(field.year_column())?,
            months: table.strings(field.month_column())?,
            labels: table.strings(field.label_column())?,
        })
    }

    /// Key and label of `row`, or `None` when its date is null.
    pub(crate) fn key(&self, row: usize) -> Result<Option<(MonthYear, &'a str)>> {
        if self.years.is_null(row) || self.months.is_null(row) || self.labels.is_null(row) {
            return Ok(None);
        }
        let month_text = self.months.value(row);
        let month = date_parser::month_number(month_text).ok_or_else(|| DashboardError::Schema {
            column: self.field.month_column().to_string(),
            reason: format!("unrecognised month `{}`", month_text),
        })?;
        Ok(Some((
            MonthYear::new(self.years.value(row), month),
            self.labels.value(row),
        )))
    }
}

/// Value of a nullable text cell, empty when null.
pub(crate) fn text_or_empty(column: &StringArray, row: usize) -> &str {
    if column.is_null(row) {
        ""
    } else {
        column.value(row)
    }
}
