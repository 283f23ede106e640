// src/dataset/mod.rs

pub mod convert;
pub mod date_parser;
pub mod join;
pub mod read;

use crate::config::SourceConfig;
use crate::error::{DashboardError, Result};
use arrow::{
    array::{Array, ArrayRef, BooleanArray, Date32Array, Float64Array, Int32Array, StringArray},
    compute::{filter_record_batch, take},
    datatypes::{DataType, Field, Schema, SchemaRef},
    record_batch::RecordBatch,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

pub const ORDER_DATE: &str = "Order Date";
pub const SHIP_DATE: &str = "Ship Date";
pub const STATE: &str = "State/Province";
pub const CITY: &str = "City";
pub const REGION: &str = "Region";
pub const CATEGORY: &str = "Category";
pub const SEGMENT: &str = "Segment";
pub const SALES: &str = "Sales";
pub const LATITUDE: &str = "LAT";
pub const LONGITUDE: &str = "LNG";

const REQUIRED_SALES_COLUMNS: [&str; 10] = [
    ORDER_DATE, SHIP_DATE, STATE, CITY, REGION, CATEGORY, SEGMENT, SALES, LATITUDE, LONGITUDE,
];
const NUMERIC_COLUMNS: [&str; 3] = [SALES, LATITUDE, LONGITUDE];

/// Which of the two transaction dates drives filtering and the time axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateField {
    #[default]
    Order,
    Ship,
}

impl DateField {
    pub const ALL: [DateField; 2] = [DateField::Order, DateField::Ship];

    pub fn date_column(self) -> &'static str {
        match self {
            DateField::Order => ORDER_DATE,
            DateField::Ship => SHIP_DATE,
        }
    }

    pub fn year_column(self) -> &'static str {
        match self {
            DateField::Order => "Order Year",
            DateField::Ship => "Ship Year",
        }
    }

    pub fn month_column(self) -> &'static str {
        match self {
            DateField::Order => "Order Month",
            DateField::Ship => "Ship Month",
        }
    }

    pub fn label_column(self) -> &'static str {
        match self {
            DateField::Order => "Order Month Year",
            DateField::Ship => "Ship Month Year",
        }
    }
}

/// The joined, typed and date-enriched sales table.
///
/// Built once at startup and never mutated; every filter returns a new table.
#[derive(Debug, Clone)]
pub struct UnifiedTable {
    batch: RecordBatch,
    lookup_columns: Vec<String>,
}

impl UnifiedTable {
    pub fn new(batch: RecordBatch, lookup_columns: Vec<String>) -> Self {
        Self {
            batch,
            lookup_columns,
        }
    }

    pub fn batch(&self) -> &RecordBatch {
        &self.batch
    }

    pub fn schema(&self) -> SchemaRef {
        self.batch.schema()
    }

    pub fn num_rows(&self) -> usize {
        self.batch.num_rows()
    }

    pub fn is_empty(&self) -> bool {
        self.batch.num_rows() == 0
    }

    /// Columns that came from the region lookup.
    pub fn lookup_columns(&self) -> &[String] {
        &self.lookup_columns
    }

    pub fn column(&self, name: &str) -> Result<&ArrayRef> {
        let idx = self
            .batch
            .schema()
            .index_of(name)
            .map_err(|_| DashboardError::missing_column(name))?;
        Ok(self.batch.column(idx))
    }

    fn typed<T: Array + 'static>(&self, name: &str, expected: &str) -> Result<&T> {
        self.column(name)?
            .as_any()
            .downcast_ref::<T>()
            .ok_or_else(|| DashboardError::wrong_type(name, expected))
    }

    pub fn strings(&self, name: &str) -> Result<&StringArray> {
        self.typed(name, "text")
    }

    pub fn floats(&self, name: &str) -> Result<&Float64Array> {
        self.typed(name, "Float64")
    }

    pub fn ints(&self, name: &str) -> Result<&Int32Array> {
        self.typed(name, "Int32")
    }

    pub fn dates(&self, name: &str) -> Result<&Date32Array> {
        self.typed(name, "Date32")
    }

    /// Keep the rows where `mask` is true.
    pub fn filter(&self, mask: &BooleanArray) -> Result<UnifiedTable> {
        let batch = filter_record_batch(&self.batch, mask)
            .map_err(|e| DashboardError::from_arrow("<row mask>", e))?;
        Ok(Self::new(batch, self.lookup_columns.clone()))
    }

    pub fn summary(&self) -> Result<DatasetSummary> {
        let dates = self.dates(ORDER_DATE)?;
        let span = (0..dates.len())
            .filter(|&i| dates.is_valid(i))
            .map(|i| dates.value(i))
            .fold(None, |acc: Option<(i32, i32)>, d| match acc {
                None => Some((d, d)),
                Some((lo, hi)) => Some((lo.min(d), hi.max(d))),
            });

        let lookups = self
            .lookup_columns
            .iter()
            .map(|name| self.column(name))
            .collect::<Result<Vec<_>>>()?;
        let rows_without_lookup = if lookups.is_empty() {
            0
        } else {
            (0..self.num_rows())
                .filter(|&i| lookups.iter().all(|c| c.is_null(i)))
                .count()
        };

        let lat = self.floats(LATITUDE)?;
        let lng = self.floats(LONGITUDE)?;
        let rows_without_coordinates = (0..self.num_rows())
            .filter(|&i| lat.is_null(i) || lng.is_null(i))
            .count();

        Ok(DatasetSummary {
            rows: self.num_rows(),
            columns: self.batch.num_columns(),
            first_order_date: span.and_then(|(lo, _)| date_parser::from_date32(lo)),
            last_order_date: span.and_then(|(_, hi)| date_parser::from_date32(hi)),
            rows_without_lookup,
            rows_without_coordinates,
        })
    }
}

/// Diagnostics over a loaded table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatasetSummary {
    pub rows: usize,
    pub columns: usize,
    pub first_order_date: Option<NaiveDate>,
    pub last_order_date: Option<NaiveDate>,
    pub rows_without_lookup: usize,
    pub rows_without_coordinates: usize,
}

/// Read both sources, left-join the region lookup onto the sales rows,
/// type the known columns, derive calendar fields for both dates and sort
/// by order date.
#[tracing::instrument(level = "info", skip(sources), fields(sales = %sources.sales_path.display()))]
pub fn load_dataset(sources: &SourceConfig) -> Result<UnifiedTable> {
    const SALES_SOURCE: &str = "sales";
    const REGIONS_SOURCE: &str = "regions";

    // 1) raw text tables
    let sales = read::read_text_csv(&sources.sales_path, SALES_SOURCE)?;
    read::require_columns(&sales, SALES_SOURCE, &REQUIRED_SALES_COLUMNS)?;
    read::require_columns(&sales, SALES_SOURCE, &[sources.sales_key.as_str()])?;
    let regions = read::read_text_csv(&sources.regions_path, REGIONS_SOURCE)?;
    read::require_columns(&regions, REGIONS_SOURCE, &[sources.lookup_key.as_str()])?;
    info!(
        sales_rows = sales.num_rows(),
        region_rows = regions.num_rows(),
        "sources read"
    );

    // 2) left join on the raw text keys
    let joined = join::left_join(&sales, &sources.sales_key, &regions, &sources.lookup_key)
        .map_err(|e| DashboardError::data_load(REGIONS_SOURCE, e))?;
    if joined.unmatched > 0 {
        info!(rows = joined.unmatched, "sales rows without a region match");
    }

    // 3) type the sales columns
    let sales_schema = sales.schema();
    let mut fields: Vec<Field> = Vec::with_capacity(sales.num_columns() + joined.fields.len() + 6);
    let mut columns: Vec<ArrayRef> = Vec::with_capacity(fields.capacity());
    for (field, column) in sales_schema.fields().iter().zip(sales.columns()) {
        let name = field.name().as_str();
        let text = column
            .as_any()
            .downcast_ref::<StringArray>()
            .ok_or_else(|| DashboardError::data_load(SALES_SOURCE, format!("`{}` is not text", name)))?;

        let (data_type, typed) = if DateField::ALL.iter().any(|f| f.date_column() == name) {
            let (dates, unparsed) = convert::to_date_column(text);
            if unparsed > 0 {
                warn!(column = name, unparsed, "unparseable dates left null");
            }
            (DataType::Date32, dates)
        } else if NUMERIC_COLUMNS.contains(&name) {
            (DataType::Float64, convert::to_float_column(text))
        } else {
            (DataType::Utf8, column.clone())
        };
        fields.push(Field::new(name, data_type, true));
        columns.push(typed);
    }

    // 4) lookup columns
    let lookup_columns: Vec<String> = joined.fields.iter().map(|f| f.name().clone()).collect();
    fields.extend(joined.fields);
    columns.extend(joined.columns);

    // 5) calendar fields for each date
    for field in DateField::ALL {
        let idx = sales_schema
            .index_of(field.date_column())
            .map_err(|e| DashboardError::data_load(SALES_SOURCE, e))?;
        let dates = columns[idx]
            .as_any()
            .downcast_ref::<Date32Array>()
            .ok_or_else(|| DashboardError::data_load(SALES_SOURCE, "date conversion failed"))?;
        let cal = convert::calendar_columns(dates);
        fields.push(Field::new(field.year_column(), DataType::Int32, true));
        fields.push(Field::new(field.month_column(), DataType::Utf8, true));
        fields.push(Field::new(field.label_column(), DataType::Utf8, true));
        columns.extend([cal.year, cal.month, cal.label]);
    }

    let batch = RecordBatch::try_new(Arc::new(Schema::new(fields)), columns)
        .map_err(|e| DashboardError::data_load(SALES_SOURCE, e))?;

    // 6) ascending by order date
    let batch = sort_by_date(&batch, ORDER_DATE).map_err(|e| DashboardError::data_load(SALES_SOURCE, e))?;

    info!(
        rows = batch.num_rows(),
        columns = batch.num_columns(),
        "dataset loaded"
    );
    Ok(UnifiedTable::new(batch, lookup_columns))
}

/// Stable ascending sort on a `Date32` column, nulls last.
fn sort_by_date(batch: &RecordBatch, column: &str) -> Result<RecordBatch> {
    let idx = batch
        .schema()
        .index_of(column)
        .map_err(|_| DashboardError::missing_column(column))?;
    let dates = batch
        .column(idx)
        .as_any()
        .downcast_ref::<Date32Array>()
        .ok_or_else(|| DashboardError::wrong_type(column, "Date32"))?;

    let mut order: Vec<u32> = (0..batch.num_rows() as u32).collect();
    order.sort_by_key(|&row| {
        let row = row as usize;
        if dates.is_null(row) {
            (true, 0)
        } else {
            (false, dates.value(row))
        }
    });
    let indices = arrow::array::UInt32Array::from(order);

    let columns = batch
        .columns()
        .iter()
        .map(|c| take(c.as_ref(), &indices, None))
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| DashboardError::from_arrow(column, e))?;
    RecordBatch::try_new(batch.schema(), columns).map_err(|e| DashboardError::from_arrow(column, e))
}
