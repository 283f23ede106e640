use super::{text_or_empty, MonthTotal, MonthYear, TimeAxis};
use crate::dataset::{DateField, UnifiedTable, CATEGORY, SALES};
use crate::error::Result;
use arrow::array::Array;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySales {
    pub month_year: MonthYear,
    pub label: String,
    pub category: String,
    pub sales: f64,
}

/// Sales per (month-year, category) plus the per-month grand total.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SalesByCategory {
    /// Chronological, then by category name.
    pub rows: Vec<CategorySales>,
    /// Chronological.
    pub totals: Vec<MonthTotal>,
}

impl SalesByCategory {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Distinct categories, sorted.
    pub fn categories(&self) -> Vec<&str> {
        let mut out: Vec<&str> = self.rows.iter().map(|r| r.category.as_str()).collect();
        out.sort_unstable();
        out.dedup();
        out
    }

    pub fn total_for(&self, label: &str) -> Option<f64> {
        self.totals.iter().find(|t| t.label == label).map(|t| t.sales)
    }
}

pub fn sales_by_category(table: &UnifiedTable, field: DateField) -> Result<SalesByCategory> {
    let axis = TimeAxis::new(table, field)?;
    let categories = table.strings(CATEGORY)?;
    let sales = table.floats(SALES)?;

    let mut groups: BTreeMap<(MonthYear, &str), (&str, f64)> = BTreeMap::new();
    let mut totals: BTreeMap<MonthYear, (&str, f64)> = BTreeMap::new();
    for row in 0..table.num_rows() {
        let Some((key, label)) = axis.key(row)? else {
            continue;
        };
        let amount = if sales.is_null(row) { 0.0 } else { sales.value(row) };

        let group = groups
            .entry((key, text_or_empty(categories, row)))
            .or_insert((label, 0.0));
        group.1 += amount;
        totals.entry(key).or_insert((label, 0.0)).1 += amount;
    }

    Ok(SalesByCategory {
        rows: groups
            .into_iter()
            .map(|((month_year, category), (label, sales))| CategorySales {
                month_year,
                label: label.to_string(),
                category: category.to_string(),
                sales,
            })
            .collect(),
        totals: totals
            .into_iter()
            .map(|(month_year, (label, sales))| MonthTotal {
                month_year,
                label: label.to_string(),
                sales,
            })
            .collect(),
    })
}
