use super::{text_or_empty, MonthTotal, MonthYear, TimeAxis};
use crate::dataset::{DateField, UnifiedTable, SALES, SEGMENT};
use crate::error::Result;
use arrow::array::Array;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentShare {
    pub month_year: MonthYear,
    pub label: String,
    pub segment: String,
    pub sales: f64,
    /// All segments' sales in the same month-year.
    pub month_total: f64,
    /// `sales / month_total * 100`; 0 when the month total is 0.
    pub percentage: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SalesBySegment {
    /// Chronological, then by segment name.
    pub rows: Vec<SegmentShare>,
    /// Chronological.
    pub totals: Vec<MonthTotal>,
}

impl SalesBySegment {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Distinct segments in order of first appearance.
    pub fn segments(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for row in &self.rows {
            if !out.contains(&row.segment.as_str()) {
                out.push(&row.segment);
            }
        }
        out
    }

    pub fn percentage_sum(&self, label: &str) -> f64 {
        self.rows
            .iter()
            .filter(|r| r.label == label)
            .map(|r| r.percentage)
            .sum()
    }
}

pub fn sales_by_segment(table: &UnifiedTable, field: DateField) -> Result<SalesBySegment> {
    let axis = TimeAxis::new(table, field)?;
    let segments = table.strings(SEGMENT)?;
    let sales = table.floats(SALES)?;

    let mut groups: BTreeMap<(MonthYear, &str), (&str, f64)> = BTreeMap::new();
    for row in 0..table.num_rows() {
        let Some((key, label)) = axis.key(row)? else {
            continue;
        };
        let amount = if sales.is_null(row) { 0.0 } else { sales.value(row) };
        groups
            .entry((key, text_or_empty(segments, row)))
            .or_insert((label, 0.0))
            .1 += amount;
    }

    let mut totals: BTreeMap<MonthYear, (&str, f64)> = BTreeMap::new();
    for ((key, _), (label, amount)) in &groups {
        totals.entry(*key).or_insert((*label, 0.0)).1 += *amount;
    }
    for (key, (label, total)) in &totals {
        if *total == 0.0 && groups.iter().any(|((k, _), (_, s))| k == key && *s != 0.0) {
            debug!(month = %label, "segment sales cancel out, percentages reported as 0");
        }
    }

    let rows = groups
        .iter()
        .map(|((month_year, segment), (label, sales))| {
            let month_total = totals.get(month_year).map_or(0.0, |t| t.1);
            let percentage = if month_total == 0.0 {
                0.0
            } else {
                sales / month_total * 100.0
            };
            SegmentShare {
                month_year: *month_year,
                label: label.to_string(),
                segment: segment.to_string(),
                sales: *sales,
                month_total,
                percentage,
            }
        })
        .collect();

    Ok(SalesBySegment {
        rows,
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{init_test_logging, load_fixture, FixtureRow};

    fn mixed_table() -> Result<UnifiedTable> {
        load_fixture(&[
            FixtureRow {
                order_date: "2024-03-01",
                segment: "Consumer",
                sales: "33.3",
                ..FixtureRow::default()
            },
            FixtureRow {
                order_date: "2024-03-09",
                segment: "Corporate",
                sales: "41.17",
                ..FixtureRow::default()
            },
            FixtureRow {
                order_date: "2024-03-18",
                segment: "Home Office",
                sales: "7.01",
                ..FixtureRow::default()
            },
            FixtureRow {
                order_date: "2024-03-28",
                segment: "Consumer",
                sales: "0.99",
                ..FixtureRow::default()
            },
            FixtureRow {
                order_date: "2024-01-15",
                segment: "Home Office",
                sales: "250",
                ..FixtureRow::default()
            },
            FixtureRow {
                order_date: "2024-01-16",
                segment: "Consumer",
                sales: "750",
                ..FixtureRow::default()
            },
        ])
    }

    #[test]
    fn percentages_sum_to_one_hundred_per_month() -> Result<()> {
        let agg = sales_by_segment(&mixed_table()?, DateField::Order)?;
        assert_eq!(agg.totals.len(), 2);
        for total in &agg.totals {
            let sum = agg.percentage_sum(&total.label);
            assert!((sum - 100.0).abs() < 0.01, "{} sums to {}", total.label, sum);
        }
        Ok(())
    }

    #[test]
    fn shares_and_totals() -> Result<()> {
        let agg = sales_by_segment(&mixed_table()?, DateField::Order)?;

        let jan: Vec<&SegmentShare> = agg.rows.iter().filter(|r| r.label == "Jan 2024").collect();
        assert_eq!(jan.len(), 2);
        assert_eq!(jan[0].segment, "Consumer");
        assert_eq!(jan[0].percentage, 75.0);
        assert_eq!(jan[1].segment, "Home Office");
        assert_eq!(jan[1].percentage, 25.0);
        assert_eq!(jan[1].month_total, 1000.0);

        assert_eq!(agg.totals[0].label, "Jan 2024");
        assert_eq!(agg.totals[0].sales, 1000.0);
        assert_eq!(agg.totals[1].label, "Mar 2024");
        assert!((agg.totals[1].sales - 82.47).abs() < 1e-9);
        assert_eq!(agg.segments(), vec!["Consumer", "Home Office", "Corporate"]);
        Ok(())
    }

    #[test]
    fn zero_sales_month_has_zero_percentages() -> Result<()> {
        let table = load_fixture(&[
            FixtureRow {
                segment: "Consumer",
                sales: "0",
                ..FixtureRow::default()
            },
            FixtureRow {
                segment: "Corporate",
                sales: "0",
                ..FixtureRow::default()
            },
        ])?;
        let agg = sales_by_segment(&table, DateField::Order)?;
        assert_eq!(agg.rows.len(), 2);
        assert!(agg.rows.iter().all(|r| r.percentage == 0.0));
        Ok(())
    }

    #[test]
    fn cancelling_segments_report_zero_percentages() -> Result<()> {
        init_test_logging();
        let table = load_fixture(&[
            FixtureRow {
                order_date: "2024-06-03",
                segment: "Consumer",
                sales: "50",
                ..FixtureRow::default()
            },
            FixtureRow {
                order_date: "2024-06-20",
                segment: "Corporate",
                sales: "-50",
                ..FixtureRow::default()
            },
        ])?;
        let agg = sales_by_segment(&table, DateField::Order)?;
        assert_eq!(agg.totals.len(), 1);
        assert_eq!(agg.totals[0].sales, 0.0);
        let sales: Vec<f64> = agg.rows.iter().map(|r| r.sales).collect();
        assert_eq!(sales, vec![50.0, -50.0]);
        assert!(agg.rows.iter().all(|r| r.percentage == 0.0 && r.month_total == 0.0));
        Ok(())
    }
}
