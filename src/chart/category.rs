use super::spec::ChartSpec;
use super::TOTAL_SALES;
use crate::aggregate::SalesByCategory;
use plotly::{
    common::{Line, Mode},
    layout::{Axis, AxisType, BarMode, CategoryOrder},
    Bar, Layout, Scatter,
};

pub const TITLE: &str = "Sales Over Time";

/// Grouped bars per category with a total-sales line on top.
pub fn sales_over_time_chart(agg: &SalesByCategory) -> ChartSpec {
    let months: Vec<String> = agg.totals.iter().map(|t| t.label.clone()).collect();

    let layout = Layout::new()
        .bar_mode(BarMode::Group)
        .x_axis(
            Axis::new()
                .type_(AxisType::Category)
                .category_order(CategoryOrder::Array)
                .category_array(months.clone()),
        );
    let mut chart = ChartSpec::new(TITLE, layout);

    for category in agg.categories() {
        let (x, y): (Vec<String>, Vec<f64>) = agg
            .rows
            .iter()
            .filter(|r| r.category == category)
            .map(|r| (r.label.clone(), r.sales))
            .unzip();
        chart.add_trace(Bar::new(x, y).name(category));
    }

    let totals: Vec<f64> = agg.totals.iter().map(|t| t.sales).collect();
    chart.add_trace(
        Scatter::new(months, totals)
            .name(TOTAL_SALES)
            .mode(Mode::LinesMarkers)
            .line(Line::new().color("green").width(2.0)),
    );
    chart
}
