use super::spec::ChartSpec;
use super::TOTAL_SALES;
use crate::aggregate::SalesBySegment;
use plotly::{
    common::{AxisSide, Line, Marker, Mode, Title},
    layout::{Axis, AxisType, BarMode, CategoryOrder},
    Bar, Layout, Scatter,
};

pub const TITLE: &str = "Sales Over Time by Segment (%)";
const SEGMENT_COLORS: [&str; 4] = ["blue", "orange", "green", "red"];

/// Stacked percentage bars per segment on a 0-100 axis, total sales on a
/// secondary right-hand axis.
pub fn segment_share_chart(agg: &SalesBySegment) -> ChartSpec {
    let months: Vec<String> = agg.totals.iter().map(|t| t.label.clone()).collect();

    let layout = Layout::new()
        .bar_mode(BarMode::Relative)
        .x_axis(
            Axis::new()
                .type_(AxisType::Category)
                .category_order(CategoryOrder::Array)
                .category_array(months.clone()),
        )
        .y_axis(
            Axis::new()
                .title(Title::from("Percentage (%)"))
                .range(vec![0.0, 100.0]),
        )
        .y_axis2(
            Axis::new()
                .title(Title::from(TOTAL_SALES))
                .overlaying("y")
                .side(AxisSide::Right),
        );
    let mut chart = ChartSpec::new(TITLE, layout);

    for (i, segment) in agg.segments().into_iter().enumerate() {
        let (x, y): (Vec<String>, Vec<f64>) = agg
            .rows
            .iter()
            .filter(|r| r.segment == segment)
            .map(|r| (r.label.clone(), r.percentage))
            .unzip();
        chart.add_trace(
            Bar::new(x, y)
                .name(segment)
                .marker(Marker::new().color(SEGMENT_COLORS[i % SEGMENT_COLORS.len()]))
                .y_axis("y"),
        );
    }

    let totals: Vec<f64> = agg.totals.iter().map(|t| t.sales).collect();
    chart.add_trace(
        Scatter::new(months, totals)
            .name(TOTAL_SALES)
            .mode(Mode::LinesMarkers)
            .line(Line::new().color("black").width(2.0))
            .y_axis("y2"),
    );
    chart
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::{MonthTotal, MonthYear, SegmentShare};
    use serde_json::json;

    fn share(month: u32, segment: &str, sales: f64, month_total: f64) -> SegmentShare {
        let month_year = MonthYear::new(2024, month);
        SegmentShare {
            month_year,
            label: month_year.label(),
            segment: segment.into(),
            sales,
            month_total,
            percentage: sales / month_total * 100.0,
        }
    }

    #[test]
    fn colours_cycle_and_total_sits_on_the_secondary_axis() {
        let segments = ["S1", "S2", "S3", "S4", "S5"];
        let agg = SalesBySegment {
            rows: segments.iter().map(|s| share(3, *s, 20.0, 100.0)).collect(),
            totals: vec![MonthTotal {
                month_year: MonthYear::new(2024, 3),
                label: "Mar 2024".into(),
                sales: 100.0,
            }],
        };
        let chart = segment_share_chart(&agg);
        let json = chart.to_json();

        assert_eq!(chart.title(), "Sales Over Time by Segment (%)");
        assert_eq!(chart.trace_names().len(), 6);
        let colours: Vec<&str> = (0..5)
            .map(|i| json["data"][i]["marker"]["color"].as_str().unwrap())
            .collect();
        assert_eq!(colours, vec!["blue", "orange", "green", "red", "blue"]);
        assert_eq!(json["data"][0]["y"], json!([20.0]));

        let line = &json["data"][5];
        assert_eq!(line["name"], "Total Sales");
        assert_eq!(line["yaxis"], "y2");
        assert_eq!(line["y"], json!([100.0]));

        assert_eq!(json["layout"]["barmode"], "relative");
        assert_eq!(json["layout"]["yaxis"]["title"]["text"], "Percentage (%)");
        assert_eq!(json["layout"]["yaxis"]["range"], json!([0.0, 100.0]));
        assert_eq!(json["layout"]["yaxis2"]["overlaying"], "y");
        assert_eq!(json["layout"]["yaxis2"]["side"], "right");
    }

    #[test]
    fn empty_aggregate_is_a_valid_chart() {
        let chart = segment_share_chart(&SalesBySegment::default());
        assert_eq!(chart.title(), TITLE);
        assert_eq!(chart.trace_names(), vec![TOTAL_SALES]);
        assert_eq!(chart.point_counts(), vec![0]);
    }
}
