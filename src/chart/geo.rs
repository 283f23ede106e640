use super::spec::ChartSpec;
use crate::aggregate::GeoPoints;
use plotly::{
    common::{Marker, Mode, SizeMode, Title},
    layout::{Center, Legend, Mapbox, MapboxStyle},
    Layout, ScatterMapbox,
};

pub const TITLE: &str = "Sales by Region";
/// Roughly between the US and Canada.
pub const MAP_CENTER: (f64, f64) = (45.0, -95.0);
pub const MAP_ZOOM: u8 = 3;
/// Largest bubble diameter in pixels.
const MAX_MARKER_SIZE: f64 = 20.0;
const HOVER_TEMPLATE: &str = "%{text}<br>Sales=%{marker.size}<extra></extra>";

/// Area-mode size reference so the largest sale draws at `MAX_MARKER_SIZE`.
fn size_reference(max_sales: f64) -> usize {
    let reference = 2.0 * max_sales / (MAX_MARKER_SIZE * MAX_MARKER_SIZE);
    (reference.round() as usize).max(1)
}

/// Bubble map: one trace per region, bubble area proportional to sales.
pub fn sales_by_region_chart(geo: &GeoPoints) -> ChartSpec {
    let layout = Layout::new()
        .mapbox(
            Mapbox::new()
                .style(MapboxStyle::OpenStreetMap)
                .center(Center::new(MAP_CENTER.0, MAP_CENTER.1))
                .zoom(MAP_ZOOM),
        )
        .legend(Legend::new().title(Title::from("Region")));
    let mut chart = ChartSpec::new(TITLE, layout);

    let size_ref = size_reference(geo.max_sales());
    for region in geo.regions() {
        let points: Vec<_> = geo.points.iter().filter(|p| p.region == region).collect();
        let lat: Vec<f64> = points.iter().map(|p| p.lat).collect();
        let lon: Vec<f64> = points.iter().map(|p| p.lon).collect();
        let sizes: Vec<usize> = points.iter().map(|p| p.sales.round() as usize).collect();
        let hover: Vec<String> = points
            .iter()
            .map(|p| format!("{}, {}", p.city, p.state))
            .collect();

        chart.add_trace(
            ScatterMapbox::new(lat, lon)
                .name(region)
                .mode(Mode::Markers)
                .marker(
                    Marker::new()
                        .size_array(sizes)
                        .size_mode(SizeMode::Area)
                        .size_ref(size_ref),
                )
                .text_array(hover)
                .hover_template(HOVER_TEMPLATE),
        );
    }
    chart
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::GeoPoint;
    use serde_json::json;

    fn point(region: &str, sales: f64) -> GeoPoint {
        GeoPoint {
            lat: 40.0,
            lon: -100.0,
            sales,
            region: region.into(),
            city: "Wichita".into(),
            state: "Kansas".into(),
        }
    }

    #[test]
    fn one_trace_per_region_sized_by_sales() {
        let geo = GeoPoints {
            points: vec![point("West", 50.0), point("East", 200.0), point("West", 10.0)],
            dropped: 0,
        };
        let chart = sales_by_region_chart(&geo);
        let json = chart.to_json();

        assert_eq!(chart.title(), "Sales by Region");
        assert_eq!(chart.trace_names(), vec!["West", "East"]);
        assert_eq!(chart.point_counts(), vec![2, 1]);

        let west = &json["data"][0];
        assert_eq!(west["type"], "scattermapbox");
        assert_eq!(west["marker"]["size"], json!([50, 10]));
        assert_eq!(west["text"], json!(["Wichita, Kansas", "Wichita, Kansas"]));

        assert_eq!(json["layout"]["mapbox"]["style"], "open-street-map");
        assert_eq!(json["layout"]["mapbox"]["zoom"], 3);
        assert_eq!(json["layout"]["mapbox"]["center"]["lat"], 45.0);
        assert_eq!(json["layout"]["mapbox"]["center"]["lon"], -95.0);
    }

    #[test]
    fn size_reference_scales_to_the_largest_sale() {
        assert_eq!(size_reference(0.0), 1);
        assert_eq!(size_reference(200.0), 1);
        assert_eq!(size_reference(20_000.0), 100);
    }

    #[test]
    fn empty_points_is_a_valid_map() {
        let chart = sales_by_region_chart(&GeoPoints::default());
        assert_eq!(chart.title(), TITLE);
        assert!(chart.trace_names().is_empty());
        assert_eq!(chart.to_json()["layout"]["mapbox"]["style"], "open-street-map");
    }
}
