//! Chart builders: aggregate in, Plotly [`ChartSpec`] out.

pub mod category;
pub mod geo;
pub mod segment;
pub mod spec;

pub use category::sales_over_time_chart;
pub use geo::sales_by_region_chart;
pub use segment::segment_share_chart;
pub use spec::ChartSpec;

pub const TOTAL_SALES: &str = "Total Sales";
