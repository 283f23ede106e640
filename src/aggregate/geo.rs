use super::text_or_empty;
use crate::dataset::{UnifiedTable, CITY, LATITUDE, LONGITUDE, REGION, SALES, STATE};
use crate::error::Result;
use arrow::array::Array;
use serde::Serialize;
use tracing::debug;

/// One transaction placed on the map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
    pub sales: f64,
    pub region: String,
    pub city: String,
    pub state: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GeoPoints {
    pub points: Vec<GeoPoint>,
    /// Rows left off the map for missing or out-of-range coordinates or missing sales.
    pub dropped: usize,
}

impl GeoPoints {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Distinct regions in order of first appearance.
    pub fn regions(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for p in &self.points {
            if !out.contains(&p.region.as_str()) {
                out.push(&p.region);
            }
        }
        out
    }

    pub fn max_sales(&self) -> f64 {
        self.points.iter().map(|p| p.sales).fold(0.0, f64::max)
    }
}

fn valid_coordinates(lat: f64, lon: f64) -> bool {
    lat.is_finite() && lon.is_finite() && (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lon)
}

/// Per-row map points; rows that cannot be placed are skipped, not reported as errors.
pub fn geo_points(table: &UnifiedTable) -> Result<GeoPoints> {
    let lat = table.floats(LATITUDE)?;
    let lon = table.floats(LONGITUDE)?;
    let sales = table.floats(SALES)?;
    let region = table.strings(REGION)?;
    let city = table.strings(CITY)?;
    let state = table.strings(STATE)?;

    let mut out = GeoPoints::default();
    for row in 0..table.num_rows() {
        if lat.is_null(row) || lon.is_null(row) || sales.is_null(row) {
            out.dropped += 1;
            continue;
        }
        let (la, lo) = (lat.value(row), lon.value(row));
        if !valid_coordinates(la, lo) {
            out.dropped += 1;
            continue;
        }
        out.points.push(GeoPoint {
            lat: la,
            lon: lo,
            sales: sales.value(row).max(0.0),
            region: text_or_empty(region, row).to_string(),
            city: text_or_empty(city, row).to_string(),
            state: text_or_empty(state, row).to_string(),
        });
    }

    if out.dropped > 0 {
        debug!(dropped = out.dropped, kept = out.points.len(), "rows left off the map");
    }
    Ok(out)
}
