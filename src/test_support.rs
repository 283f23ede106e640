//! Fixture helpers shared by the unit tests.

use crate::config::SourceConfig;
use crate::dataset::{load_dataset, UnifiedTable};
use crate::error::{DashboardError, Result};
use std::fs;
use tempfile::TempDir;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

pub(crate) fn init_test_logging() {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,salesdash=debug")),
        )
        .with_test_writer()
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

pub(crate) const REGIONS_CSV: &str = "Full Name,Abbreviation\n\
California,CA\n\
Texas,TX\n\
New York,NY\n\
Ontario,ON\n";

/// One sales line; every field is the raw CSV cell text.
#[derive(Debug, Clone, Copy)]
pub(crate) struct FixtureRow {
    pub order_date: &'static str,
    pub ship_date: &'static str,
    pub state: &'static str,
    pub city: &'static str,
    pub region: &'static str,
    pub category: &'static str,
    pub segment: &'static str,
    pub sales: &'static str,
    pub lat: &'static str,
    pub lng: &'static str,
}

impl Default for FixtureRow {
    fn default() -> Self {
        Self {
            order_date: "2024-06-15",
            ship_date: "2024-06-20",
            state: "Texas",
            city: "Austin",
            region: "Central",
            category: "Furniture",
            segment: "Consumer",
            sales: "100",
            lat: "30.27",
            lng: "-97.74",
        }
    }
}

pub(crate) fn sales_csv(rows: &[FixtureRow]) -> String {
    let mut out = String::from(
        "Row ID,Order Date,Ship Date,Segment,City,State/Province,Region,Category,Product Name,Sales,LAT,LNG\n",
    );
    for (i, r) in rows.iter().enumerate() {
        out.push_str(&format!(
            "{},{},{},{},{},{},{},{},\"Widget, large\",{},{},{}\n",
            i + 1,
            r.order_date,
            r.ship_date,
            r.segment,
            r.city,
            r.state,
            r.region,
            r.category,
            r.sales,
            r.lat,
            r.lng
        ));
    }
    out
}

/// Write both source files into a temp dir; the dir lives as long as the guard.
pub(crate) fn fixture_sources(rows: &[FixtureRow]) -> Result<(TempDir, SourceConfig)> {
    let io = |e: std::io::Error| DashboardError::data_load("fixture", e);
    let dir = tempfile::tempdir().map_err(io)?;
    let sales_path = dir.path().join("sales.csv");
    let regions_path = dir.path().join("regions.csv");
    fs::write(&sales_path, sales_csv(rows)).map_err(io)?;
    fs::write(&regions_path, REGIONS_CSV).map_err(io)?;

    let sources = SourceConfig {
        sales_path,
        regions_path,
        ..SourceConfig::default()
    };
    Ok((dir, sources))
}

pub(crate) fn load_fixture(rows: &[FixtureRow]) -> Result<UnifiedTable> {
    let (_dir, sources) = fixture_sources(rows)?;
    load_dataset(&sources)
}
