pub mod aggregate;
pub mod chart;
pub mod config;
pub mod controller;
pub mod dataset;
pub mod error;
pub mod filter;
pub mod shell;

#[cfg(test)]
pub(crate) mod test_support;

pub use chart::ChartSpec;
pub use config::DashboardConfig;
pub use controller::{
    initial_render, render, AppState, DashboardSession, DashboardView, DateRange, RangeRequest,
};
pub use dataset::{load_dataset, DateField, UnifiedTable};
pub use error::{DashboardError, Result};
pub use filter::{filter_by_date, DateInput};
