// src/controller.rs

use crate::aggregate::{geo_points, sales_by_category, sales_by_segment};
use crate::chart::{sales_by_region_chart, sales_over_time_chart, segment_share_chart, ChartSpec};
use crate::config::RangeConfig;
use crate::dataset::{DateField, UnifiedTable};
use crate::error::Result;
use crate::filter::{filter_between, DateInput};
use chrono::NaiveDate;
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

pub const DASHBOARD_HEADING: &str = "Superstore Sales Dashboard";

/// The three displayed charts, in page order.
pub type Charts = [ChartSpec; 3];

/// Inclusive date range. `start > end` is allowed and selects nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }
}

impl From<RangeConfig> for DateRange {
    fn from(cfg: RangeConfig) -> Self {
        Self::new(cfg.start, cfg.end)
    }
}

/// The two raw boundary values submitted from the date picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeRequest {
    pub start: DateInput,
    pub end: DateInput,
}

impl RangeRequest {
    pub fn new(start: impl Into<DateInput>, end: impl Into<DateInput>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }

    pub fn resolve(&self) -> Result<DateRange> {
        Ok(DateRange::new(self.start.resolve()?, self.end.resolve()?))
    }
}

/// Everything the page remembers between submits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AppState {
    pub range: DateRange,
    /// Successful submits since startup.
    pub submissions: u64,
}

/// filter → aggregate → chart, for all three charts.
pub fn build_charts(table: &UnifiedTable, field: DateField, range: DateRange) -> Result<Charts> {
    let filtered = filter_between(table, field.date_column(), range.start, range.end)?;
    let by_category = sales_by_category(&filtered, field)?;
    let by_segment = sales_by_segment(&filtered, field)?;
    let geo = geo_points(&filtered)?;
    debug!(
        rows = filtered.num_rows(),
        months = by_category.totals.len(),
        points = geo.points.len(),
        "aggregated"
    );
    Ok([
        sales_over_time_chart(&by_category),
        segment_share_chart(&by_segment),
        sales_by_region_chart(&geo),
    ])
}

pub fn initial_render(
    table: &UnifiedTable,
    field: DateField,
    range: DateRange,
) -> Result<(AppState, Charts)> {
    let charts = build_charts(table, field, range)?;
    Ok((
        AppState {
            range,
            submissions: 0,
        },
        charts,
    ))
}

/// One submit: resolve the requested range and rebuild every chart.
///
/// On error nothing is returned, so the caller keeps showing the charts it
/// already has.
#[tracing::instrument(level = "debug", skip(table, state), fields(submissions = state.submissions))]
pub fn render(
    table: &UnifiedTable,
    field: DateField,
    state: &AppState,
    request: RangeRequest,
) -> Result<(AppState, Charts)> {
    let range = request.resolve()?;
    let charts = build_charts(table, field, range)?;
    Ok((
        AppState {
            range,
            submissions: state.submissions + 1,
        },
        charts,
    ))
}

/// A live dashboard: the shared table plus what is currently on screen.
pub struct DashboardSession {
    table: Arc<UnifiedTable>,
    field: DateField,
    state: AppState,
    charts: Charts,
}

impl DashboardSession {
    pub fn start(table: Arc<UnifiedTable>, field: DateField, range: DateRange) -> Result<Self> {
        let (state, charts) = initial_render(&table, field, range)?;
        Ok(Self {
            table,
            field,
            state,
            charts,
        })
    }

    /// Replace state and all three charts together, or nothing on error.
    pub fn submit(
        &mut self,
        start: impl Into<DateInput>,
        end: impl Into<DateInput>,
    ) -> Result<&Charts> {
        let (state, charts) = render(
            &self.table,
            self.field,
            &self.state,
            RangeRequest::new(start, end),
        )?;
        self.state = state;
        self.charts = charts;
        Ok(&self.charts)
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn charts(&self) -> &Charts {
        &self.charts
    }

    pub fn view(&self) -> DashboardView<'_> {
        DashboardView {
            heading: DASHBOARD_HEADING,
            range: self.state.range,
            submissions: self.state.submissions,
            charts: &self.charts,
        }
    }
}

/// Serializable snapshot of the page.
#[derive(Debug, Serialize)]
pub struct DashboardView<'a> {
    pub heading: &'static str,
    pub range: DateRange,
    pub submissions: u64,
    pub charts: &'a Charts,
}
