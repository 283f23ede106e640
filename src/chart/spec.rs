// src/chart/spec.rs

use plotly::{common::Title, Layout, Plot, Trace};
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::fmt;

/// One dashboard chart: a titled `plotly::Plot` (traces + layout).
#[derive(Clone)]
pub struct ChartSpec {
    title: &'static str,
    plot: Plot,
}

impl ChartSpec {
    /// Empty chart; `layout` gets `title` applied.
    pub fn new(title: &'static str, layout: Layout) -> Self {
        let mut plot = Plot::new();
        plot.set_layout(layout.title(Title::from(title)));
        Self { title, plot }
    }

    pub fn add_trace(&mut self, trace: Box<dyn Trace>) {
        self.plot.add_trace(trace);
    }

    pub fn title(&self) -> &str {
        self.title
    }

    pub fn plot(&self) -> &Plot {
        &self.plot
    }

    /// Plotly JSON: `{"data": [...], "layout": {...}, ...}`.
    pub fn to_json(&self) -> Value {
        serde_json::from_str(&self.plot.to_json()).unwrap_or(Value::Null)
    }

    fn traces(&self) -> Vec<Value> {
        match self.to_json().get("data") {
            Some(Value::Array(traces)) => traces.clone(),
            _ => Vec::new(),
        }
    }

    pub fn trace_names(&self) -> Vec<String> {
        self.traces()
            .iter()
            .map(|t| t["name"].as_str().unwrap_or_default().to_string())
            .collect()
    }

    /// Points per trace (`y` for cartesian traces, `lat` for map traces).
    pub fn point_counts(&self) -> Vec<usize> {
        self.traces()
            .iter()
            .map(|t| {
                t.get("y")
                    .or_else(|| t.get("lat"))
                    .and_then(Value::as_array)
                    .map_or(0, Vec::len)
            })
            .collect()
    }
}

impl PartialEq for ChartSpec {
    fn eq(&self, other: &Self) -> bool {
        self.title == other.title && self.plot.to_json() == other.plot.to_json()
    }
}

impl fmt::Debug for ChartSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChartSpec")
            .field("title", &self.title)
            .field("plot", &self.plot.to_json())
            .finish()
    }
}

impl Serialize for ChartSpec {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.plot.serialize(serializer)
    }
}
