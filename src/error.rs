// src/error.rs

use arrow::error::ArrowError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DashboardError>;

/// Every failure the dashboard pipeline can surface.
///
/// `DataLoad` is fatal at startup. `Schema` and `DateParse` abort a single
/// render and leave whatever was displayed before untouched.
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("failed to load {source_name}: {reason}")]
    DataLoad { source_name: String, reason: String },

    #[error("column `{column}`: {reason}")]
    Schema { column: String, reason: String },

    #[error("cannot parse `{input}` as a calendar date")]
    DateParse { input: String },
}

impl DashboardError {
    pub fn data_load(source_name: impl Into<String>, reason: impl ToString) -> Self {
        DashboardError::DataLoad {
            source_name: source_name.into(),
            reason: reason.to_string(),
        }
    }

    pub fn missing_column(column: impl Into<String>) -> Self {
        DashboardError::Schema {
            column: column.into(),
            reason: "not present in table".into(),
        }
    }

    pub fn wrong_type(column: impl Into<String>, expected: &str) -> Self {
        DashboardError::Schema {
            column: column.into(),
            reason: format!("expected {} column", expected),
        }
    }

    pub fn date_parse(input: impl Into<String>) -> Self {
        DashboardError::DateParse {
            input: input.into(),
        }
    }

    /// Arrow kernels only fail on shape/type mismatches once data is loaded.
    pub(crate) fn from_arrow(column: impl Into<String>, err: ArrowError) -> Self {
        DashboardError::Schema {
            column: column.into(),
            reason: err.to_string(),
        }
    }
}
