// src/config.rs

use crate::dataset::DateField;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Looked up in the working directory when no config path is given.
pub const DEFAULT_CONFIG_FILE: &str = "salesdash.yaml";

/// Where the two source tables live and how they join.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub sales_path: PathBuf,
    pub regions_path: PathBuf,
    /// Join column on the sales side.
    pub sales_key: String,
    /// Join column on the lookup side.
    pub lookup_key: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            sales_path: PathBuf::from("sources/Superstore_with_LAT_LNG.csv"),
            regions_path: PathBuf::from("sources/State abbreviations.csv"),
            sales_key: "State/Province".into(),
            lookup_key: "Full Name".into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RangeConfig {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Default for RangeConfig {
    fn default() -> Self {
        Self {
            start: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default(),
            end: NaiveDate::from_ymd_opt(2024, 12, 31).unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub sources: SourceConfig,
    /// Range shown before the first submit.
    pub default_range: RangeConfig,
    pub date_field: DateField,
    /// Pretty-print emitted JSON views.
    pub pretty: bool,
}

impl DashboardConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).context("parsing dashboard config")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_yaml_str(&text).with_context(|| format!("in {}", path.display()))
    }

    /// Explicit path if given, else `salesdash.yaml` when present, else defaults.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load(path),
            None => {
                let fallback = Path::new(DEFAULT_CONFIG_FILE);
                if fallback.is_file() {
                    Self::load(fallback)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }
}
