//! Configuration for the meterbook tools

use crate::chart::ChartRequest;
use crate::summary::DEFAULT_PREVIEW_ROWS;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the configuration file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "meterbook.toml";

/// Main configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeterbookConfig {
    #[serde(default)]
    pub workbook: WorkbookConfig,
    #[serde(default)]
    pub summary: SummaryConfig,
    #[serde(default)]
    pub chart: ChartConfig,
}

impl MeterbookConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: MeterbookConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load `explicit` if given, else `meterbook.toml` when present, else defaults
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path)
                .with_context(|| format!("Failed to load config from {}", path.display()));
        }

        let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
        if default_path.exists() {
            Self::from_file(&default_path).with_context(|| {
                format!("Failed to load config from {}", default_path.display())
            })
        } else {
            Ok(Self::default())
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkbookConfig {
    pub path: PathBuf,
}

impl Default for WorkbookConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("Data.xlsx"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryConfig {
    /// Rows shown in each table preview
    pub preview_rows: usize,
    /// Day listed under "Export kWh on ..."
    pub sample_date: NaiveDate,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            preview_rows: DEFAULT_PREVIEW_ROWS,
            sample_date: NaiveDate::from_ymd_opt(2023, 4, 1).unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub mpan: i64,
    pub date: NaiveDate,
    /// Where the SVG chart is kept; a temporary file is used when unset
    pub output: Option<PathBuf>,
}

impl ChartConfig {
    pub fn request(&self) -> ChartRequest {
        ChartRequest {
            mpan: self.mpan,
            date: self.date,
        }
    }
}

impl Default for ChartConfig {
    fn default() -> Self {
        let request = ChartRequest::default();
        Self {
            mpan: request.mpan,
            date: request.date,
            output: None,
        }
    }
}
