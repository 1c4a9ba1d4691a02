//! Dashboard configuration.
//!
//! Defaults point at the fixed `dashboard/` data directory. An optional
//! `dashboard/dashboard.json` overrides individual fields.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Location of the optional override file.
pub const CONFIG_PATH: &str = "dashboard/dashboard.json";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("reading config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parsing config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    /// Daily usage table.
    pub daily_path: PathBuf,
    /// Hourly usage table.
    pub hourly_path: PathBuf,
    /// Sidebar branding image.
    pub image_path: PathBuf,
    pub window_size: [f32; 2],
    /// Compute the rider-share pie from the filtered data instead of
    /// showing the fixed 18.8 / 81.2 split.
    pub live_rider_share: bool,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            daily_path: PathBuf::from("dashboard/day_clean.csv"),
            hourly_path: PathBuf::from("dashboard/hour_clean.csv"),
            image_path: PathBuf::from("dashboard/bike.png"),
            window_size: [1280.0, 900.0],
            live_rider_share: false,
        }
    }
}

impl DashboardConfig {
    /// Defaults, overridden by `path` when that file exists.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if !path.is_file() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Using configuration from {}", path.display());
        Ok(config)
    }
}
