//! Report Configuration Module
//! Input/output locations, figure geometry and chart titles.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Optional override file looked up in the working directory.
pub const CONFIG_FILE: &str = "heat_island.json";

pub const DEFAULT_INPUT: &str = "HCMC_LST_Statistics_2013_2023_3_4_mua_kho.csv";

/// Largest canvas side accepted, in pixels.
pub const MAX_CANVAS_SIDE: u32 = 16_384;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("DPI and figure size must give a canvas between 1 and 16384 pixels per side")]
    InvalidGeometry,
}

/// Chart titles. `{span}` is replaced with the year span of the data, e.g. `2013-2023`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartTitles {
    pub trend: String,
    pub difference: String,
    pub variability: String,
}

impl Default for ChartTitles {
    fn default() -> Self {
        Self {
            trend: "MEAN SEPTEMBER LAND SURFACE TEMPERATURE ({span})".to_string(),
            difference: "URBAN HEAT ISLAND EFFECT ({span})".to_string(),
            variability: "TEMPERATURE VARIABILITY BY YEAR (STANDARD DEVIATION)".to_string(),
        }
    }
}

impl ChartTitles {
    /// Substitute the year span into a title template.
    pub fn expand(template: &str, span: Option<(i32, i32)>) -> String {
        let span = match span {
            Some((first, last)) => format!("{}-{}", first, last),
            None => "no data".to_string(),
        };
        template.replace("{span}", &span)
    }
}

/// Everything the pipeline needs to know about where to read and how to draw.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub input_path: PathBuf,
    pub output_dir: PathBuf,
    pub dpi: u32,
    /// Width and height in inches.
    pub figure_size_in: (f64, f64),
    /// Open each saved chart in the system image viewer.
    pub display: bool,
    pub titles: ChartTitles,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from(DEFAULT_INPUT),
            output_dir: PathBuf::from("."),
            dpi: 300,
            figure_size_in: (14.0, 7.0),
            display: true,
            titles: ChartTitles::default(),
        }
    }
}

impl ReportConfig {
    /// Read `path` if it exists, otherwise fall back to the built-in defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let (w, h) = self.figure_size_in;
        let dpi = self.dpi as f64;
        let side_ok = |inches: f64| {
            let px = (inches * dpi).round();
            px >= 1.0 && px <= MAX_CANVAS_SIDE as f64
        };
        if self.dpi == 0 || !side_ok(w) || !side_ok(h) {
            return Err(ConfigError::InvalidGeometry);
        }
        Ok(())
    }

    /// Canvas size in pixels. Only meaningful once [`validate`](Self::validate) passed.
    pub fn pixel_size(&self) -> (u32, u32) {
        let (w, h) = self.figure_size_in;
        let dpi = self.dpi as f64;
        ((w * dpi).round() as u32, (h * dpi).round() as u32)
    }

    /// Convert a size in points to pixels at the configured DPI.
    pub fn pt(&self, points: f64) -> u32 {
        ((points * self.dpi as f64 / 72.0).round() as u32).max(1)
    }
}
