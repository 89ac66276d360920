//! Report Writer Module
//! Renders each chart, saves it as PNG and hands it to the system image viewer.

use crate::charts::{ChartKind, RenderError, StaticChartRenderer};
use crate::config::ReportConfig;
use crate::data::LstTable;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Failed to render {kind:?} chart: {source}")]
    Render {
        kind: ChartKind,
        source: RenderError,
    },
    #[error("Failed to create output directory {path}: {source}")]
    OutputDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to save {path}: {source}")]
    Save {
        path: PathBuf,
        source: image::ImageError,
    },
}

/// Writes the chart set described by a [`ReportConfig`].
pub struct ReportWriter<'a> {
    config: &'a ReportConfig,
}

impl<'a> ReportWriter<'a> {
    pub fn new(config: &'a ReportConfig) -> Self {
        Self { config }
    }

    pub fn output_path(&self, kind: ChartKind) -> PathBuf {
        self.config.output_dir.join(kind.file_name())
    }

    /// Render, save and display every chart in order. Stops at the first failure.
    pub fn write_all(&self, table: &LstTable) -> Result<Vec<PathBuf>, ReportError> {
        let dir = &self.config.output_dir;
        fs::create_dir_all(dir).map_err(|source| ReportError::OutputDir {
            path: dir.clone(),
            source,
        })?;

        let mut written = Vec::with_capacity(ChartKind::ALL.len());
        for kind in ChartKind::ALL {
            let path = self.write_chart(kind, table)?;
            if self.config.display {
                Self::display(&path);
            }
            written.push(path);
        }
        Ok(written)
    }

    /// Render one chart and save it at the configured location.
    pub fn write_chart(&self, kind: ChartKind, table: &LstTable) -> Result<PathBuf, ReportError> {
        let image = StaticChartRenderer::render(kind, table, self.config)
            .map_err(|source| ReportError::Render { kind, source })?;

        let path = self.output_path(kind);
        image.save(&path).map_err(|source| ReportError::Save {
            path: path.clone(),
            source,
        })?;

        tracing::info!(
            path = %path.display(),
            width = image.width(),
            height = image.height(),
            dpi = self.config.dpi,
            "chart saved"
        );
        Ok(path)
    }

    /// Open the saved image without waiting for the viewer.
    fn display(path: &Path) {
        if let Err(err) = open::that_detached(path) {
            tracing::warn!(path = %path.display(), error = %err, "could not open image viewer");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::YearRecord;

    fn config(dir: &Path) -> ReportConfig {
        ReportConfig {
            output_dir: dir.to_path_buf(),
            dpi: 30,
            display: false,
            ..ReportConfig::default()
        }
    }

    fn table() -> LstTable {
        LstTable::new(vec![YearRecord {
            year: 2020,
            urban_mean: 31.0,
            suburban_mean: 29.2,
            urban_stddev: 1.1,
            suburban_stddev: 0.7,
            temperature_difference: 1.8,
        }])
    }

    #[test]
    fn writes_three_non_empty_pngs_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());
        let written = ReportWriter::new(&config).write_all(&table()).unwrap();

        let names: Vec<_> = written
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            names,
            vec![
                "temperature_trend.png",
                "urban_heat_island.png",
                "temperature_variability.png"
            ]
        );
        for path in &written {
            assert!(fs::metadata(path).unwrap().len() > 0);
            assert_eq!(image::image_dimensions(path).unwrap(), (420, 210));
        }
    }

    #[test]
    fn creates_missing_output_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("charts").join("lst");
        let config = config(&nested);

        ReportWriter::new(&config).write_all(&table()).unwrap();
        assert!(nested.join("urban_heat_island.png").is_file());
    }

    #[test]
    fn unwritable_output_fails_the_run() {
        let dir = tempfile::tempdir().unwrap();
        // A regular file where the output directory should be.
        let blocker = dir.path().join("not_a_dir");
        fs::write(&blocker, b"x").unwrap();
        let config = config(&blocker);

        assert!(matches!(
            ReportWriter::new(&config).write_all(&table()),
            Err(ReportError::OutputDir { .. })
        ));
    }
}
