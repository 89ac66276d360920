//! Urban heat island charts.
//!
//! Reads yearly urban/suburban land-surface-temperature statistics from CSV and
//! renders the trend, heat-island difference and variability charts as PNG files.

pub mod charts;
pub mod config;
pub mod data;
pub mod report;

use anyhow::Context;
use config::ReportConfig;
use data::{DataLoader, DataProcessor};
use report::ReportWriter;
use std::path::PathBuf;

/// Load the statistics table and write every chart. Returns the saved image paths.
pub fn run(config: &ReportConfig) -> anyhow::Result<Vec<PathBuf>> {
    config.validate()?;

    let mut loader = DataLoader::new();
    let df = loader
        .load_csv(&config.input_path)
        .with_context(|| format!("loading {}", config.input_path.display()))?;
    let table = DataProcessor::to_table(df).context("reading LST rows")?;

    tracing::info!(
        file = %config.input_path.display(),
        rows = loader.get_row_count(),
        span = ?table.year_span(),
        "statistics loaded"
    );

    let written = ReportWriter::new(config)
        .write_all(&table)
        .context("writing charts")?;
    Ok(written)
}
