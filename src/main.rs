//! Urban Heat Island Charts - LST trend, difference and variability plots
//!
//! Reads the yearly LST statistics CSV and writes three PNG charts.

use heat_island_charts::config::{ReportConfig, CONFIG_FILE};
use std::path::Path;
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> anyhow::Result<()> {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let config = ReportConfig::load_or_default(Path::new(CONFIG_FILE))?;
    let written = heat_island_charts::run(&config)?;

    tracing::info!(charts = written.len(), "done");
    Ok(())
}
