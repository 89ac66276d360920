//! Charts module - Chart geometry and rendering

pub mod plotter;
mod renderer;

pub use plotter::Zone;
pub use renderer::{ChartKind, RenderError, StaticChartRenderer};
