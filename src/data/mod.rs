//! Data module - CSV loading and row extraction

mod loader;
mod processor;

pub use loader::{DataLoader, LoaderError, YEAR_COLUMN};
pub use processor::{DataProcessor, LstTable, ProcessorError, YearRecord};
