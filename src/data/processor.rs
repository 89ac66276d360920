//! Data Processor Module
//! Turns the loaded DataFrame into typed per-year records.

use super::loader::YEAR_COLUMN;
use polars::prelude::*;
use thiserror::Error;

pub const URBAN_MEAN: &str = "urban_mean";
pub const SUBURBAN_MEAN: &str = "suburban_mean";
pub const URBAN_STDDEV: &str = "urban_stddev";
pub const SUBURBAN_STDDEV: &str = "suburban_stddev";
pub const TEMPERATURE_DIFFERENCE: &str = "temperature_difference";

#[derive(Error, Debug)]
pub enum ProcessorError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("Null value in column '{column}' at row {row}")]
    NullValue { column: String, row: usize },
}

/// One row of the input file.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YearRecord {
    pub year: i32,
    pub urban_mean: f64,
    pub suburban_mean: f64,
    pub urban_stddev: f64,
    pub suburban_stddev: f64,
    pub temperature_difference: f64,
}

/// The whole input, one record per year in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LstTable {
    records: Vec<YearRecord>,
}

impl LstTable {
    pub fn new(records: Vec<YearRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[YearRecord] {
        &self.records
    }

    pub fn years(&self) -> Vec<i32> {
        self.records.iter().map(|r| r.year).collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// First and last year as they appear in the file.
    pub fn year_span(&self) -> Option<(i32, i32)> {
        Some((self.records.first()?.year, self.records.last()?.year))
    }
}

/// Row extraction from the loaded DataFrame.
pub struct DataProcessor;

impl DataProcessor {
    /// Build an [`LstTable`] from a frame whose `year` column is already `Int32`.
    pub fn to_table(df: &DataFrame) -> Result<LstTable, ProcessorError> {
        let years = df.column(YEAR_COLUMN)?.i32()?.clone();
        let urban_mean = Self::float_values(df, URBAN_MEAN)?;
        let suburban_mean = Self::float_values(df, SUBURBAN_MEAN)?;
        let urban_stddev = Self::float_values(df, URBAN_STDDEV)?;
        let suburban_stddev = Self::float_values(df, SUBURBAN_STDDEV)?;
        let difference = Self::float_values(df, TEMPERATURE_DIFFERENCE)?;

        let mut records = Vec::with_capacity(df.height());
        for i in 0..df.height() {
            let year = years.get(i).ok_or_else(|| ProcessorError::NullValue {
                column: YEAR_COLUMN.to_string(),
                row: i,
            })?;

            records.push(YearRecord {
                year,
                urban_mean: urban_mean[i],
                suburban_mean: suburban_mean[i],
                urban_stddev: urban_stddev[i],
                suburban_stddev: suburban_stddev[i],
                temperature_difference: difference[i],
            });
        }

        Ok(LstTable::new(records))
    }

    /// Cast a column to f64 and reject nulls.
    fn float_values(df: &DataFrame, column: &str) -> Result<Vec<f64>, ProcessorError> {
        let value_f64 = df.column(column)?.cast(&DataType::Float64)?;
        let value_ca = value_f64.f64()?;

        value_ca
            .into_iter()
            .enumerate()
            .map(|(row, v)| {
                v.ok_or_else(|| ProcessorError::NullValue {
                    column: column.to_string(),
                    row,
                })
            })
            .collect()
    }
}
