//! CSV Data Loader Module
//! Reads the yearly LST statistics file with Polars and fixes the year column type.

use polars::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const YEAR_COLUMN: &str = "year";

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Input file not found: {0}")]
    NotFound(PathBuf),
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
}

/// Loads the statistics table once and keeps it for the rest of the run.
pub struct DataLoader {
    df: Option<DataFrame>,
    file_path: Option<PathBuf>,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DataLoader {
    pub fn new() -> Self {
        Self {
            df: None,
            file_path: None,
        }
    }

    /// Load a CSV file and cast its `year` column to `Int32`.
    ///
    /// Parse errors are not skipped: a malformed file or a non-numeric year
    /// fails the load.
    pub fn load_csv(&mut self, file_path: &Path) -> Result<&DataFrame, LoaderError> {
        if !file_path.exists() {
            return Err(LoaderError::NotFound(file_path.to_path_buf()));
        }
        self.file_path = Some(file_path.to_path_buf());

        let mut df = LazyCsvReader::new(file_path)
            .with_has_header(true)
            .with_infer_schema_length(None)
            .finish()?
            .collect()?;

        // Multi-chunk columns break the strict cast's error reporting.
        df.as_single_chunk_par();
        Self::cast_year(&mut df)?;

        tracing::debug!(rows = df.height(), columns = df.width(), "csv parsed");
        Ok(&*self.df.insert(df))
    }

    /// Strict integer cast; any value that cannot become an integer is an error.
    fn cast_year(df: &mut DataFrame) -> Result<(), LoaderError> {
        let year = df
            .column(YEAR_COLUMN)?
            .strict_cast(&DataType::Int32)?;
        df.with_column(year)?;
        Ok(())
    }

    /// Get the number of rows in the DataFrame.
    pub fn get_row_count(&self) -> usize {
        self.df.as_ref().map(|df| df.height()).unwrap_or(0)
    }

    /// Get file path.
    pub fn get_file_path(&self) -> Option<&PathBuf> {
        self.file_path.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const HEADER: &str =
        "year,urban_mean,suburban_mean,urban_stddev,suburban_stddev,temperature_difference\n";

    fn write_csv(dir: &tempfile::TempDir, body: &str) -> PathBuf {
        let path = dir.path().join("lst.csv");
        fs::write(&path, format!("{HEADER}{body}")).unwrap();
        path
    }

    #[test]
    fn year_column_is_integer_after_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(&dir, "2013,30.0,28.0,1.2,1.1,2.0\n2014,31.2,29.0,1.0,0.9,2.2\n");

        let mut loader = DataLoader::new();
        let df = loader.load_csv(&path).unwrap();
        assert_eq!(df.column(YEAR_COLUMN).unwrap().dtype(), &DataType::Int32);
        assert_eq!(loader.get_row_count(), 2);
        assert_eq!(loader.get_file_path(), Some(&path));
    }

    #[test]
    fn float_years_are_truncated_to_integers() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(&dir, "2013.0,30.0,28.0,1.2,1.1,2.0\n2014.0,31.2,29.0,1.0,0.9,2.2\n");

        let mut loader = DataLoader::new();
        let df = loader.load_csv(&path).unwrap();
        let years = df.column(YEAR_COLUMN).unwrap().i32().unwrap();
        assert_eq!(years.get(0), Some(2013));
        assert_eq!(years.get(1), Some(2014));
    }

    #[test]
    fn non_numeric_year_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(&dir, "2013,30.0,28.0,1.2,1.1,2.0\nlast,31.2,29.0,1.0,0.9,2.2\n");

        let mut loader = DataLoader::new();
        assert!(matches!(
            loader.load_csv(&path),
            Err(LoaderError::CsvError(_))
        ));
        assert_eq!(loader.get_row_count(), 0);
    }

    #[test]
    fn bad_year_mid_file_is_an_error_not_a_panic() {
        let dir = tempfile::tempdir().unwrap();
        let mut body = String::new();
        for year in 2000..2030 {
            let year = if year == 2016 { "20l6".to_string() } else { year.to_string() };
            body.push_str(&format!("{year},30.5,28.9,1.2,1.0,1.6\n"));
        }
        let path = write_csv(&dir, &body);

        let mut loader = DataLoader::new();
        match loader.load_csv(&path) {
            Err(LoaderError::CsvError(err)) => assert!(err.to_string().contains("20l6"), "{err}"),
            other => panic!("expected CsvError, got {:?}", other.map(|df| df.height())),
        }
        assert_eq!(loader.get_row_count(), 0);
    }

    #[test]
    fn missing_year_column_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no_year.csv");
        fs::write(&path, "urban_mean,suburban_mean\n30.0,28.0\n").unwrap();

        let mut loader = DataLoader::new();
        assert!(matches!(
            loader.load_csv(&path),
            Err(LoaderError::CsvError(_))
        ));
    }

    #[test]
    fn missing_file_is_reported_as_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.csv");

        let mut loader = DataLoader::new();
        match loader.load_csv(&path) {
            Err(LoaderError::NotFound(p)) => assert_eq!(p, path),
            other => panic!("expected NotFound, got {:?}", other.map(|df| df.height())),
        }
        assert_eq!(loader.get_row_count(), 0);
    }
}
