//! CSV loading of named time series columns.

use std::io::Read;
use std::path::Path;

use indexmap::IndexMap;
use thiserror::Error;

/// Errors raised while loading a time series file.
#[derive(Debug, Error)]
pub enum TimeSeriesError {
    /// The file could not be read or is not valid CSV.
    #[error(transparent)]
    Csv(#[from] csv::Error),
    /// A cell is not a number.
    #[error("row {row}, column \"{column}\": \"{value}\" is not a number")]
    InvalidNumber {
        column: String,
        row: usize,
        value: String,
    },
}

/// Numeric columns of a CSV file with a header row, in file order.
///
/// ```text
/// load_kw,irradiance,wind_speed
/// 1520.0,0.0,7.4
/// 1480.5,0.0,7.9
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimeSeriesTable {
    columns: IndexMap<String, Vec<f64>>,
}

impl TimeSeriesTable {
    /// Loads a table from a CSV file.
    ///
    /// # Errors
    ///
    /// Returns a [`TimeSeriesError`] if the file cannot be read, rows have
    /// inconsistent lengths, or a cell is not a number.
    pub fn from_path(path: &Path) -> Result<Self, TimeSeriesError> {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(path)?;
        Self::from_csv(reader)
    }

    /// Loads a table from any CSV source.
    ///
    /// # Errors
    ///
    /// Same as [`TimeSeriesTable::from_path`].
    pub fn from_reader(reader: impl Read) -> Result<Self, TimeSeriesError> {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        Self::from_csv(reader)
    }

    fn from_csv<R: Read>(mut reader: csv::Reader<R>) -> Result<Self, TimeSeriesError> {
        let names: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        let mut values: Vec<Vec<f64>> = vec![Vec::new(); names.len()];

        for (row, record) in reader.records().enumerate() {
            let record = record?;
            for ((name, column), cell) in names.iter().zip(&mut values).zip(record.iter()) {
                let value = cell.parse::<f64>().map_err(|_| TimeSeriesError::InvalidNumber {
                    column: name.clone(),
                    row: row + 1,
                    value: cell.to_string(),
                })?;
                column.push(value);
            }
        }

        Ok(Self {
            columns: names.into_iter().zip(values).collect(),
        })
    }

    /// Samples of the column `name`, if present.
    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns.get(name).map(Vec::as_slice)
    }

    /// Column names, in file order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.columns.values().next().map_or(0, Vec::len)
    }

    /// Whether the table has no data rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
