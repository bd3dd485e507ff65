//! Tabular price data with named columns
//!
//! The input is a CSV of daily closing prices, one column per stock,
//! rows in ascending time order with no gaps.

use crate::error::{Error, Result};
use csv::Reader;
use ndarray::Array2;
use std::fs::File;
use std::path::Path;

/// A time-ordered table of per-stock observations.
///
/// Rows are time steps, columns are stocks. Column order is the order the
/// columns appeared in the source file and defines the entity order used
/// everywhere downstream.
#[derive(Debug, Clone)]
pub struct PriceTable {
    columns: Vec<String>,
    values: Array2<f64>,
}

impl PriceTable {
    /// Build a table from column names and row-major values.
    pub fn new(columns: Vec<String>, values: Array2<f64>) -> Result<Self> {
        if columns.len() != values.ncols() {
            return Err(Error::Config(format!(
                "{} column names for {} columns of data",
                columns.len(),
                values.ncols()
            )));
        }
        Ok(Self { columns, values })
    }

    /// Load a table from a CSV file with a header row.
    ///
    /// Every cell must parse as a number; rows are kept in file order.
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        let mut reader = Reader::from_reader(file);

        let columns: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let mut rows: Vec<f64> = Vec::new();
        let mut n_rows = 0;
        for (line, record) in reader.records().enumerate() {
            let record = record?;
            if record.len() != columns.len() {
                return Err(Error::Parse(format!(
                    "row {} has {} fields, expected {}",
                    line + 2,
                    record.len(),
                    columns.len()
                )));
            }
            for field in record.iter() {
                let value: f64 = field.trim().parse().map_err(|_| {
                    Error::Parse(format!("row {}: not a number: {:?}", line + 2, field))
                })?;
                rows.push(value);
            }
            n_rows += 1;
        }

        let values = Array2::from_shape_vec((n_rows, columns.len()), rows)
            .map_err(|e| Error::Parse(e.to_string()))?;

        Self::new(columns, values)
    }

    /// Number of time steps.
    pub fn n_rows(&self) -> usize {
        self.values.nrows()
    }

    /// Number of stocks.
    pub fn n_cols(&self) -> usize {
        self.values.ncols()
    }

    /// Column names in table order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Index of a named column, if present.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// The underlying values, rows are time steps.
    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    /// Replace the values, keeping column names. Used after normalization.
    pub fn with_values(&self, values: Array2<f64>) -> Result<Self> {
        Self::new(self.columns.clone(), values)
    }
}
