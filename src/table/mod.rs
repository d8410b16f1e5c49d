//! In-memory row/column table produced by decoding an uploaded tabular file.

mod value;

pub use value::Value;

use thiserror::Error;

/// Errors related to table structure and column lookup.
#[derive(Error, Debug)]
pub enum TableError {
    #[error("Unknown column '{0}'")]
    UnknownColumn(String),

    #[error("Row has {actual} values but the table has {expected} columns")]
    RowLengthMismatch { expected: usize, actual: usize },
}

/// An ordered sequence of named columns with positionally aligned rows.
///
/// Invariant: every row holds exactly one value per column. `push_row`
/// enforces it; all other mutation goes through the pipeline operations.
#[derive(Clone, Debug, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

/// Row and column counts for display alongside file information.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TableSummary {
    pub rows: usize,
    pub columns: usize,
}

impl Table {
    /// Creates an empty table with the given column names.
    pub fn new(columns: Vec<String>) -> Table {
        Table {
            columns,
            rows: Vec::new(),
        }
    }

    /// Appends a row, checking the equal-length invariant.
    pub fn push_row(&mut self, row: Vec<Value>) -> Result<(), TableError> {
        if row.len() != self.columns.len() {
            return Err(TableError::RowLengthMismatch {
                expected: self.columns.len(),
                actual: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    /// Column names in table order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// All rows in table order.
    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Finds the positional index of a column by name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }

    /// Iterates over the values of one column, top to bottom.
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = &Value> {
        self.rows.iter().map(move |row| &row[index])
    }

    /// Returns a copy of the first `count` rows for preview display.
    pub fn head(&self, count: usize) -> Table {
        Table {
            columns: self.columns.clone(),
            rows: self.rows.iter().take(count).cloned().collect(),
        }
    }

    /// Row and column counts.
    pub fn summary(&self) -> TableSummary {
        TableSummary {
            rows: self.rows.len(),
            columns: self.columns.len(),
        }
    }

    pub(crate) fn rows_mut(&mut self) -> &mut Vec<Vec<Value>> {
        &mut self.rows
    }
}
