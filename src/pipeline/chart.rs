//! Display-only chart projection over a table's numeric columns.

use crate::table::Table;
use crate::table::Value;

/// How many numeric columns a line chart renders.
const SERIES_LIMIT: usize = 2;

/// One line series: the column name and one point per row index.
/// Missing cells become gaps rather than zeros.
#[derive(Clone, Debug, PartialEq)]
pub struct Series {
    pub name: String,
    pub points: Vec<Option<f64>>,
}

/// Selects up to the first two numeric columns as row-indexed line series.
///
/// A column is numeric when every cell is a number or missing. Returns `None`
/// when the table has no numeric column; that is an advisory for the caller
/// ("no numeric data"), not an error. The table is never mutated.
pub fn line_series(table: &Table) -> Option<Vec<Series>> {
    if table.row_count() == 0 {
        return None;
    }
    let series: Vec<Series> = table
        .columns()
        .iter()
        .enumerate()
        .filter(|(index, _)| table.column_values(*index).all(Value::is_numeric_or_missing))
        .take(SERIES_LIMIT)
        .map(|(index, name)| Series {
            name: name.to_owned(),
            points: table.column_values(index).map(Value::as_number).collect(),
        })
        .collect();
    if series.is_empty() {
        None
    } else {
        Some(series)
    }
}
