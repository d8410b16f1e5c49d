//! Cleaning operations and the pipeline driver.
//!
//! The pipeline is a pure function over tables, decoupled from any UI
//! re-render cycle: decode, clean, project, encode. Each uploaded file is
//! processed independently, so one failure never blocks the rest of a batch.

pub mod chart;

use crate::codec;
use crate::codec::EncodedArtifact;
use crate::codec::Format;
use crate::codec::UploadedFile;
use crate::error::SweeperError;
use crate::table::Table;
use crate::table::Value;
use std::collections::HashSet;
use tracing::debug;
use tracing::warn;

/// A cleaning operation selected by the caller.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CleanOp {
    /// Deletes rows that are fully identical to an earlier row, keeping the
    /// first occurrence and preserving the remaining row order. Idempotent.
    RemoveDuplicates,
    /// Replaces missing cells in numeric columns with the column mean of the
    /// present values. Columns with any non-numeric value are untouched, and
    /// so are columns with no present value at all (the mean is undefined).
    /// Re-invocation recomputes from the then-current data.
    FillMissing,
}

/// Applies the given cleaning operations to the table, in order.
pub fn process(table: &mut Table, ops: &[CleanOp]) {
    for op in ops {
        match op {
            CleanOp::RemoveDuplicates => remove_duplicates(table),
            CleanOp::FillMissing => fill_missing(table),
        }
        debug!(?op, rows = table.row_count(), "applied cleaning operation");
    }
}

/// Restricts a table to the named columns, in the given order.
///
/// Every name must exist in the table. An empty selection keeps the row
/// count: the result has zero columns but one positional row per input row.
pub fn project(table: &Table, columns: &[String]) -> Result<Table, SweeperError> {
    let indexes = columns
        .iter()
        .map(|name| {
            table
                .column_index(name)
                .ok_or_else(|| crate::table::TableError::UnknownColumn(name.to_owned()))
        })
        .collect::<Result<Vec<usize>, _>>()?;

    let mut projected = Table::new(columns.to_vec());
    for row in table.rows() {
        let values = indexes.iter().map(|&index| row[index].clone()).collect();
        projected.push_row(values)?;
    }
    Ok(projected)
}

fn remove_duplicates(table: &mut Table) {
    // One token per cell, compared element-wise: a control character inside
    // a text cell can never shift cell boundaries
    let mut seen = HashSet::<Vec<String>>::new();
    table.rows_mut().retain(|row| {
        let key = row.iter().map(Value::dedup_token).collect::<Vec<String>>();
        seen.insert(key)
    });
}

fn fill_missing(table: &mut Table) {
    for index in 0..table.column_count() {
        if !table.column_values(index).all(Value::is_numeric_or_missing) {
            continue;
        }
        let present: Vec<f64> = table
            .column_values(index)
            .filter_map(Value::as_number)
            .collect();
        if present.is_empty() {
            // Mean is undefined, leave the column missing
            continue;
        }
        let mean = present.iter().sum::<f64>() / present.len() as f64;
        for row in table.rows_mut() {
            if row[index].is_missing() {
                row[index] = Value::Number(mean);
            }
        }
    }
}

/// One user request against a batch of uploads: which cleaning operations to
/// run, which columns to keep (`None` keeps all), and the target format.
#[derive(Clone, Debug)]
pub struct SweepRequest {
    pub ops: Vec<CleanOp>,
    pub columns: Option<Vec<String>>,
    pub target: Format,
}

/// Per-file result of a batch run.
#[derive(Debug)]
pub struct SweepOutcome {
    pub file_name: String,
    pub result: Result<EncodedArtifact, SweeperError>,
}

/// Runs the full pipeline over a batch of uploads.
///
/// Files are processed sequentially and in isolation: a decode or encode
/// failure is captured in that file's outcome and the remaining files are
/// still processed.
pub fn sweep(files: &[UploadedFile], request: &SweepRequest) -> Vec<SweepOutcome> {
    files
        .iter()
        .map(|file| {
            let result = sweep_file(file, request);
            if let Err(error) = &result {
                warn!(name = file.name(), %error, "skipping file");
            }
            SweepOutcome {
                file_name: file.name().to_owned(),
                result,
            }
        })
        .collect()
}

fn sweep_file(file: &UploadedFile, request: &SweepRequest) -> Result<EncodedArtifact, SweeperError> {
    let mut table = codec::decode(file)?;
    process(&mut table, &request.ops);
    if let Some(columns) = &request.columns {
        table = project(&table, columns)?;
    }
    codec::encode(&table, request.target, file.name())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::TableError;

    fn table(rows: &[(&str, Option<f64>)]) -> Table {
        let mut table = Table::new(vec!["name".to_owned(), "value".to_owned()]);
        for (name, value) in rows {
            table
                .push_row(vec![
                    Value::Text((*name).to_owned()),
                    value.map(Value::Number).unwrap_or(Value::Missing),
                ])
                .unwrap();
        }
        table
    }

    #[test]
    fn remove_duplicates_keeps_first_occurrence() {
        let mut t = table(&[("A", Some(1.0)), ("A", Some(1.0)), ("B", None), ("A", Some(1.0))]);
        process(&mut t, &[CleanOp::RemoveDuplicates]);
        assert_eq!(t.row_count(), 2);
        assert_eq!(t.rows()[0][0], Value::Text("A".to_owned()));
        assert_eq!(t.rows()[1][0], Value::Text("B".to_owned()));
    }

    #[test]
    fn remove_duplicates_is_idempotent() {
        let mut t = table(&[("A", Some(1.0)), ("A", Some(1.0)), ("B", Some(2.0))]);
        process(&mut t, &[CleanOp::RemoveDuplicates]);
        let once = t.clone();
        process(&mut t, &[CleanOp::RemoveDuplicates]);
        assert_eq!(t, once);
    }

    #[test]
    fn remove_duplicates_compares_cells_not_concatenations() {
        // Separator-looking text inside one cell must not make two distinct
        // rows read as equal
        let mut t = Table::new(vec!["a".to_owned(), "b".to_owned()]);
        t.push_row(vec![Value::Text("a".to_owned()), Value::Text("b\u{1f}tc".to_owned())]).unwrap();
        t.push_row(vec![Value::Text("a\u{1f}tb".to_owned()), Value::Text("c".to_owned())]).unwrap();
        process(&mut t, &[CleanOp::RemoveDuplicates]);
        assert_eq!(t.row_count(), 2);
    }

    #[test]
    fn fill_missing_uses_column_mean() {
        let mut t = Table::new(vec!["a".to_owned(), "b".to_owned()]);
        t.push_row(vec![Value::Number(1.0), Value::Text("x".to_owned())]).unwrap();
        t.push_row(vec![Value::Number(3.0), Value::Missing]).unwrap();
        t.push_row(vec![Value::Missing, Value::Text("y".to_owned())]).unwrap();
        process(&mut t, &[CleanOp::FillMissing]);

        // Numeric column filled with mean of {1, 3}
        assert_eq!(t.rows()[2][0], Value::Number(2.0));
        // Column with text values untouched
        assert_eq!(t.rows()[1][1], Value::Missing);
    }

    #[test]
    fn fill_missing_leaves_all_missing_columns_alone() {
        let mut t = Table::new(vec!["empty".to_owned()]);
        t.push_row(vec![Value::Missing]).unwrap();
        t.push_row(vec![Value::Missing]).unwrap();
        process(&mut t, &[CleanOp::FillMissing]);
        assert!(t.rows().iter().all(|row| row[0].is_missing()));
    }

    #[test]
    fn fill_missing_ignores_boolean_columns() {
        let mut t = Table::new(vec!["flag".to_owned()]);
        t.push_row(vec![Value::Boolean(true)]).unwrap();
        t.push_row(vec![Value::Missing]).unwrap();
        process(&mut t, &[CleanOp::FillMissing]);
        assert_eq!(t.rows()[1][0], Value::Missing);
    }

    #[test]
    fn project_reorders_columns() {
        let t = table(&[("A", Some(1.0))]);
        let projected = project(&t, &["value".to_owned(), "name".to_owned()]).unwrap();
        assert_eq!(projected.columns(), ["value", "name"]);
        assert_eq!(projected.rows()[0], vec![Value::Number(1.0), Value::Text("A".to_owned())]);
    }

    #[test]
    fn project_rejects_unknown_column() {
        let t = table(&[("A", Some(1.0))]);
        let result = project(&t, &["nope".to_owned()]);
        assert!(matches!(
            result,
            Err(SweeperError::TableError(TableError::UnknownColumn(ref name))) if name == "nope"
        ));
    }

    #[test]
    fn project_empty_selection_keeps_row_count() {
        let t = table(&[("A", Some(1.0)), ("B", Some(2.0))]);
        let projected = project(&t, &[]).unwrap();
        assert_eq!(projected.column_count(), 0);
        assert_eq!(projected.row_count(), 2);
    }

    #[test]
    fn sweep_isolates_failures_per_file() {
        let files = vec![
            UploadedFile::new("notes.txt", b"plain text".to_vec()),
            UploadedFile::new("data.csv", b"name,value\nA,1\n".to_vec()),
        ];
        let request = SweepRequest {
            ops: Vec::new(),
            columns: None,
            target: Format::Csv,
        };
        let outcomes = sweep(&files, &request);
        assert_eq!(outcomes.len(), 2);
        assert!(matches!(outcomes[0].result, Err(SweeperError::UnsupportedFormat(_))));
        assert!(outcomes[1].result.is_ok());
    }

    #[test]
    fn sweep_clean_project_convert() {
        // Upload, deduplicate, fill missing, convert to Excel
        let file = UploadedFile::new("original.csv", b"name,value\nA,1\nA,1\nB,\n".to_vec());
        let request = SweepRequest {
            ops: vec![CleanOp::RemoveDuplicates, CleanOp::FillMissing],
            columns: None,
            target: Format::Xlsx,
        };
        let outcomes = sweep(&[file], &request);
        let artifact = outcomes[0].result.as_ref().unwrap();
        assert_eq!(artifact.file_name, "original.xlsx");
        assert_eq!(
            artifact.mime,
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
        );

        let table = crate::codec::xlsx::decode(&artifact.bytes).unwrap();
        assert_eq!(table.columns(), ["name", "value"]);
        assert_eq!(table.rows().len(), 2);
        assert_eq!(table.rows()[0], vec![Value::Text("A".to_owned()), Value::Number(1.0)]);
        // Mean of the present values {1} fills the missing cell
        assert_eq!(table.rows()[1], vec![Value::Text("B".to_owned()), Value::Number(1.0)]);
    }
}
