//! CSV decoding and encoding with a header row and no index column.

use crate::error::SweeperError;
use crate::table::Table;
use crate::table::TableError;
use crate::table::Value;
use csv::ReaderBuilder;
use csv::WriterBuilder;
use encoding_rs::WINDOWS_1252;
use std::borrow::Cow;

/// Decodes CSV bytes into a table. The first record is the header row.
/// Short records are padded with missing values; records with more fields
/// than the header fail the decode rather than dropping data.
pub(crate) fn decode(content: &[u8]) -> Result<Table, SweeperError> {
    let text = decode_text(content);
    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = reader.headers()?.clone();
    let columns = headers
        .iter()
        .enumerate()
        .map(|(index, header)| column_name(header, index))
        .collect::<Vec<String>>();

    let mut table = Table::new(columns);
    for result in reader.records() {
        let record = result?;
        if record.len() > table.column_count() {
            return Err(TableError::RowLengthMismatch {
                expected: table.column_count(),
                actual: record.len(),
            }
            .into());
        }
        let row = (0..table.column_count())
            .map(|index| Value::parse(record.get(index).unwrap_or("")))
            .collect();
        table.push_row(row)?;
    }
    Ok(table)
}

/// Encodes a table as CSV with a header row.
/// A zero-column table yields an empty buffer rather than an error.
pub(crate) fn encode(table: &Table) -> Result<Vec<u8>, SweeperError> {
    if table.column_count() == 0 {
        return Ok(Vec::new());
    }
    let mut buffer = Vec::new();
    {
        let mut writer = WriterBuilder::new().from_writer(&mut buffer);
        writer.write_record(table.columns())?;
        for row in table.rows() {
            writer.write_record(row.iter().map(|value| value.to_string()))?;
        }
        writer.flush()?;
    }
    Ok(buffer)
}

/// Interprets raw bytes as UTF-8, falling back to Windows-1252 for legacy
/// exports that are not valid UTF-8.
fn decode_text(content: &[u8]) -> Cow<'_, str> {
    match std::str::from_utf8(content) {
        Ok(text) => Cow::Borrowed(text),
        Err(_) => {
            let (text, _, _) = WINDOWS_1252.decode(content);
            text
        }
    }
}

/// Uses the header cell as the column name, generating a stable placeholder
/// for blank headers so every column stays addressable.
fn column_name(header: &str, index: usize) -> String {
    let trimmed = header.trim();
    if trimmed.is_empty() {
        format!("column_{}", index + 1)
    } else {
        trimmed.to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_simple_csv() {
        let table = decode(b"name,value\nA,1\nB,\n").unwrap();
        assert_eq!(table.columns(), ["name", "value"]);
        assert_eq!(table.rows()[0], vec![Value::Text("A".to_owned()), Value::Number(1.0)]);
        assert_eq!(table.rows()[1], vec![Value::Text("B".to_owned()), Value::Missing]);
    }

    #[test]
    fn decode_names_blank_headers() {
        let table = decode(b"name,,value\nA,x,1\n").unwrap();
        assert_eq!(table.columns(), ["name", "column_2", "value"]);
    }

    #[test]
    fn decode_short_records_pad_with_missing() {
        let table = decode(b"a,b,c\n1,2\n").unwrap();
        assert_eq!(table.rows()[0], vec![Value::Number(1.0), Value::Number(2.0), Value::Missing]);
    }

    #[test]
    fn decode_rejects_records_longer_than_the_header() {
        let result = decode(b"a,b\n1,2,3\n");
        assert!(matches!(
            result,
            Err(SweeperError::TableError(TableError::RowLengthMismatch { expected: 2, actual: 3 }))
        ));
    }

    #[test]
    fn decode_falls_back_to_windows_1252() {
        // "café" in Windows-1252: e9 is not valid UTF-8
        let bytes = b"name\ncaf\xe9\n";
        let table = decode(bytes).unwrap();
        assert_eq!(table.rows()[0][0], Value::Text("caf\u{e9}".to_owned()));
    }

    #[test]
    fn encode_round_trip_preserves_values() {
        let source = decode(b"name,value\nA,1\nB,2.5\nC,\n").unwrap();
        let bytes = encode(&source).unwrap();
        let round = decode(&bytes).unwrap();
        assert_eq!(round, source);
    }

    #[test]
    fn encode_quotes_fields_with_commas() {
        let mut table = Table::new(vec!["note".to_owned()]);
        table.push_row(vec![Value::Text("a,b".to_owned())]).unwrap();
        let bytes = encode(&table).unwrap();
        assert_eq!(String::from_utf8(bytes).unwrap(), "note\n\"a,b\"\n");
    }

    #[test]
    fn encode_zero_columns_is_empty() {
        let table = Table::new(Vec::new());
        assert!(encode(&table).unwrap().is_empty());
    }
}
