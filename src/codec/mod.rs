//! Format dispatch and byte-level encoding/decoding of tabular files.

pub(crate) mod csv;
pub(crate) mod xlsx;

use crate::error::SweeperError;
use crate::table::Table;
use tracing::debug;

/// Supported tabular file formats.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Format {
    Csv,
    Xlsx,
}

impl Format {
    /// All supported formats, used for extension dispatch.
    const ALL: [Format; 2] = [Format::Csv, Format::Xlsx];

    /// Maps a file extension (without the dot, any case) to a format.
    pub fn from_extension(extension: &str) -> Option<Format> {
        Format::ALL
            .into_iter()
            .find(|format| format.extension().eq_ignore_ascii_case(extension))
    }

    /// Canonical lowercase file extension, without the dot.
    pub const fn extension(&self) -> &'static str {
        match self {
            Format::Csv => "csv",
            Format::Xlsx => "xlsx",
        }
    }

    /// MIME type of the encoded artifact.
    pub const fn mime(&self) -> &'static str {
        match self {
            Format::Csv => "text/csv",
            Format::Xlsx => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        }
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

/// An uploaded file: name with extension plus raw byte content.
/// Read at most once per operation and discarded with the session.
#[derive(Clone, Debug)]
pub struct UploadedFile {
    name: String,
    content: Vec<u8>,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, content: Vec<u8>) -> UploadedFile {
        UploadedFile {
            name: name.into(),
            content,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Size of the raw content in bytes.
    pub fn size(&self) -> usize {
        self.content.len()
    }

    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// The lowercased extension after the final dot, if any.
    pub fn extension(&self) -> Option<String> {
        extension_of(&self.name)
    }
}

/// A table serialized to a target format, ready for download.
#[derive(Clone, Debug)]
pub struct EncodedArtifact {
    pub bytes: Vec<u8>,
    pub file_name: String,
    pub mime: &'static str,
}

/// Decodes an uploaded file into a table based on its declared extension.
///
/// Unknown extensions fail with `UnsupportedFormat`; unparseable content
/// fails with `DecodeError` carrying the underlying parse detail. Either way
/// the failure is contained to this one file.
pub fn decode(file: &UploadedFile) -> Result<Table, SweeperError> {
    let extension = file
        .extension()
        .ok_or_else(|| SweeperError::UnsupportedFormat(file.name().to_owned()))?;
    let format = Format::from_extension(&extension)
        .ok_or_else(|| SweeperError::UnsupportedFormat(format!(".{}", extension)))?;
    debug!(name = file.name(), size = file.size(), %format, "decoding upload");
    let table = match format {
        Format::Csv => csv::decode(file.content()),
        Format::Xlsx => xlsx::decode(file.content()),
    }
    .map_err(|error| SweeperError::decode(file.name(), error))?;
    debug!(
        name = file.name(),
        rows = table.row_count(),
        columns = table.column_count(),
        "decoded upload"
    );
    Ok(table)
}

/// Encodes a table into the target format, deriving the download file name
/// from the original upload name.
pub fn encode(table: &Table, format: Format, original_name: &str) -> Result<EncodedArtifact, SweeperError> {
    let bytes = match format {
        Format::Csv => csv::encode(table),
        Format::Xlsx => xlsx::encode(table),
    }
    .map_err(|error| SweeperError::encode(format.extension(), error))?;
    let file_name = derive_file_name(original_name, format);
    debug!(%format, file_name, size = bytes.len(), "encoded artifact");
    Ok(EncodedArtifact {
        bytes,
        file_name,
        mime: format.mime(),
    })
}

/// Derives the download file name by swapping the trailing extension.
///
/// Strips the suffix after the final dot and appends the target extension.
/// Only the trailing extension is touched, so a name like `my.csv.report.csv`
/// becomes `my.csv.report.xlsx`.
pub(crate) fn derive_file_name(original: &str, target: Format) -> String {
    let stem = match original.rfind('.') {
        Some(index) if index > 0 => &original[..index],
        _ => original,
    };
    format!("{}.{}", stem, target.extension())
}

/// The lowercased extension after the final dot of a file name.
pub(crate) fn extension_of(name: &str) -> Option<String> {
    match name.rfind('.') {
        Some(index) if index > 0 && index + 1 < name.len() => {
            Some(name[index + 1..].to_ascii_lowercase())
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Value;

    #[test]
    fn format_from_extension() {
        assert_eq!(Format::from_extension("csv"), Some(Format::Csv));
        assert_eq!(Format::from_extension("XLSX"), Some(Format::Xlsx));
        assert_eq!(Format::from_extension("txt"), None);
    }

    #[test]
    fn format_mime_types() {
        assert_eq!(Format::Csv.mime(), "text/csv");
        assert_eq!(
            Format::Xlsx.mime(),
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
        );
    }

    #[test]
    fn derive_file_name_swaps_trailing_extension() {
        assert_eq!(derive_file_name("report.csv", Format::Xlsx), "report.xlsx");
        assert_eq!(derive_file_name("report.xlsx", Format::Csv), "report.csv");
    }

    #[test]
    fn derive_file_name_only_touches_suffix() {
        assert_eq!(derive_file_name("my.csv.report.csv", Format::Xlsx), "my.csv.report.xlsx");
        assert_eq!(derive_file_name("noextension", Format::Csv), "noextension.csv");
        assert_eq!(derive_file_name(".hidden", Format::Csv), ".hidden.csv");
    }

    #[test]
    fn decode_rejects_unknown_extension() {
        let file = UploadedFile::new("notes.txt", b"name,value\nA,1\n".to_vec());
        let result = decode(&file);
        assert!(matches!(result, Err(SweeperError::UnsupportedFormat(ref ext)) if ext == ".txt"));
    }

    #[test]
    fn decode_reports_parse_failure_per_file() {
        let file = UploadedFile::new("broken.xlsx", b"not a zip archive".to_vec());
        let result = decode(&file);
        assert!(matches!(result, Err(SweeperError::DecodeError { ref name, .. }) if name == "broken.xlsx"));
    }

    #[test]
    fn decode_csv_upload() {
        let file = UploadedFile::new("data.CSV", b"name,value\nA,1\nB,2\n".to_vec());
        let table = decode(&file).unwrap();
        assert_eq!(table.columns(), ["name", "value"]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.rows()[1][1], Value::Number(2.0));
    }

    #[test]
    fn encode_derives_name_and_mime() {
        let mut table = Table::new(vec!["a".to_owned()]);
        table.push_row(vec![Value::Number(1.0)]).unwrap();
        let artifact = encode(&table, Format::Xlsx, "original.csv").unwrap();
        assert_eq!(artifact.file_name, "original.xlsx");
        assert_eq!(
            artifact.mime,
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
        );
        assert_eq!(&artifact.bytes[..2], b"PK");
    }
}
