use thiserror::Error;

/// Main error type for the data sweeper pipeline.
/// Aggregates errors from the standard library, dependencies, and internal modules.
#[derive(Error, Debug)]
pub enum SweeperError {
    /// File extension is not one of the supported tabular formats.
    /// Recoverable: the caller skips the file and continues with the rest of the batch.
    #[error("Unsupported file format '{0}'")]
    UnsupportedFormat(String),

    /// File content does not parse as the declared format.
    /// Recoverable: reported per file, other files are unaffected.
    #[error("Failed to decode '{name}': {detail}")]
    DecodeError { name: String, detail: String },

    /// Table cannot be serialized to the requested format. No artifact is produced.
    #[error("Failed to encode to {format}: {detail}")]
    EncodeError { format: String, detail: String },

    // Standard library errors
    #[error("{0}")]
    IoError(#[from] std::io::Error),

    #[error("{0}")]
    ParseIntError(#[from] std::num::ParseIntError),

    #[error("{0}")]
    ParseFloatError(#[from] std::num::ParseFloatError),

    // Third-party library errors
    #[error("{0}")]
    CsvError(#[from] csv::Error),

    #[error("{0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("{0}")]
    XmlError(#[from] quick_xml::Error),

    #[error("{0}")]
    XmlEncodingError(#[from] quick_xml::encoding::EncodingError),

    #[error("{0}")]
    XmlAttributeError(#[from] quick_xml::events::attributes::AttrError),

    // Helper module errors
    #[error("{0}")]
    XmlHelperError(#[from] crate::helpers::xml::XmlError),

    // Domain module errors
    #[error("{0}")]
    TableError(#[from] crate::table::TableError),

    #[error("{0}")]
    XlsxError(#[from] crate::codec::xlsx::XlsxError),

    #[error("{0}")]
    SessionError(#[from] crate::session::SessionError),
}

impl SweeperError {
    /// Wraps a decoding failure with the name of the file that produced it.
    pub(crate) fn decode(name: &str, error: impl std::fmt::Display) -> Self {
        SweeperError::DecodeError {
            name: name.to_owned(),
            detail: error.to_string(),
        }
    }

    /// Wraps an encoding failure with the target format name.
    pub(crate) fn encode(format: &str, error: impl std::fmt::Display) -> Self {
        SweeperError::EncodeError {
            format: format.to_owned(),
            detail: error.to_string(),
        }
    }
}
