//! # Data Sweeper
//!
//! A cleaning and conversion pipeline for tabular file uploads. Uploaded CSV
//! and Excel (`.xlsx`) files are decoded into an in-memory table, cleaned,
//! optionally narrowed to a column selection, and re-encoded in either format
//! for download.
//!
//! ## Features
//!
//! - **Multi-format support**: Decode and encode CSV and Excel (`.xlsx`) files
//! - **Cleaning operations**: Duplicate-row removal and mean imputation of
//!   missing numeric cells, applied in caller order
//! - **Column selection**: Project a table to a named subset of its columns
//! - **Chart projection**: Derive row-indexed line series from the first
//!   numeric columns, with missing cells as gaps
//! - **Batch isolation**: Each file in a batch succeeds or fails on its own
//! - **Session state**: An explicit store for uploads and profile records,
//!   keyed by issued ids rather than file names
//! - **Pure Rust implementation**: Hand-rolled `.xlsx` reading and writing
//!   over `zip` and `quick-xml`, no native dependencies

mod codec;
mod error;
mod helpers;
mod pipeline;
mod session;
mod table;

pub use crate::codec::decode;
pub use crate::codec::encode;
pub use crate::codec::EncodedArtifact;
pub use crate::codec::Format;
pub use crate::codec::UploadedFile;
pub use crate::codec::xlsx::XlsxError;
pub use crate::error::SweeperError;
pub use crate::helpers::xml::XmlError;
pub use crate::pipeline::chart::line_series;
pub use crate::pipeline::chart::Series;
pub use crate::pipeline::process;
pub use crate::pipeline::project;
pub use crate::pipeline::sweep;
pub use crate::pipeline::CleanOp;
pub use crate::pipeline::SweepOutcome;
pub use crate::pipeline::SweepRequest;
pub use crate::session::LearningStyle;
pub use crate::session::Profile;
pub use crate::session::ProfileSubmission;
pub use crate::session::SessionError;
pub use crate::session::SessionStore;
pub use crate::session::UploadEntry;
pub use crate::session::UploadId;
pub use crate::table::Table;
pub use crate::table::TableError;
pub use crate::table::TableSummary;
pub use crate::table::Value;
