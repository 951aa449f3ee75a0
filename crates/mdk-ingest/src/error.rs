//! Error types for source table ingestion.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading the source table or carving out
/// per-variable files.
#[derive(Debug, Error)]
pub enum IngestError {
    /// Source table not found.
    #[error("source table not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read a file.
    #[error("failed to read {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to create or write a file.
    #[error("failed to write {path}: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Encoding label not recognized by the decoder.
    #[error("unknown encoding label {label:?}")]
    UnknownEncoding { label: String },

    /// CSV parsing failed.
    #[error("failed to parse CSV {path}: {source}")]
    CsvParse {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// CSV writing failed.
    #[error("failed to write CSV {path}: {source}")]
    CsvWrite {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// Table has no header row or no content at all.
    #[error("source table is empty: {path}")]
    EmptyTable { path: PathBuf },

    /// First structural defect found in the table.
    #[error("malformed table {path}: row {row} has {found} cells, expected {expected}")]
    MalformedTable {
        path: PathBuf,
        row: usize,
        expected: usize,
        found: usize,
    },

    /// The same variable column appears more than once.
    #[error("duplicate variable column {name:?}")]
    DuplicateVariable { name: String },

    /// Every column was excluded; nothing to process.
    #[error("no variable columns remain after exclusions")]
    NoVariableColumns,

    /// A variable file came out at the wrong record count.
    #[error("variable {variable}: wrote {found} records, expected {expected}")]
    RowCountMismatch {
        variable: String,
        expected: usize,
        found: usize,
    },

    #[error(transparent)]
    Model(#[from] mdk_model::ModelError),
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;
