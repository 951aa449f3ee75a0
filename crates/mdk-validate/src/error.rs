//! Error types for validation.
//!
//! Only file access surfaces here. Content problems never become
//! errors; they accumulate as issues in the report.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidateError {
    /// Could not open the dataset file.
    #[error("failed to open dataset {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// Could not read a record from the dataset file.
    #[error("failed to read dataset {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// Result type for validation operations.
pub type Result<T> = std::result::Result<T, ValidateError>;
