//! Error types for metadata retrieval.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while talking to the metadata service or
/// persisting its documents.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Base URL is empty or unusable.
    #[error("invalid metadata service base URL {url:?}")]
    InvalidBaseUrl { url: String },

    /// HTTP client construction failed.
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    /// Transport-level failure, including timeouts.
    #[error("metadata request for {variable} failed: {source}")]
    Network {
        variable: String,
        #[source]
        source: reqwest::Error,
    },

    /// Service answered with a non-success status.
    #[error("metadata service returned HTTP {status} for {variable}")]
    Status { variable: String, status: u16 },

    /// Response body is not valid JSON.
    #[error("metadata document for {variable} is not valid JSON: {source}")]
    Parse {
        variable: String,
        #[source]
        source: serde_json::Error,
    },

    /// Could not persist the fetched document.
    #[error("failed to write {path}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for fetch operations.
pub type Result<T> = std::result::Result<T, FetchError>;
