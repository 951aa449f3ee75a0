//! Error types for packaging.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while sealing and archiving a variable.
///
/// All of these are per-variable failures in the pipeline; none abort
/// a run.
#[derive(Debug, Error)]
pub enum PackageError {
    /// Conventional public key file is absent from the key directory.
    #[error("recipient key not found: {path}")]
    MissingKey { path: PathBuf },

    /// PEM file present but not a usable RSA public key.
    #[error("recipient key {path} is not a valid RSA public key: {reason}")]
    InvalidKey { path: PathBuf, reason: String },

    /// Symmetric encryption failed.
    #[error("payload encryption failed: {0}")]
    Encrypt(String),

    /// Symmetric decryption failed.
    #[error("payload decryption failed: {0}")]
    Decrypt(String),

    /// Sealed payload shorter than its nonce prefix.
    #[error("sealed payload too short to contain a nonce")]
    PayloadTooShort,

    /// Wrapping the symmetric key under the recipient key failed.
    #[error("symmetric key wrap failed: {0}")]
    KeyWrap(#[source] rsa::Error),

    /// Unwrapping the symmetric key failed.
    #[error("symmetric key unwrap failed: {0}")]
    KeyUnwrap(#[source] rsa::Error),

    /// Could not read an input file into the archive.
    #[error("failed to read {path}: {source}")]
    ReadInput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Filesystem failure while writing an archive.
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for packaging operations.
pub type Result<T> = std::result::Result<T, PackageError>;
