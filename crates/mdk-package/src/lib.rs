//! Packaging for the microdata deposit pipeline.
//!
//! Each validated variable becomes one outer `<STEM>.tar` in the output
//! directory holding the sealed inner archive (`<STEM>.tar.encr`) and
//! the RSA-wrapped symmetric key (`<STEM>.symkey.encr`).

pub mod archive;
pub mod crypto;
pub mod error;

use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use mdk_model::VariableId;

pub use archive::{build_inner_archive, write_outer_archive};
pub use crypto::{PUBLIC_KEY_FILENAME, SealedPayload, load_recipient_key, open, seal};
pub use error::{PackageError, Result};

/// One deposited archive, with its audit checksum.
#[derive(Debug, Clone)]
pub struct PackagedUnit {
    pub variable: VariableId,
    pub archive_path: PathBuf,
    pub size: u64,
    pub sha256: String,
}

/// Packages one validated variable: the inner tar of its two working
/// files, sealed under the recipient key, written as the outer deposit
/// archive.
///
/// The recipient key is loaded per call so a missing or corrupt key
/// stays a per-variable failure rather than aborting the run.
pub fn package_variable(
    id: &VariableId,
    data_file: &Path,
    metadata_file: &Path,
    key_dir: &Path,
    output_dir: &Path,
) -> Result<PackagedUnit> {
    let recipient = crypto::load_recipient_key(key_dir)?;
    let inner = archive::build_inner_archive(id, data_file, metadata_file)?;
    let sealed = crypto::seal(&recipient, &inner)?;
    let archive_path = archive::write_outer_archive(output_dir, id, &sealed)?;

    let bytes = std::fs::read(&archive_path).map_err(|e| PackageError::ReadInput {
        path: archive_path.clone(),
        source: e,
    })?;
    let sha256 = hex::encode(Sha256::digest(&bytes));
    let size = bytes.len() as u64;

    tracing::debug!(
        variable = %id,
        path = %archive_path.display(),
        size,
        "variable packaged"
    );
    Ok(PackagedUnit {
        variable: id.clone(),
        archive_path,
        size,
        sha256,
    })
}
