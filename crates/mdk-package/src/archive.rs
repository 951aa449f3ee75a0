//! Inner and outer archive assembly.
//!
//! The inner tar carries the variable's two working files under fixed
//! entry names. Its sealed bytes plus the wrapped symmetric key form
//! the outer `<STEM>.tar` that gets deposited.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use mdk_model::VariableId;

use crate::crypto::SealedPayload;
use crate::error::{PackageError, Result};

/// Builds the in-memory inner tar holding `<STEM>.csv` and
/// `<STEM>.json`. Entry names are fixed regardless of source paths so
/// relocated working directories produce identical layouts.
pub fn build_inner_archive(
    id: &VariableId,
    data_file: &Path,
    metadata_file: &Path,
) -> Result<Vec<u8>> {
    let stem = id.file_stem();
    let mut builder = tar::Builder::new(Vec::new());

    append_file(&mut builder, data_file, &format!("{stem}.csv"))?;
    append_file(&mut builder, metadata_file, &format!("{stem}.json"))?;

    builder.into_inner().map_err(|e| PackageError::Io {
        path: PathBuf::from(format!("{stem}.tar")),
        source: e,
    })
}

/// Writes `output_dir/<STEM>.tar` with the sealed payload and the
/// wrapped key as its two entries. The archive is synced to disk before
/// returning; a partial archive left by a failure is removed.
pub fn write_outer_archive(
    output_dir: &Path,
    id: &VariableId,
    sealed: &SealedPayload,
) -> Result<PathBuf> {
    fs::create_dir_all(output_dir).map_err(|e| PackageError::Io {
        path: output_dir.to_path_buf(),
        source: e,
    })?;
    let stem = id.file_stem();
    let path = output_dir.join(format!("{stem}.tar"));

    let written = write_entries(&path, &stem, sealed);
    if written.is_err() {
        let _ = fs::remove_file(&path);
    }
    written.map(|()| path)
}

fn write_entries(path: &Path, stem: &str, sealed: &SealedPayload) -> Result<()> {
    let io_err = |source| PackageError::Io {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(io_err)?;
    let mut builder = tar::Builder::new(BufWriter::new(file));
    append_bytes(
        &mut builder,
        path,
        &format!("{stem}.tar.encr"),
        &sealed.ciphertext,
    )?;
    append_bytes(
        &mut builder,
        path,
        &format!("{stem}.symkey.encr"),
        &sealed.encrypted_key,
    )?;

    let writer = builder.into_inner().map_err(io_err)?;
    let file = writer.into_inner().map_err(|e| io_err(e.into_error()))?;
    file.sync_all().map_err(io_err)?;
    Ok(())
}

fn append_file(builder: &mut tar::Builder<Vec<u8>>, source: &Path, entry_name: &str) -> Result<()> {
    let contents = fs::read(source).map_err(|e| PackageError::ReadInput {
        path: source.to_path_buf(),
        source: e,
    })?;
    append_bytes(builder, source, entry_name, &contents)
}

fn append_bytes<W: Write>(
    builder: &mut tar::Builder<W>,
    origin: &Path,
    entry_name: &str,
    bytes: &[u8],
) -> Result<()> {
    let mut header = tar::Header::new_gnu();
    header.set_size(bytes.len() as u64);
    header.set_mode(0o644);
    header.set_cksum();
    builder
        .append_data(&mut header, entry_name, bytes)
        .map_err(|e| PackageError::Io {
            path: origin.to_path_buf(),
            source: e,
        })
}
