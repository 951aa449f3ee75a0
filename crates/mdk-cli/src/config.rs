//! Run configuration assembled from CLI flags.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, bail};

/// Everything one submission run needs, resolved up front.
///
/// All fields come from explicit CLI flags. [`RunConfig::validate`] is
/// the run-fatal gate: it checks the inputs exist and creates the
/// working and output directories before any variable is touched.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Wide source table CSV.
    pub input: PathBuf,
    /// Metadata service base URL.
    pub base_url: String,
    /// Staging area for per-variable files.
    pub workdir: PathBuf,
    /// Destination for sealed archives.
    pub output_dir: PathBuf,
    /// Directory holding the recipient public key.
    pub key_dir: PathBuf,
    /// Field delimiter of the source table.
    pub delimiter: u8,
    /// WHATWG encoding label of the source table.
    pub encoding: String,
    /// Companion columns carried into every variable file.
    pub excluded_columns: Vec<String>,
    /// Metadata request timeout.
    pub timeout: Duration,
    /// Optional run-report JSON destination.
    pub report: Option<PathBuf>,
    /// Stop after dataset validation, package nothing.
    pub dry_run: bool,
}

impl RunConfig {
    /// Converts the CLI's delimiter string into the single byte the CSV
    /// layer works with.
    pub fn delimiter_byte(raw: &str) -> Result<u8> {
        let bytes = raw.as_bytes();
        if bytes.len() != 1 {
            bail!("delimiter must be a single byte, got {raw:?}");
        }
        Ok(bytes[0])
    }

    /// Checks the configuration against the filesystem and prepares the
    /// run directories. Any failure here aborts the run before the
    /// first variable is processed.
    pub fn validate(&self) -> Result<()> {
        if !self.input.is_file() {
            bail!("input file {} does not exist", self.input.display());
        }
        if !self.key_dir.is_dir() {
            bail!("key directory {} does not exist", self.key_dir.display());
        }
        fs::create_dir_all(&self.workdir)
            .with_context(|| format!("create working directory {}", self.workdir.display()))?;
        fs::create_dir_all(&self.output_dir)
            .with_context(|| format!("create output directory {}", self.output_dir.display()))?;
        Ok(())
    }
}
