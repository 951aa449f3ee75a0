//! Per-variable terminal statuses for one run and the JSON artifact
//! written for `--report`.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{SecondsFormat, Utc};
use mdk_model::VariableId;
use mdk_validate::{Issue, Severity};
use serde::Serialize;

/// Identifies the report layout for downstream consumers.
pub const REPORT_SCHEMA: &str = "mdk-run-report/v1";

/// Terminal outcome of one variable. Every variable of a run ends in
/// exactly one of these.
#[derive(Debug, Clone)]
pub enum UnitStatus {
    /// Sealed archive written.
    Packaged { archive: PathBuf, sha256: String },
    /// Both checks passed under `--dry-run`; nothing written.
    Validated,
    /// Metadata request failed (network, timeout, or HTTP status).
    FetchFailed { reason: String },
    /// Metadata document violated its contract.
    MetadataInvalid { reasons: Vec<String> },
    /// Data records violated the declared metadata.
    DatasetInvalid { reasons: Vec<String> },
    /// Key, crypto, or archive failure during packaging.
    PackageFailed { reason: String },
    /// Per-unit file access failure during validation.
    IoError { reason: String },
}

impl UnitStatus {
    /// A successful terminal state: packaged, or validated under
    /// dry-run.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Packaged { .. } | Self::Validated)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Packaged { .. } => "packaged",
            Self::Validated => "validated",
            Self::FetchFailed { .. } => "fetch-failed",
            Self::MetadataInvalid { .. } => "metadata-invalid",
            Self::DatasetInvalid { .. } => "dataset-invalid",
            Self::PackageFailed { .. } => "package-failed",
            Self::IoError { .. } => "io-error",
        }
    }

    /// Rendered failure reasons; empty for successful states.
    pub fn reasons(&self) -> Vec<String> {
        match self {
            Self::Packaged { .. } | Self::Validated => Vec::new(),
            Self::FetchFailed { reason }
            | Self::PackageFailed { reason }
            | Self::IoError { reason } => vec![reason.clone()],
            Self::MetadataInvalid { reasons } | Self::DatasetInvalid { reasons } => {
                reasons.clone()
            }
        }
    }
}

/// One variable's ledger entry.
#[derive(Debug)]
pub struct UnitReport {
    pub variable: VariableId,
    /// Records in the variable's data file.
    pub records: usize,
    pub status: UnitStatus,
    /// Validation issues observed on the way, warnings included. Also
    /// populated for packaged variables that carried warnings.
    pub issues: Vec<Issue>,
    pub duration: Duration,
}

impl UnitReport {
    pub fn error_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|issue| issue.severity() == Severity::Error)
            .count()
    }

    pub fn warning_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|issue| issue.severity() == Severity::Warning)
            .count()
    }
}

/// The full per-variable ledger for one run, in source header order.
#[derive(Debug)]
pub struct RunReport {
    pub units: Vec<UnitReport>,
    pub duration: Duration,
}

impl RunReport {
    pub fn has_failures(&self) -> bool {
        self.units.iter().any(|unit| !unit.status.is_success())
    }

    pub fn packaged_count(&self) -> usize {
        self.units
            .iter()
            .filter(|unit| matches!(unit.status, UnitStatus::Packaged { .. }))
            .count()
    }

    pub fn validated_count(&self) -> usize {
        self.units
            .iter()
            .filter(|unit| matches!(unit.status, UnitStatus::Validated))
            .count()
    }

    pub fn failed_count(&self) -> usize {
        self.units
            .iter()
            .filter(|unit| !unit.status.is_success())
            .count()
    }

    /// Writes the report as pretty-printed JSON.
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let artifact = ReportArtifact {
            schema: REPORT_SCHEMA,
            generated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            tool: ToolInfo {
                name: "mdk",
                version: env!("CARGO_PKG_VERSION"),
            },
            totals: Totals {
                variables: self.units.len(),
                packaged: self.packaged_count(),
                validated: self.validated_count(),
                failed: self.failed_count(),
            },
            duration_ms: self.duration.as_millis(),
            variables: self.units.iter().map(UnitEntry::from).collect(),
        };
        let mut body = serde_json::to_vec_pretty(&artifact)
            .with_context(|| format!("serialize run report {}", path.display()))?;
        body.push(b'\n');
        fs::write(path, body).with_context(|| format!("write run report {}", path.display()))
    }
}

#[derive(Serialize)]
struct ReportArtifact<'a> {
    schema: &'static str,
    generated_at: String,
    tool: ToolInfo,
    totals: Totals,
    duration_ms: u128,
    variables: Vec<UnitEntry<'a>>,
}

#[derive(Serialize)]
struct ToolInfo {
    name: &'static str,
    version: &'static str,
}

#[derive(Serialize)]
struct Totals {
    variables: usize,
    packaged: usize,
    validated: usize,
    failed: usize,
}

#[derive(Serialize)]
struct UnitEntry<'a> {
    variable: &'a str,
    status: &'static str,
    records: usize,
    errors: usize,
    warnings: usize,
    duration_ms: u128,
    #[serde(skip_serializing_if = "Option::is_none")]
    archive: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha256: Option<&'a str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    reasons: Vec<String>,
}

impl<'a> From<&'a UnitReport> for UnitEntry<'a> {
    fn from(unit: &'a UnitReport) -> Self {
        let (archive, sha256) = match &unit.status {
            UnitStatus::Packaged { archive, sha256 } => {
                (Some(archive.display().to_string()), Some(sha256.as_str()))
            }
            _ => (None, None),
        };
        Self {
            variable: unit.variable.as_str(),
            status: unit.status.label(),
            records: unit.records,
            errors: unit.error_count(),
            warnings: unit.warning_count(),
            duration_ms: unit.duration.as_millis(),
            archive,
            sha256,
            reasons: unit.status.reasons(),
        }
    }
}
