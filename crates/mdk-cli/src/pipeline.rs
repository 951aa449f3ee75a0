//! Submission pipeline with explicit stages.
//!
//! The run splits into a fail-fast prelude and a per-variable loop:
//!
//! 1. **Load**: read and decode the wide source table (run-fatal)
//! 2. **Extract**: carve one data file per variable (run-fatal)
//! 3. Per variable, in source header order:
//!    fetch metadata → check metadata → check dataset → package
//!
//! A variable's first failing stage is terminal for that variable and
//! recorded in the run report; the loop always continues with the next
//! variable.

use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{debug, info, info_span, warn};

use mdk_fetch::{FetchError, MetadataClient};
use mdk_ingest::{
    ExtractSpec, ExtractedVariable, LoadOptions, VARIABLE_FILE_DELIMITER, extract_variables,
    load_table,
};
use mdk_package::package_variable;
use mdk_validate::{Issue, validate_dataset, validate_metadata};

use crate::config::RunConfig;
use crate::report::{RunReport, UnitReport, UnitStatus};

/// Executes one full submission run.
///
/// Returns `Err` only for run-fatal conditions: configuration problems,
/// a source table that cannot be loaded, or extraction failures.
/// Per-variable failures land in the returned report instead.
pub fn run(config: &RunConfig) -> Result<RunReport> {
    let run_start = Instant::now();
    config.validate()?;

    let options = LoadOptions {
        delimiter: config.delimiter,
        encoding: config.encoding.clone(),
    };
    let table = load_table(&config.input, &options)
        .with_context(|| format!("load source table {}", config.input.display()))?;
    info!(
        path = %config.input.display(),
        rows = table.height(),
        columns = table.width(),
        "source table loaded"
    );

    let spec = ExtractSpec {
        excluded_columns: config.excluded_columns.clone(),
        expected_rows: table.height(),
    };
    let extracted = extract_variables(&table, &spec, &config.workdir)
        .context("extract variables from source table")?;
    info!(variables = extracted.len(), "variables extracted");

    let client = MetadataClient::new(config.base_url.as_str(), config.timeout)
        .context("build metadata client")?;

    let mut units = Vec::with_capacity(extracted.len());
    for variable in &extracted {
        let span = info_span!("variable", variable = %variable.id);
        let _guard = span.enter();
        units.push(process_variable(&client, variable, config));
    }

    let report = RunReport {
        units,
        duration: run_start.elapsed(),
    };
    info!(
        variables = report.units.len(),
        packaged = report.packaged_count(),
        validated = report.validated_count(),
        failed = report.failed_count(),
        duration_ms = report.duration.as_millis(),
        "run complete"
    );
    Ok(report)
}

fn process_variable(
    client: &MetadataClient,
    variable: &ExtractedVariable,
    config: &RunConfig,
) -> UnitReport {
    let start = Instant::now();
    let (status, issues) = run_stages(client, variable, config);
    let duration = start.elapsed();
    if status.is_success() {
        debug!(
            status = status.label(),
            duration_ms = duration.as_millis(),
            "variable finished"
        );
    } else {
        warn!(
            status = status.label(),
            reasons = ?status.reasons(),
            duration_ms = duration.as_millis(),
            "variable failed"
        );
    }
    UnitReport {
        variable: variable.id.clone(),
        records: variable.rows,
        status,
        issues,
        duration,
    }
}

/// Stage ladder for one variable. The first failure is terminal; later
/// stages are not attempted.
fn run_stages(
    client: &MetadataClient,
    variable: &ExtractedVariable,
    config: &RunConfig,
) -> (UnitStatus, Vec<Issue>) {
    let fetched = match client.fetch(&variable.id, &config.workdir) {
        Ok(fetched) => fetched,
        // A body that came back but does not parse is a metadata
        // problem, not a transport problem.
        Err(error @ FetchError::Parse { .. }) => {
            return (
                UnitStatus::MetadataInvalid {
                    reasons: vec![error.to_string()],
                },
                Vec::new(),
            );
        }
        Err(error @ FetchError::Persist { .. }) => {
            return (
                UnitStatus::IoError {
                    reason: error.to_string(),
                },
                Vec::new(),
            );
        }
        Err(error) => {
            return (
                UnitStatus::FetchFailed {
                    reason: error.to_string(),
                },
                Vec::new(),
            );
        }
    };

    let check = validate_metadata(&variable.id, &fetched.raw);
    let metadata_reasons = check.report.reasons();
    let mut issues = check.report.issues;
    let Some(document) = check.document else {
        return (
            UnitStatus::MetadataInvalid {
                reasons: metadata_reasons,
            },
            issues,
        );
    };
    debug!(warnings = issues.len(), "metadata validated");

    let dataset_report = match validate_dataset(
        &variable.id,
        &variable.data_file,
        VARIABLE_FILE_DELIMITER,
        &document,
        variable.rows,
    ) {
        Ok(report) => report,
        Err(error) => {
            return (
                UnitStatus::IoError {
                    reason: error.to_string(),
                },
                issues,
            );
        }
    };
    let dataset_reasons = dataset_report.reasons();
    let dataset_valid = dataset_report.is_valid();
    issues.extend(dataset_report.issues);
    if !dataset_valid {
        return (
            UnitStatus::DatasetInvalid {
                reasons: dataset_reasons,
            },
            issues,
        );
    }
    debug!(records = variable.rows, "dataset validated");

    if config.dry_run {
        return (UnitStatus::Validated, issues);
    }

    match package_variable(
        &variable.id,
        &variable.data_file,
        &fetched.path,
        &config.key_dir,
        &config.output_dir,
    ) {
        Ok(packaged) => (
            UnitStatus::Packaged {
                archive: packaged.archive_path,
                sha256: packaged.sha256,
            },
            issues,
        ),
        Err(error) => (
            UnitStatus::PackageFailed {
                reason: error.to_string(),
            },
            issues,
        ),
    }
}
