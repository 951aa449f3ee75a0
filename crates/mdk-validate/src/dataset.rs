//! Dataset validation against the variable's typed metadata.
//!
//! Every record of the per-variable file is resolved against the
//! declared type, domain, and cardinality. All violations accumulate;
//! a file with k bad values produces a report citing k rows.

use std::collections::BTreeMap;
use std::path::Path;

use mdk_model::{MetadataDocument, TypedValue, VariableId};

use crate::error::{Result, ValidateError};
use crate::issue::Issue;
use crate::report::ValidationReport;

/// Validates one per-variable data file against its metadata document.
///
/// Records carry the companion columns first and the variable's value
/// last, no header row. `expected_rows` is the extraction contract.
/// The `Result` covers file access only; content problems land in the
/// report.
pub fn validate_dataset(
    id: &VariableId,
    data_file: &Path,
    delimiter: u8,
    doc: &MetadataDocument,
    expected_rows: usize,
) -> Result<ValidationReport> {
    let mut report = ValidationReport::new(id.as_str());

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_path(data_file)
        .map_err(|e| ValidateError::Open {
            path: data_file.to_path_buf(),
            source: e,
        })?;

    let sentinels = doc.missing_sentinels();
    let codes = doc.category_codes();
    let mut records = 0usize;
    let mut unit_counts: BTreeMap<String, u64> = BTreeMap::new();

    for (idx, record) in reader.records().enumerate() {
        let record = record.map_err(|e| ValidateError::Read {
            path: data_file.to_path_buf(),
            source: e,
        })?;
        records += 1;
        let row = idx + 1;

        let raw = record.iter().last().unwrap_or("");
        if record.len() > 1
            && let Some(unit) = record.get(0)
        {
            *unit_counts.entry(unit.to_string()).or_insert(0) += 1;
        }

        match TypedValue::resolve(raw, doc.data_type, sentinels) {
            None => report.push(Issue::TypeMismatch {
                row,
                value: raw.to_string(),
                expected: doc.data_type,
            }),
            Some(TypedValue::Missing) => {
                if doc.mandatory && raw.trim().is_empty() {
                    report.push(Issue::EmptyMandatory { row });
                }
            }
            Some(value) => {
                if let Some(codes) = &codes {
                    let code = value.category_code().unwrap_or(raw.trim());
                    if !codes.contains(&code) {
                        report.push(Issue::OutOfDomain {
                            row,
                            value: code.to_string(),
                        });
                    }
                }
            }
        }
    }

    if records != expected_rows {
        report.push(Issue::RowCountMismatch {
            expected: expected_rows,
            found: records,
        });
    }

    if let Some(cardinality) = doc.cardinality {
        for (unit, count) in &unit_counts {
            let below = *count < cardinality.min;
            let above = cardinality.max.is_some_and(|max| *count > max);
            if below || above {
                report.push(Issue::CardinalityViolation {
                    unit: unit.clone(),
                    count: *count,
                    min: cardinality.min,
                    max: cardinality.max,
                });
            }
        }
    }

    tracing::debug!(
        variable = %id,
        records,
        errors = report.error_count(),
        "dataset validation complete"
    );
    Ok(report)
}
