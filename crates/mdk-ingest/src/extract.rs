//! Per-variable extraction: one CSV per variable under the working
//! directory, ready for validation and packaging.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use mdk_model::{RawTable, VariableId};

use crate::error::{IngestError, Result};

/// Delimiter of the per-variable files handed to the statistics body.
/// Fixed by the deposit format, independent of the source delimiter.
pub const VARIABLE_FILE_DELIMITER: u8 = b';';

/// What to carve out of the table and the record-count contract every
/// variable file must satisfy.
#[derive(Debug, Clone)]
pub struct ExtractSpec {
    /// Companion columns copied into every variable file (identifier and
    /// temporal columns in registry deposits). Matched case-insensitively;
    /// names absent from the header are skipped with a warning.
    pub excluded_columns: Vec<String>,
    /// Every variable file must come out at exactly this many records.
    /// Callers pass the loaded table's height.
    pub expected_rows: usize,
}

/// One variable carved out of the source table.
#[derive(Debug, Clone)]
pub struct ExtractedVariable {
    pub id: VariableId,
    pub data_file: PathBuf,
    pub rows: usize,
}

/// Splits the table into per-variable files under
/// `workdir/<STEM>/<STEM>.csv`.
///
/// Each record lists the companion columns in source header order
/// followed by the variable's own value, no header row. Existing files
/// are overwritten so re-runs are idempotent. Returns the variables in
/// source header order.
pub fn extract_variables(
    table: &RawTable,
    spec: &ExtractSpec,
    workdir: &Path,
) -> Result<Vec<ExtractedVariable>> {
    let companion_indices = resolve_companions(table, &spec.excluded_columns);
    let variables = variable_columns(table, &companion_indices)?;

    let mut extracted = Vec::with_capacity(variables.len());
    for (id, column) in variables {
        let (data_file, rows) =
            write_variable_file(table, &id, column, &companion_indices, spec, workdir)?;
        tracing::debug!(variable = %id, path = %data_file.display(), rows, "extracted variable file");
        extracted.push(ExtractedVariable {
            id,
            data_file,
            rows,
        });
    }

    tracing::debug!(
        variables = extracted.len(),
        workdir = %workdir.display(),
        "variable extraction complete"
    );
    Ok(extracted)
}

/// The variables a run over this table would process, in source header
/// order, without writing anything to disk.
pub fn variable_plan(table: &RawTable, excluded_columns: &[String]) -> Result<Vec<VariableId>> {
    let companion_indices = resolve_companions(table, excluded_columns);
    Ok(variable_columns(table, &companion_indices)?
        .into_iter()
        .map(|(id, _)| id)
        .collect())
}

/// Header indices of the companion columns, ascending. Names the header
/// does not carry are skipped with a warning, matching the lenient
/// posture of registry exports that vary by year.
fn resolve_companions(table: &RawTable, excluded: &[String]) -> Vec<usize> {
    let mut indices = Vec::new();
    for name in excluded {
        match table.column_index(name) {
            Some(idx) => indices.push(idx),
            None => {
                tracing::warn!(column = %name, "excluded column not present in table header, skipping");
            }
        }
    }
    indices.sort_unstable();
    indices.dedup();
    indices
}

fn variable_columns(
    table: &RawTable,
    companion_indices: &[usize],
) -> Result<Vec<(VariableId, usize)>> {
    let mut seen = BTreeSet::new();
    let mut variables = Vec::new();
    for (idx, header) in table.headers().iter().enumerate() {
        if companion_indices.contains(&idx) {
            continue;
        }
        let id = VariableId::new(header.as_str())?;
        if !seen.insert(id.clone()) {
            return Err(IngestError::DuplicateVariable {
                name: id.to_string(),
            });
        }
        variables.push((id, idx));
    }
    if variables.is_empty() {
        return Err(IngestError::NoVariableColumns);
    }
    Ok(variables)
}

fn write_variable_file(
    table: &RawTable,
    id: &VariableId,
    column: usize,
    companion_indices: &[usize],
    spec: &ExtractSpec,
    workdir: &Path,
) -> Result<(PathBuf, usize)> {
    let stem = id.file_stem();
    let dir = workdir.join(&stem);
    fs::create_dir_all(&dir).map_err(|e| IngestError::FileWrite {
        path: dir.clone(),
        source: e,
    })?;
    let path = dir.join(format!("{stem}.csv"));

    let file = fs::File::create(&path).map_err(|e| IngestError::FileWrite {
        path: path.clone(),
        source: e,
    })?;
    let mut writer = csv::WriterBuilder::new()
        .delimiter(VARIABLE_FILE_DELIMITER)
        .from_writer(file);

    let mut written = 0usize;
    for row in table.rows() {
        let mut record: Vec<&str> = Vec::with_capacity(companion_indices.len() + 1);
        for &idx in companion_indices {
            record.push(row[idx].as_str());
        }
        record.push(row[column].as_str());
        writer
            .write_record(&record)
            .map_err(|e| IngestError::CsvWrite {
                path: path.clone(),
                source: e,
            })?;
        written += 1;
    }
    writer.flush().map_err(|e| IngestError::FileWrite {
        path: path.clone(),
        source: e,
    })?;

    if written != spec.expected_rows {
        return Err(IngestError::RowCountMismatch {
            variable: id.to_string(),
            expected: spec.expected_rows,
            found: written,
        });
    }
    Ok((path, written))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn table(headers: &[&str], rows: &[&[&str]]) -> RawTable {
        RawTable::new(
            headers.iter().map(|h| (*h).to_string()).collect(),
            rows.iter()
                .map(|row| row.iter().map(|c| (*c).to_string()).collect())
                .collect(),
        )
        .unwrap()
    }

    fn spec(excluded: &[&str], expected_rows: usize) -> ExtractSpec {
        ExtractSpec {
            excluded_columns: excluded.iter().map(|c| (*c).to_string()).collect(),
            expected_rows,
        }
    }

    #[test]
    fn writes_companions_then_value_per_variable() {
        let workdir = TempDir::new().unwrap();
        let table = table(
            &["sidkrg", "start_time", "age", "sex"],
            &[
                &["p1", "2020-01-01", "42", "1"],
                &["p2", "2020-01-01", "39", "2"],
            ],
        );
        let extracted = extract_variables(
            &table,
            &spec(&["sidkrg", "start_time"], 2),
            workdir.path(),
        )
        .unwrap();

        assert_eq!(extracted.len(), 2);
        assert_eq!(extracted[0].id.as_str(), "age");
        assert_eq!(extracted[1].id.as_str(), "sex");
        assert_eq!(extracted[0].rows, 2);

        let age = std::fs::read_to_string(workdir.path().join("AGE/AGE.csv")).unwrap();
        assert_eq!(age, "p1;2020-01-01;42\np2;2020-01-01;39\n");
        let sex = std::fs::read_to_string(workdir.path().join("SEX/SEX.csv")).unwrap();
        assert_eq!(sex, "p1;2020-01-01;1\np2;2020-01-01;2\n");
    }

    #[test]
    fn preserves_header_order() {
        let workdir = TempDir::new().unwrap();
        let table = table(&["zeta", "alpha", "mid"], &[&["1", "2", "3"]]);
        let extracted = extract_variables(&table, &spec(&[], 1), workdir.path()).unwrap();
        let names: Vec<&str> = extracted.iter().map(|v| v.id.as_str()).collect();
        assert_eq!(names, ["zeta", "alpha", "mid"]);
    }

    #[test]
    fn excluded_matching_is_case_insensitive() {
        let workdir = TempDir::new().unwrap();
        let table = table(&["SIDKRG", "age"], &[&["p1", "42"]]);
        let extracted =
            extract_variables(&table, &spec(&["sidkrg"], 1), workdir.path()).unwrap();
        assert_eq!(extracted.len(), 1);
        assert_eq!(extracted[0].id.as_str(), "age");
    }

    #[test]
    fn unknown_excluded_column_is_skipped() {
        let workdir = TempDir::new().unwrap();
        let table = table(&["age"], &[&["42"]]);
        let extracted =
            extract_variables(&table, &spec(&["sidkrg"], 1), workdir.path()).unwrap();
        assert_eq!(extracted.len(), 1);
        let age = std::fs::read_to_string(workdir.path().join("AGE/AGE.csv")).unwrap();
        assert_eq!(age, "42\n");
    }

    #[test]
    fn duplicate_variable_column_is_rejected() {
        let workdir = TempDir::new().unwrap();
        let table = table(&["age", "AGE"], &[&["1", "2"]]);
        let err = extract_variables(&table, &spec(&[], 1), workdir.path()).unwrap_err();
        assert!(matches!(err, IngestError::DuplicateVariable { .. }));
    }

    #[test]
    fn plan_lists_variables_without_writing() {
        let table = table(
            &["sidkrg", "age", "sex"],
            &[&["p1", "42", "1"]],
        );
        let plan = variable_plan(&table, &["sidkrg".to_string()]).unwrap();
        let names: Vec<&str> = plan.iter().map(VariableId::as_str).collect();
        assert_eq!(names, ["age", "sex"]);
    }

    #[test]
    fn all_columns_excluded_is_an_error() {
        let workdir = TempDir::new().unwrap();
        let table = table(&["sidkrg"], &[&["p1"]]);
        let err = extract_variables(&table, &spec(&["sidkrg"], 1), workdir.path()).unwrap_err();
        assert!(matches!(err, IngestError::NoVariableColumns));
    }

    #[test]
    fn record_count_contract_is_enforced() {
        let workdir = TempDir::new().unwrap();
        let table = table(&["age"], &[&["1"], &["2"]]);
        let err = extract_variables(&table, &spec(&[], 5), workdir.path()).unwrap_err();
        match err {
            IngestError::RowCountMismatch {
                expected, found, ..
            } => {
                assert_eq!(expected, 5);
                assert_eq!(found, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn identical_inputs_write_identical_files() {
        let workdir = TempDir::new().unwrap();
        let table = table(&["sidkrg", "age"], &[&["p1", "42"], &["p2", "39"]]);
        let spec = spec(&["sidkrg"], 2);
        extract_variables(&table, &spec, workdir.path()).unwrap();
        let first = std::fs::read(workdir.path().join("AGE/AGE.csv")).unwrap();
        extract_variables(&table, &spec, workdir.path()).unwrap();
        let second = std::fs::read(workdir.path().join("AGE/AGE.csv")).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn rerun_overwrites_previous_files() {
        let workdir = TempDir::new().unwrap();
        let first = table(&["age"], &[&["1"], &["2"]]);
        extract_variables(&first, &spec(&[], 2), workdir.path()).unwrap();

        let second = table(&["age"], &[&["7"]]);
        extract_variables(&second, &spec(&[], 1), workdir.path()).unwrap();
        let age = std::fs::read_to_string(workdir.path().join("AGE/AGE.csv")).unwrap();
        assert_eq!(age, "7\n");
    }

    #[test]
    fn values_with_delimiter_are_quoted() {
        let workdir = TempDir::new().unwrap();
        let table = table(&["note"], &[&["a;b"]]);
        extract_variables(&table, &spec(&[], 1), workdir.path()).unwrap();
        let note = std::fs::read_to_string(workdir.path().join("NOTE/NOTE.csv")).unwrap();
        assert_eq!(note, "\"a;b\"\n");
    }

    #[test]
    fn zero_row_table_extracts_empty_files() {
        let workdir = TempDir::new().unwrap();
        let table = table(&["age"], &[]);
        let extracted = extract_variables(&table, &spec(&[], 0), workdir.path()).unwrap();
        assert_eq!(extracted[0].rows, 0);
        let age = std::fs::read_to_string(workdir.path().join("AGE/AGE.csv")).unwrap();
        assert_eq!(age, "");
    }
}
