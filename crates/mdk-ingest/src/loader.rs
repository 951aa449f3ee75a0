//! Source table loading: decode, strip the BOM, enforce row symmetry.

use std::path::Path;

use encoding_rs::Encoding;
use mdk_model::{ModelError, RawTable};

use crate::error::{IngestError, Result};

/// Parsing options for the source table.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    pub delimiter: u8,
    /// Encoding label understood by the WHATWG encoding machinery
    /// ("utf-8", "windows-1252", ...). A leading BOM always wins.
    pub encoding: String,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            delimiter: b';',
            encoding: "utf-8".to_string(),
        }
    }
}

/// Loads the source table, failing fast on the first structural defect.
///
/// The first data row whose width differs from the header aborts the
/// load with [`IngestError::MalformedTable`]. Validators downstream are
/// the accumulating side; the loader is deliberately strict.
pub fn load_table(path: &Path, options: &LoadOptions) -> Result<RawTable> {
    let bytes = std::fs::read(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            IngestError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            IngestError::FileRead {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })?;

    let encoding = Encoding::for_label(options.encoding.as_bytes()).ok_or_else(|| {
        IngestError::UnknownEncoding {
            label: options.encoding.clone(),
        }
    })?;
    let (text, actual, had_errors) = encoding.decode(&bytes);
    if had_errors {
        tracing::warn!(
            path = %path.display(),
            encoding = actual.name(),
            "undecodable byte sequences replaced while reading source table"
        );
    }

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(options.delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut records = reader.records();
    let headers: Vec<String> = match records.next() {
        Some(record) => record
            .map_err(|e| IngestError::CsvParse {
                path: path.to_path_buf(),
                source: e,
            })?
            .iter()
            .map(|cell| cell.trim_matches('\u{feff}').trim().to_string())
            .collect(),
        None => {
            return Err(IngestError::EmptyTable {
                path: path.to_path_buf(),
            });
        }
    };
    if headers.is_empty() || headers.iter().all(String::is_empty) {
        return Err(IngestError::EmptyTable {
            path: path.to_path_buf(),
        });
    }

    let mut rows: Vec<Vec<String>> = Vec::new();
    for record in records {
        let record = record.map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            source: e,
        })?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    tracing::debug!(
        path = %path.display(),
        rows = rows.len(),
        columns = headers.len(),
        "loaded source table"
    );

    RawTable::new(headers, rows).map_err(|err| match err {
        ModelError::AsymmetricRow {
            row,
            expected,
            found,
        } => IngestError::MalformedTable {
            path: path.to_path_buf(),
            row,
            expected,
            found,
        },
        other => IngestError::Model(other),
    })
}
