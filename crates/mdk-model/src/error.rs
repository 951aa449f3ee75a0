use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("invalid variable name {0:?}: must be non-empty without path separators or control characters")]
    InvalidVariableName(String),
    #[error("row {row} has {found} cells, expected {expected}")]
    AsymmetricRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("unknown data type {0:?}, expected one of numeric, categorical, date, text")]
    UnknownDataType(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
