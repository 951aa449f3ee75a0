//! Validation issue types.
//!
//! The Issue enum provides type-safe issue creation where each variant
//! carries only its needed data. Metadata-document and dataset checks
//! share the vocabulary so the console and the run report render both
//! the same way.

use serde::{Deserialize, Serialize};

use mdk_model::DataType;

/// Issue severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    /// A violation; invalidates the variable.
    Error,
    /// Advisory; never invalidates.
    Warning,
}

impl Severity {
    /// Parse severity from string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "error" => Some(Self::Error),
            "warning" => Some(Self::Warning),
            _ => None,
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Error => "Error",
            Self::Warning => "Warning",
        }
    }
}

/// Grouping used by the console report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Metadata document shape and required fields.
    Schema,
    /// Dataset structure (record counts).
    Structure,
    /// Value does not conform to the declared data type.
    Type,
    /// Value outside the declared value domain.
    Domain,
    /// Records-per-unit bounds.
    Cardinality,
    /// Mandatory values that are absent.
    Presence,
}

impl Category {
    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Schema => "Schema",
            Self::Structure => "Structure",
            Self::Type => "Type",
            Self::Domain => "Domain",
            Self::Cardinality => "Cardinality",
            Self::Presence => "Presence",
        }
    }
}

/// Validation issue - each variant carries only its needed data.
///
/// Dataset rows are 1-based data-row indices (the per-variable files
/// carry no header row).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Issue {
    // Metadata document checks
    /// Required field is absent from the document.
    MissingField { field: String },
    /// Field present but with the wrong JSON shape.
    MalformedField { field: String, expected: String },
    /// Document name does not match the variable being processed.
    NameMismatch { expected: String, found: String },
    /// Declared data type is not part of the contract.
    UnknownDataType { value: String },
    /// Value domain declared without categories or missing values.
    EmptyValueDomain,
    /// Cardinality bound below zero.
    NegativeCardinality { field: String, value: i64 },
    /// Cardinality minimum exceeds the maximum.
    CardinalityInverted { min: u64, max: u64 },
    /// Document carries no human-readable label.
    MissingLabel,

    // Dataset checks
    /// Dataset record count differs from the extraction contract.
    RowCountMismatch { expected: usize, found: usize },
    /// Value does not conform to the declared data type.
    TypeMismatch {
        row: usize,
        value: String,
        expected: DataType,
    },
    /// Value outside the declared category domain.
    OutOfDomain { row: usize, value: String },
    /// Mandatory variable with an empty value.
    EmptyMandatory { row: usize },
    /// Records per identifier unit outside the declared bounds.
    CardinalityViolation {
        unit: String,
        count: u64,
        min: u64,
        max: Option<u64>,
    },
}

impl Issue {
    /// Severity for this issue type.
    pub fn severity(&self) -> Severity {
        match self {
            Issue::MissingLabel => Severity::Warning,
            _ => Severity::Error,
        }
    }

    /// Category for this issue type.
    pub fn category(&self) -> Category {
        match self {
            Issue::MissingField { .. }
            | Issue::MalformedField { .. }
            | Issue::NameMismatch { .. }
            | Issue::UnknownDataType { .. }
            | Issue::EmptyValueDomain
            | Issue::MissingLabel => Category::Schema,
            Issue::NegativeCardinality { .. }
            | Issue::CardinalityInverted { .. }
            | Issue::CardinalityViolation { .. } => Category::Cardinality,
            Issue::RowCountMismatch { .. } => Category::Structure,
            Issue::TypeMismatch { .. } => Category::Type,
            Issue::OutOfDomain { .. } => Category::Domain,
            Issue::EmptyMandatory { .. } => Category::Presence,
        }
    }

    /// 1-based data row, for issues tied to one record.
    pub fn row(&self) -> Option<usize> {
        match self {
            Issue::TypeMismatch { row, .. }
            | Issue::OutOfDomain { row, .. }
            | Issue::EmptyMandatory { row } => Some(*row),
            _ => None,
        }
    }

    /// Format message with issue-specific data.
    pub fn message(&self) -> String {
        match self {
            Issue::MissingField { field } => {
                format!("Required field {field} is missing")
            }
            Issue::MalformedField { field, expected } => {
                format!("Field {field} is malformed, expected {expected}")
            }
            Issue::NameMismatch { expected, found } => {
                format!("Document name {found:?} does not match variable {expected:?}")
            }
            Issue::UnknownDataType { value } => {
                format!("Unknown data type {value:?}, expected one of numeric, categorical, date, text")
            }
            Issue::EmptyValueDomain => {
                "Declared value domain has neither categories nor missing values".to_string()
            }
            Issue::NegativeCardinality { field, value } => {
                format!("Cardinality bound {field} is negative ({value})")
            }
            Issue::CardinalityInverted { min, max } => {
                format!("Cardinality minimum {min} exceeds maximum {max}")
            }
            Issue::MissingLabel => "Variable has no label".to_string(),
            Issue::RowCountMismatch { expected, found } => {
                format!("Dataset has {found} records, expected {expected}")
            }
            Issue::TypeMismatch {
                row,
                value,
                expected,
            } => {
                format!("Row {row}: value {value:?} is not a valid {expected} value")
            }
            Issue::OutOfDomain { row, value } => {
                format!("Row {row}: value {value:?} is not in the declared value domain")
            }
            Issue::EmptyMandatory { row } => {
                format!("Row {row}: mandatory variable has an empty value")
            }
            Issue::CardinalityViolation {
                unit,
                count,
                min,
                max,
            } => match max {
                Some(max) => format!(
                    "Unit {unit:?} has {count} records, allowed between {min} and {max}"
                ),
                None => format!("Unit {unit:?} has {count} records, allowed at least {min}"),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_missing_label_is_a_warning() {
        assert_eq!(Issue::MissingLabel.severity(), Severity::Warning);
        assert_eq!(
            Issue::MissingField {
                field: "name".to_string()
            }
            .severity(),
            Severity::Error
        );
    }

    #[test]
    fn row_is_exposed_for_record_issues() {
        let issue = Issue::OutOfDomain {
            row: 12,
            value: "x".to_string(),
        };
        assert_eq!(issue.row(), Some(12));
        assert_eq!(Issue::EmptyValueDomain.row(), None);
    }

    #[test]
    fn messages_carry_the_data() {
        let issue = Issue::TypeMismatch {
            row: 3,
            value: "abc".to_string(),
            expected: DataType::Numeric,
        };
        assert_eq!(
            issue.message(),
            "Row 3: value \"abc\" is not a valid numeric value"
        );

        let issue = Issue::CardinalityViolation {
            unit: "p1".to_string(),
            count: 4,
            min: 0,
            max: Some(1),
        };
        assert_eq!(
            issue.message(),
            "Unit \"p1\" has 4 records, allowed between 0 and 1"
        );
    }

    #[test]
    fn severity_parses_case_insensitively() {
        assert_eq!(Severity::parse(" Warning "), Some(Severity::Warning));
        assert_eq!(Severity::parse("fatal"), None);
    }
}
