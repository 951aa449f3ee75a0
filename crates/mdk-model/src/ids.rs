#![deny(unsafe_code)]

use std::fmt;

use crate::ModelError;

/// Canonical identifier for one submission variable (one source column).
///
/// Stored lowercase. The uppercase form names on-disk artifacts
/// (`AGE/AGE.csv`), the lowercase form is the metadata service URL
/// segment.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct VariableId(String);

impl VariableId {
    pub fn new(value: impl Into<String>) -> Result<Self, ModelError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty()
            || trimmed.contains(['/', '\\'])
            || trimmed.contains("..")
            || trimmed.chars().any(char::is_control)
        {
            return Err(ModelError::InvalidVariableName(value));
        }
        Ok(Self(trimmed.to_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Uppercase stem naming the variable's working files and archives.
    pub fn file_stem(&self) -> String {
        self.0.to_uppercase()
    }

    /// Path segment appended to the metadata service base URL.
    pub fn url_segment(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VariableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
