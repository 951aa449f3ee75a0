use std::fmt;

use chrono::NaiveDate;

use crate::ModelError;

/// Declared variable type from the metadata contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    Numeric,
    Categorical,
    Date,
    Text,
}

impl DataType {
    /// Parses the contract's lowercase spelling. Unknown spellings are a
    /// metadata violation, never a panic.
    pub fn parse(value: &str) -> Result<Self, ModelError> {
        match value.trim().to_lowercase().as_str() {
            "numeric" => Ok(Self::Numeric),
            "categorical" => Ok(Self::Categorical),
            "date" => Ok(Self::Date),
            "text" => Ok(Self::Text),
            _ => Err(ModelError::UnknownDataType(value.to_string())),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Numeric => "numeric",
            Self::Categorical => "categorical",
            Self::Date => "date",
            Self::Text => "text",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A raw cell resolved against declared metadata.
///
/// Consumers never interpret raw strings directly; every cell goes
/// through [`TypedValue::resolve`] first.
#[derive(Debug, Clone, PartialEq)]
pub enum TypedValue {
    Numeric(f64),
    Categorical(String),
    Date(NaiveDate),
    Text(String),
    Missing,
}

impl TypedValue {
    /// Resolves one raw cell against the declared type and the declared
    /// missing-value sentinels.
    ///
    /// Empty input and sentinels resolve to `Missing`. `None` means the
    /// cell does not conform to the declared type.
    pub fn resolve(raw: &str, data_type: DataType, sentinels: &[String]) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || sentinels.iter().any(|s| s == trimmed) {
            return Some(Self::Missing);
        }
        match data_type {
            DataType::Numeric => trimmed
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .map(Self::Numeric),
            DataType::Date => NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
                .ok()
                .map(Self::Date),
            DataType::Categorical => Some(Self::Categorical(trimmed.to_string())),
            DataType::Text => Some(Self::Text(raw.to_string())),
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }

    /// The code carried by a categorical value.
    pub fn category_code(&self) -> Option<&str> {
        match self {
            Self::Categorical(code) => Some(code),
            _ => None,
        }
    }
}
