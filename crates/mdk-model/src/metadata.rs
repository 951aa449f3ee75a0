use crate::DataType;

/// Typed metadata for one variable.
///
/// Instances come out of metadata validation: a document that exists has
/// a known data type and, when a category domain is declared, a
/// non-empty category list. Field names mirror the service's camelCase
/// wire contract.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataDocument {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub data_type: DataType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_domain: Option<ValueDomain>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cardinality: Option<Cardinality>,
    #[serde(default)]
    pub mandatory: bool,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueDomain {
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub missing_values: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Category {
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// Bounds on records per identifier unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Cardinality {
    pub min: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<u64>,
}

impl MetadataDocument {
    /// Declared missing-value sentinels; empty when none are declared.
    pub fn missing_sentinels(&self) -> &[String] {
        self.value_domain
            .as_ref()
            .map_or(&[], |domain| domain.missing_values.as_slice())
    }

    /// Declared category codes, or `None` when no category domain is
    /// declared.
    pub fn category_codes(&self) -> Option<Vec<&str>> {
        let domain = self.value_domain.as_ref()?;
        if domain.categories.is_empty() {
            return None;
        }
        Some(
            domain
                .categories
                .iter()
                .map(|category| category.code.as_str())
                .collect(),
        )
    }
}
