//! Metadata document validation.
//!
//! Checks the raw JSON document against the service contract rule by
//! rule, accumulating every violation. Content problems never become
//! errors here: malformed input yields a report, and a typed
//! [`MetadataDocument`] is produced only when the report carries no
//! errors.

use serde_json::{Map, Value};

use mdk_model::{Cardinality, Category, DataType, MetadataDocument, ValueDomain, VariableId};

use crate::issue::Issue;
use crate::report::ValidationReport;

/// Outcome of checking one metadata document.
#[derive(Debug, Clone)]
pub struct MetadataCheck {
    pub report: ValidationReport,
    /// Present iff the report has no errors.
    pub document: Option<MetadataDocument>,
}

/// Validates the raw metadata document for one variable.
pub fn validate_metadata(id: &VariableId, raw: &Value) -> MetadataCheck {
    let mut report = ValidationReport::new(id.as_str());

    let Some(object) = raw.as_object() else {
        report.push(Issue::MalformedField {
            field: "$".to_string(),
            expected: "object".to_string(),
        });
        return MetadataCheck {
            report,
            document: None,
        };
    };

    let name = check_name(id, object, &mut report);
    let data_type = check_data_type(object, &mut report);
    let label = optional_string(object, "label", &mut report);
    if object.get("label").is_none() || label.as_deref().is_some_and(str::is_empty) {
        report.push(Issue::MissingLabel);
    }
    let description = optional_string(object, "description", &mut report);
    let value_domain = check_value_domain(object, &mut report);
    let cardinality = check_cardinality(object, &mut report);
    let mandatory = check_mandatory(object, &mut report);

    let document = match (name, data_type) {
        (Some(name), Some(data_type)) if report.is_valid() => Some(MetadataDocument {
            name,
            label: label.filter(|l| !l.is_empty()),
            description,
            data_type,
            value_domain,
            cardinality,
            mandatory,
        }),
        _ => None,
    };

    tracing::debug!(
        variable = %id,
        errors = report.error_count(),
        warnings = report.warning_count(),
        "metadata validation complete"
    );
    MetadataCheck { report, document }
}

fn check_name(
    id: &VariableId,
    object: &Map<String, Value>,
    report: &mut ValidationReport,
) -> Option<String> {
    match object.get("name") {
        None => {
            report.push(Issue::MissingField {
                field: "name".to_string(),
            });
            None
        }
        Some(Value::String(name)) => {
            let trimmed = name.trim();
            if trimmed.to_lowercase() != id.as_str() {
                report.push(Issue::NameMismatch {
                    expected: id.to_string(),
                    found: trimmed.to_string(),
                });
            }
            Some(trimmed.to_string())
        }
        Some(_) => {
            report.push(Issue::MalformedField {
                field: "name".to_string(),
                expected: "string".to_string(),
            });
            None
        }
    }
}

fn check_data_type(object: &Map<String, Value>, report: &mut ValidationReport) -> Option<DataType> {
    match object.get("dataType") {
        None => {
            report.push(Issue::MissingField {
                field: "dataType".to_string(),
            });
            None
        }
        Some(Value::String(value)) => match DataType::parse(value) {
            Ok(data_type) => Some(data_type),
            Err(_) => {
                report.push(Issue::UnknownDataType {
                    value: value.clone(),
                });
                None
            }
        },
        Some(_) => {
            report.push(Issue::MalformedField {
                field: "dataType".to_string(),
                expected: "string".to_string(),
            });
            None
        }
    }
}

fn optional_string(
    object: &Map<String, Value>,
    field: &str,
    report: &mut ValidationReport,
) -> Option<String> {
    match object.get(field) {
        None => None,
        Some(Value::String(value)) => Some(value.trim().to_string()),
        Some(_) => {
            report.push(Issue::MalformedField {
                field: field.to_string(),
                expected: "string".to_string(),
            });
            None
        }
    }
}

fn check_value_domain(
    object: &Map<String, Value>,
    report: &mut ValidationReport,
) -> Option<ValueDomain> {
    let value = object.get("valueDomain")?;
    let Some(domain) = value.as_object() else {
        report.push(Issue::MalformedField {
            field: "valueDomain".to_string(),
            expected: "object".to_string(),
        });
        return None;
    };

    let mut categories = Vec::new();
    match domain.get("categories") {
        None => {}
        Some(Value::Array(items)) => {
            for (idx, item) in items.iter().enumerate() {
                match item.as_object() {
                    Some(category) => match category.get("code") {
                        Some(Value::String(code)) if !code.trim().is_empty() => {
                            let label = category
                                .get("label")
                                .and_then(Value::as_str)
                                .map(|l| l.trim().to_string());
                            categories.push(Category {
                                code: code.trim().to_string(),
                                label,
                            });
                        }
                        _ => report.push(Issue::MalformedField {
                            field: format!("valueDomain.categories[{idx}].code"),
                            expected: "non-empty string".to_string(),
                        }),
                    },
                    None => report.push(Issue::MalformedField {
                        field: format!("valueDomain.categories[{idx}]"),
                        expected: "object".to_string(),
                    }),
                }
            }
        }
        Some(_) => report.push(Issue::MalformedField {
            field: "valueDomain.categories".to_string(),
            expected: "array".to_string(),
        }),
    }

    let mut missing_values = Vec::new();
    match domain.get("missingValues") {
        None => {}
        Some(Value::Array(items)) => {
            for (idx, item) in items.iter().enumerate() {
                match item.as_str() {
                    Some(sentinel) => missing_values.push(sentinel.trim().to_string()),
                    None => report.push(Issue::MalformedField {
                        field: format!("valueDomain.missingValues[{idx}]"),
                        expected: "string".to_string(),
                    }),
                }
            }
        }
        Some(_) => report.push(Issue::MalformedField {
            field: "valueDomain.missingValues".to_string(),
            expected: "array".to_string(),
        }),
    }

    // A declared domain must declare something.
    let declared_empty = match domain.get("categories") {
        Some(Value::Array(items)) => items.is_empty(),
        None => !domain.contains_key("missingValues"),
        Some(_) => false,
    };
    if declared_empty {
        report.push(Issue::EmptyValueDomain);
    }

    Some(ValueDomain {
        categories,
        missing_values,
    })
}

fn check_cardinality(
    object: &Map<String, Value>,
    report: &mut ValidationReport,
) -> Option<Cardinality> {
    let value = object.get("cardinality")?;
    let Some(bounds) = value.as_object() else {
        report.push(Issue::MalformedField {
            field: "cardinality".to_string(),
            expected: "object".to_string(),
        });
        return None;
    };

    let min = match bounds.get("min") {
        None => {
            report.push(Issue::MissingField {
                field: "cardinality.min".to_string(),
            });
            None
        }
        Some(value) => integer_bound(value, "cardinality.min", report),
    };
    let max = bounds
        .get("max")
        .and_then(|value| integer_bound(value, "cardinality.max", report));

    if let (Some(min), Some(max)) = (min, max)
        && min > max
    {
        report.push(Issue::CardinalityInverted { min, max });
    }

    min.map(|min| Cardinality { min, max })
}

fn integer_bound(value: &Value, field: &str, report: &mut ValidationReport) -> Option<u64> {
    match value.as_i64() {
        Some(bound) if bound < 0 => {
            report.push(Issue::NegativeCardinality {
                field: field.to_string(),
                value: bound,
            });
            None
        }
        Some(bound) => Some(bound as u64),
        None => {
            report.push(Issue::MalformedField {
                field: field.to_string(),
                expected: "integer".to_string(),
            });
            None
        }
    }
}

fn check_mandatory(object: &Map<String, Value>, report: &mut ValidationReport) -> bool {
    match object.get("mandatory") {
        None => false,
        Some(Value::Bool(mandatory)) => *mandatory,
        Some(_) => {
            report.push(Issue::MalformedField {
                field: "mandatory".to_string(),
                expected: "boolean".to_string(),
            });
            false
        }
    }
}
