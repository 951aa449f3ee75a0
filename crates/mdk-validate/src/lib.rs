//! Validation for the microdata deposit pipeline.
//!
//! Two validators share one issue vocabulary: [`validate_metadata`]
//! checks the raw service document and produces a typed
//! [`mdk_model::MetadataDocument`] when clean, and [`validate_dataset`]
//! checks a per-variable data file against that document. Both
//! accumulate every violation before returning; neither throws for
//! content problems. File loading elsewhere fails fast; validation is
//! deliberately the accumulating side of that split.

pub mod dataset;
pub mod error;
pub mod issue;
pub mod metadata;
pub mod report;

pub use dataset::validate_dataset;
pub use error::{Result, ValidateError};
pub use issue::{Category, Issue, Severity};
pub use metadata::{MetadataCheck, validate_metadata};
pub use report::ValidationReport;
