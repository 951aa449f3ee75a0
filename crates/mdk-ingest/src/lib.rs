//! Source table ingestion for the microdata deposit pipeline.
//!
//! Two operations: [`load_table`] reads and decodes the wide source CSV
//! with fail-fast symmetry checking, and [`extract_variables`] carves it
//! into one file per variable under the working directory.

pub mod error;
pub mod extract;
pub mod loader;

pub use error::{IngestError, Result};
pub use extract::{
    ExtractSpec, ExtractedVariable, VARIABLE_FILE_DELIMITER, extract_variables, variable_plan,
};
pub use loader::{LoadOptions, load_table};
