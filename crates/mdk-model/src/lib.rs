//! Core vocabulary for the microdata deposit pipeline.
//!
//! Everything downstream speaks these types: validated [`VariableId`]s,
//! the symmetric [`RawTable`], declared [`DataType`]s with their
//! [`TypedValue`] resolution, and the typed [`MetadataDocument`] that
//! comes out of metadata validation.

pub mod error;
pub mod ids;
pub mod metadata;
pub mod table;
pub mod value;

pub use error::{ModelError, Result};
pub use ids::VariableId;
pub use metadata::{Cardinality, Category, MetadataDocument, ValueDomain};
pub use table::RawTable;
pub use value::{DataType, TypedValue};
