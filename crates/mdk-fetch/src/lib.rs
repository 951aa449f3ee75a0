//! Metadata retrieval for the microdata deposit pipeline.
//!
//! [`MetadataClient`] fetches one JSON document per variable from the
//! metadata service with a bounded timeout and persists the raw body
//! into the variable's working directory.

pub mod client;
pub mod error;

pub use client::{DEFAULT_TIMEOUT, FetchedDocument, MetadataClient};
pub use error::{FetchError, Result};
