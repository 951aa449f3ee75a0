//! Blocking client for the variable metadata service.
//!
//! One GET per variable: the service serves the metadata document for a
//! variable at `<base-url>/<lowercase-name>`. The raw body is persisted
//! next to the variable's data file before parsing, so an unparseable
//! response is still on disk for inspection.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use mdk_model::VariableId;
use reqwest::blocking::Client;
use reqwest::header::USER_AGENT;
use serde_json::Value;
use tracing::debug;

use crate::error::{FetchError, Result};

/// Default request timeout for metadata lookups.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// One fetched metadata document: where the raw body landed on disk and
/// its parsed JSON form.
#[derive(Debug, Clone)]
pub struct FetchedDocument {
    pub variable: VariableId,
    pub path: PathBuf,
    pub raw: Value,
}

/// Blocking client for the metadata service.
pub struct MetadataClient {
    client: Client,
    base_url: String,
}

impl MetadataClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let base_url = base_url.into();
        let trimmed = base_url.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            return Err(FetchError::InvalidBaseUrl { url: base_url });
        }
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(FetchError::ClientBuild)?;
        Ok(Self {
            client,
            base_url: trimmed.to_string(),
        })
    }

    /// URL serving the variable's metadata document.
    pub fn document_url(&self, id: &VariableId) -> String {
        format!("{}/{}", self.base_url, id.url_segment())
    }

    /// Fetches the metadata document for one variable and persists the
    /// raw body to `workdir/<STEM>/<STEM>.json`.
    pub fn fetch(&self, id: &VariableId, workdir: &Path) -> Result<FetchedDocument> {
        let url = self.document_url(id);
        debug!(variable = %id, %url, "fetching metadata document");

        let response = self
            .client
            .get(&url)
            .header(
                USER_AGENT,
                format!("mdk/{}", env!("CARGO_PKG_VERSION")),
            )
            .send()
            .map_err(|e| FetchError::Network {
                variable: id.to_string(),
                source: e,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                variable: id.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().map_err(|e| FetchError::Network {
            variable: id.to_string(),
            source: e,
        })?;

        let stem = id.file_stem();
        let dir = workdir.join(&stem);
        fs::create_dir_all(&dir).map_err(|e| FetchError::Persist {
            path: dir.clone(),
            source: e,
        })?;
        let path = dir.join(format!("{stem}.json"));
        fs::write(&path, &body).map_err(|e| FetchError::Persist {
            path: path.clone(),
            source: e,
        })?;

        let raw: Value = serde_json::from_slice(&body).map_err(|e| FetchError::Parse {
            variable: id.to_string(),
            source: e,
        })?;

        debug!(
            variable = %id,
            path = %path.display(),
            bytes = body.len(),
            "metadata document persisted"
        );
        Ok(FetchedDocument {
            variable: id.clone(),
            path,
            raw,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(name: &str) -> VariableId {
        VariableId::new(name).unwrap()
    }

    #[test]
    fn document_url_appends_lowercase_segment() {
        let client = MetadataClient::new("http://meta.example/vars", DEFAULT_TIMEOUT).unwrap();
        assert_eq!(
            client.document_url(&id("AGE")),
            "http://meta.example/vars/age"
        );
    }

    #[test]
    fn trailing_slashes_are_trimmed() {
        let client = MetadataClient::new("http://meta.example/vars///", DEFAULT_TIMEOUT).unwrap();
        assert_eq!(
            client.document_url(&id("sex")),
            "http://meta.example/vars/sex"
        );
    }

    #[test]
    fn empty_base_url_is_rejected() {
        assert!(matches!(
            MetadataClient::new("   ", DEFAULT_TIMEOUT),
            Err(FetchError::InvalidBaseUrl { .. })
        ));
    }
}
