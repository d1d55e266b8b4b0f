//! In-memory fakes for the catalog and transfer ports.
//!
//! Enabled for unit tests and, through the `test-utils` feature, for
//! downstream crates that want to drive the pipeline without a network.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::error::DownloadError;
use crate::ports::{CatalogError, CatalogPort, CatalogResult, RemoteFile, TransferPort};

/// CDN base used by [`FakeCatalog::file_url`].
pub const FAKE_CDN: &str = "https://cdn.test/libs";

/// A catalog that answers from canned version and file lists.
#[derive(Default)]
pub struct FakeCatalog {
    versions: HashMap<String, CatalogResult<Vec<String>>>,
    files: HashMap<(String, String), CatalogResult<Vec<RemoteFile>>>,
    version_calls: Arc<Mutex<Vec<String>>>,
    file_calls: Arc<Mutex<Vec<(String, String)>>>,
}

impl FakeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the version list for a library.
    #[must_use]
    pub fn with_versions(mut self, name: &str, versions: &[&str]) -> Self {
        self.versions.insert(
            name.to_string(),
            Ok(versions.iter().map(ToString::to_string).collect()),
        );
        self
    }

    /// Make `list_versions` fail for a library.
    #[must_use]
    pub fn with_versions_error(mut self, name: &str, error: CatalogError) -> Self {
        self.versions.insert(name.to_string(), Err(error));
        self
    }

    /// Register the file list for one library version.
    #[must_use]
    pub fn with_files(mut self, name: &str, version: &str, files: &[&str]) -> Self {
        self.files.insert(
            (name.to_string(), version.to_string()),
            Ok(files.iter().map(|f| RemoteFile::new(*f)).collect()),
        );
        self
    }

    /// Make `list_files` fail for one library version.
    #[must_use]
    pub fn with_files_error(mut self, name: &str, version: &str, error: CatalogError) -> Self {
        self.files
            .insert((name.to_string(), version.to_string()), Err(error));
        self
    }

    /// Libraries whose version list was requested, in call order.
    pub fn version_calls(&self) -> Vec<String> {
        self.version_calls.lock().unwrap().clone()
    }

    /// (library, version) pairs whose file list was requested.
    pub fn file_calls(&self) -> Vec<(String, String)> {
        self.file_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CatalogPort for FakeCatalog {
    async fn list_versions(&self, name: &str) -> CatalogResult<Vec<String>> {
        self.version_calls.lock().unwrap().push(name.to_string());
        self.versions
            .get(name)
            .cloned()
            .unwrap_or_else(|| {
                Err(CatalogError::LibraryNotFound {
                    name: name.to_string(),
                })
            })
    }

    async fn list_files(&self, name: &str, version: &str) -> CatalogResult<Vec<RemoteFile>> {
        let key = (name.to_string(), version.to_string());
        self.file_calls.lock().unwrap().push(key.clone());
        self.files.get(&key).cloned().unwrap_or_else(|| Ok(Vec::new()))
    }

    fn file_url(&self, name: &str, version: &str, path: &str) -> String {
        format!("{FAKE_CDN}/{name}/{version}/{path}")
    }
}

/// A transfer port serving canned bodies.
///
/// Unknown URLs answer with HTTP 404 unless a default body is set.
#[derive(Default)]
pub struct FakeTransfer {
    bodies: HashMap<String, Vec<u8>>,
    failures: HashMap<String, DownloadError>,
    default_body: Option<Vec<u8>>,
    requests: Arc<Mutex<Vec<String>>>,
}

impl FakeTransfer {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_body(mut self, url: &str, body: impl Into<Vec<u8>>) -> Self {
        self.bodies.insert(url.to_string(), body.into());
        self
    }

    #[must_use]
    pub fn with_failure(mut self, url: &str, error: DownloadError) -> Self {
        self.failures.insert(url.to_string(), error);
        self
    }

    /// Serve this body for every URL without a canned answer.
    #[must_use]
    pub fn with_default_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.default_body = Some(body.into());
        self
    }

    /// Every URL requested so far, in call order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    fn respond(&self, url: &str) -> Result<Vec<u8>, DownloadError> {
        self.requests.lock().unwrap().push(url.to_string());
        if let Some(error) = self.failures.get(url) {
            return Err(error.clone());
        }
        self.bodies
            .get(url)
            .or(self.default_body.as_ref())
            .cloned()
            .ok_or_else(|| DownloadError::Http {
                url: url.to_string(),
                status: 404,
            })
    }
}

#[async_trait]
impl TransferPort for FakeTransfer {
    async fn download(&self, url: &str, dest: &Path) -> Result<u64, DownloadError> {
        let body = self.respond(url)?;
        tokio::fs::write(dest, &body)
            .await
            .map_err(|e| DownloadError::io(dest, &e))?;
        Ok(body.len() as u64)
    }

    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, DownloadError> {
        self.respond(url)
    }
}
