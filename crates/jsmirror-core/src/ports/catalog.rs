//! Library catalog port.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A file reported by the catalog for one library version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RemoteFile {
    /// Path relative to the version root, e.g. `dist/foo.min.js`.
    pub path: String,
}

impl RemoteFile {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

/// Errors from catalog lookups.
///
/// Adapter-specific failures (HTTP, JSON) are mapped to these.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// The catalog does not know this library.
    #[error("Library not found: {name}")]
    LibraryNotFound {
        /// The library that was looked up
        name: String,
    },

    /// The catalog is throttling requests.
    #[error("Rate limit exceeded, try again later")]
    RateLimited,

    /// The catalog could not be reached or answered with an error.
    #[error("Catalog unavailable: {message}")]
    Unavailable {
        /// Description of the failure
        message: String,
    },

    /// The catalog answered with something we could not parse.
    #[error("Malformed catalog response: {message}")]
    Malformed {
        /// What was wrong
        message: String,
    },
}

/// Result type alias for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Port for querying a remote library catalog.
///
/// The implementation for cdnjs lives in `jsmirror-cdnjs`.
#[async_trait]
pub trait CatalogPort: Send + Sync {
    /// List every version the catalog reports for a library, in catalog order.
    async fn list_versions(&self, name: &str) -> CatalogResult<Vec<String>>;

    /// List the files of one library version.
    async fn list_files(&self, name: &str, version: &str) -> CatalogResult<Vec<RemoteFile>>;

    /// Absolute download URL for a file of a library version.
    fn file_url(&self, name: &str, version: &str, path: &str) -> String;
}
