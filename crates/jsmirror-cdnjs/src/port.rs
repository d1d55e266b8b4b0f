//! `CatalogPort` implementation for `CdnjsClient`.
//!
//! Converts cdnjs errors into the core `CatalogError` taxonomy.

use async_trait::async_trait;
use jsmirror_core::ports::{CatalogError, CatalogPort, CatalogResult, RemoteFile};

use crate::client::CdnjsClient;
use crate::error::CdnjsError;
use crate::http::HttpBackend;

// ============================================================================
// Error Mapping
// ============================================================================

/// Convert a cdnjs error for `library` into a core `CatalogError`.
///
/// cdnjs answers unknown libraries with an `{"error": true}` body, so error
/// bodies are treated as not-found unless they report rate limiting.
fn map_error(err: CdnjsError, library: &str) -> CatalogError {
    match err {
        CdnjsError::ApiRequestFailed { status: 429, .. }
        | CdnjsError::ApiError {
            status: Some(429), ..
        } => CatalogError::RateLimited,
        CdnjsError::ApiRequestFailed { status: 404, .. } | CdnjsError::ApiError { .. } => {
            CatalogError::LibraryNotFound {
                name: library.to_string(),
            }
        }
        CdnjsError::ApiRequestFailed { status, url } => CatalogError::Unavailable {
            message: format!("API request failed with status {status}: {url}"),
        },
        CdnjsError::Network(e) => CatalogError::Unavailable {
            message: e.to_string(),
        },
        CdnjsError::InvalidUrl(e) => CatalogError::Unavailable {
            message: e.to_string(),
        },
        CdnjsError::UnsupportedUrl(url) => CatalogError::Unavailable {
            message: format!("unsupported API base {url}"),
        },
        CdnjsError::JsonParse(e) => CatalogError::Malformed {
            message: e.to_string(),
        },
    }
}

// ============================================================================
// Port Implementation
// ============================================================================

#[async_trait]
impl<B: HttpBackend + Send + Sync> CatalogPort for CdnjsClient<B> {
    async fn list_versions(&self, name: &str) -> CatalogResult<Vec<String>> {
        self.fetch_versions(name)
            .await
            .map_err(|e| map_error(e, name))
    }

    async fn list_files(&self, name: &str, version: &str) -> CatalogResult<Vec<RemoteFile>> {
        let files = self
            .fetch_files(name, version)
            .await
            .map_err(|e| map_error(e, name))?;
        Ok(files.into_iter().map(RemoteFile::new).collect())
    }

    fn file_url(&self, name: &str, version: &str, path: &str) -> String {
        self.cdn_file_url(name, version, path)
    }
}
