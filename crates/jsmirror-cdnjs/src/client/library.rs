//! Library version and file listings.

use crate::error::CdnjsResult;
use crate::http::HttpBackend;
use crate::models::{FilesResponse, VersionsResponse};
use crate::url::{build_file_url, build_files_url, build_versions_url};

use super::CdnjsClient;

impl<B: HttpBackend> CdnjsClient<B> {
    /// Every published version of `name`, in catalog order.
    pub(crate) async fn fetch_versions(&self, name: &str) -> CdnjsResult<Vec<String>> {
        let url = build_versions_url(&self.settings, name)?;
        let response: VersionsResponse = self.backend.get_json(&url).await?;
        tracing::debug!(library = %name, versions = response.versions.len(), "Fetched versions");
        Ok(response.versions)
    }

    /// Relative paths of every file published for `name@version`.
    pub(crate) async fn fetch_files(&self, name: &str, version: &str) -> CdnjsResult<Vec<String>> {
        let url = build_files_url(&self.settings, name, version)?;
        let response: FilesResponse = self.backend.get_json(&url).await?;
        tracing::debug!(
            library = %name,
            version = %version,
            reported_name = ?response.name,
            reported_version = ?response.version,
            files = response.files.len(),
            "Fetched file list"
        );
        Ok(response.files)
    }

    pub(crate) fn cdn_file_url(&self, name: &str, version: &str, path: &str) -> String {
        build_file_url(&self.settings, name, version, path)
    }
}
