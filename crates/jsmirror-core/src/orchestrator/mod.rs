//! Download orchestration.
//!
//! Fetches per-version file lists and then every file of a version through
//! the task pool, placing each file under
//! `<root>/<library>/<version>/<subdirectory>/<file>`.

mod paths;

use std::num::NonZeroUsize;
use std::path::Path;
use std::sync::Arc;

pub use paths::{FileNamer, FilePlacement};

use crate::domain::{DownloadedFile, FileFailure, VersionSet};
use crate::error::DownloadError;
use crate::pool::TaskPool;
use crate::ports::{CatalogPort, CatalogResult, RemoteFile, TransferPort};

/// Outcome of mirroring every file of one version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionDownload {
    pub library: String,
    pub version: String,
    pub downloaded: Vec<DownloadedFile>,
    pub failures: Vec<FileFailure>,
}

impl VersionDownload {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// All downloaded files, or `Incomplete` carrying every failure.
    pub fn into_result(self) -> Result<Vec<DownloadedFile>, DownloadError> {
        if self.failures.is_empty() {
            return Ok(self.downloaded);
        }
        Err(DownloadError::Incomplete {
            library: self.library,
            version: self.version,
            failures: self.failures,
            downloaded: self.downloaded,
        })
    }
}

/// Drives listings and transfers for resolved library versions.
pub struct DownloadOrchestrator {
    catalog: Arc<dyn CatalogPort>,
    transfer: Arc<dyn TransferPort>,
    pool: TaskPool,
    file_namer: Option<FileNamer>,
}

impl DownloadOrchestrator {
    pub fn new(
        catalog: Arc<dyn CatalogPort>,
        transfer: Arc<dyn TransferPort>,
        concurrency: NonZeroUsize,
    ) -> Self {
        Self {
            catalog,
            transfer,
            pool: TaskPool::new(concurrency),
            file_namer: None,
        }
    }

    #[must_use]
    pub fn with_file_namer(mut self, namer: Option<FileNamer>) -> Self {
        self.file_namer = namer;
        self
    }

    /// The pool shared by listings and transfers, for inspecting its counters.
    pub const fn pool(&self) -> &TaskPool {
        &self.pool
    }

    /// Fetch the file list of every version, at most `concurrency` at a time.
    ///
    /// Results are paired with their version, in `versions` order.
    pub async fn fetch_file_lists(
        &self,
        library: &str,
        versions: &VersionSet,
    ) -> Vec<(String, CatalogResult<Vec<RemoteFile>>)> {
        let listings = self
            .pool
            .run(versions.iter(), |version| async move {
                let files = self.catalog.list_files(library, version).await;
                Ok::<_, std::convert::Infallible>((version.clone(), files))
            })
            .await;

        listings.into_iter().filter_map(Result::ok).collect()
    }

    /// Download every file of a version and report what happened to each.
    ///
    /// Every file is attempted; a failure never stops its siblings.
    pub async fn download_version(
        &self,
        library: &str,
        version: &str,
        files: &[RemoteFile],
        root: &Path,
    ) -> VersionDownload {
        tracing::debug!(
            library = %library,
            version = %version,
            files = files.len(),
            "Downloading version"
        );

        let results = self
            .pool
            .run(files, |file| async move {
                let url = self.catalog.file_url(library, version, &file.path);
                let result = self.download_file(&url, library, version, root).await;
                result.map_err(|error| FileFailure { url, error })
            })
            .await;

        let mut report = VersionDownload {
            library: library.to_string(),
            version: version.to_string(),
            downloaded: Vec::new(),
            failures: Vec::new(),
        };
        for result in results {
            match result {
                Ok(file) => report.downloaded.push(file),
                Err(failure) => {
                    tracing::warn!(
                        url = %failure.url,
                        error = %failure.error,
                        "File download failed"
                    );
                    report.failures.push(failure);
                }
            }
        }

        tracing::info!(
            library = %library,
            version = %version,
            downloaded = report.downloaded.len(),
            failed = report.failures.len(),
            "Version mirrored"
        );
        report
    }

    /// Download every file of a version, failing with
    /// [`DownloadError::Incomplete`] if any file could not be fetched.
    pub async fn download_library_version(
        &self,
        library: &str,
        version: &str,
        files: &[RemoteFile],
        root: &Path,
    ) -> Result<Vec<DownloadedFile>, DownloadError> {
        self.download_version(library, version, files, root)
            .await
            .into_result()
    }

    async fn download_file(
        &self,
        url: &str,
        library: &str,
        version: &str,
        root: &Path,
    ) -> Result<DownloadedFile, DownloadError> {
        let placement =
            FilePlacement::plan(url, library, version, root, self.file_namer.as_ref())?;
        placement.ensure_dir().await?;

        let bytes = self.transfer.download(url, &placement.path).await?;
        tracing::debug!(url = %url, path = %placement.path.display(), bytes, "Downloaded file");

        Ok(DownloadedFile {
            url: placement.url,
            path: placement.path,
        })
    }
}
