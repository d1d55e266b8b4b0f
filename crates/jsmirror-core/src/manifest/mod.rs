//! Manifest loading, diffing, persistence and regeneration.

mod generator;
mod io;

use std::path::{Path, PathBuf};
use std::sync::Arc;

pub use generator::ManifestGenerator;
pub use io::{read_manifest, write_manifest};

use crate::domain::{Manifest, ManifestEntry, VersionSet};
use crate::ports::TransferPort;

/// File name of every manifest document.
pub const MANIFEST_FILE_NAME: &str = "manifest.json";

/// Where a previously written manifest comes from.
#[derive(Debug, Clone)]
pub enum ManifestSource {
    /// A local document, or a directory holding `manifest.json`.
    Path(PathBuf),
    /// A remote document fetched over HTTP(S).
    Url(String),
    /// An already parsed manifest.
    Loaded(Manifest),
}

impl ManifestSource {
    /// `http://` and `https://` strings are URLs; anything else is a path.
    pub fn parse(source: &str) -> Self {
        let source = source.trim();
        if source.starts_with("http://") || source.starts_with("https://") {
            Self::Url(source.to_string())
        } else {
            Self::Path(PathBuf::from(source))
        }
    }
}

impl From<Manifest> for ManifestSource {
    fn from(manifest: Manifest) -> Self {
        Self::Loaded(manifest)
    }
}

/// Loads manifests and compares them against requested versions.
#[derive(Clone)]
pub struct ManifestStore {
    transfer: Arc<dyn TransferPort>,
}

impl ManifestStore {
    pub fn new(transfer: Arc<dyn TransferPort>) -> Self {
        Self { transfer }
    }

    /// Load a manifest, degrading to an empty one on any failure.
    ///
    /// A missing or unreadable manifest just means nothing is known to be
    /// mirrored yet, so the failure is logged rather than returned.
    pub async fn load(&self, source: &ManifestSource) -> Manifest {
        let loaded = match source {
            ManifestSource::Loaded(manifest) => return manifest.clone(),
            ManifestSource::Url(url) => self.load_url(url).await,
            ManifestSource::Path(path) => Self::load_path(path).await,
        };

        match loaded {
            Ok(manifest) => {
                tracing::debug!(libraries = manifest.len(), "Loaded manifest");
                manifest
            }
            Err(reason) => {
                tracing::warn!(
                    source = ?source,
                    %reason,
                    "Manifest unavailable, treating as empty"
                );
                Manifest::default()
            }
        }
    }

    async fn load_url(&self, url: &str) -> Result<Manifest, String> {
        let bytes = self
            .transfer
            .fetch_bytes(url)
            .await
            .map_err(|e| e.to_string())?;
        Manifest::from_slice(&bytes).map_err(|e| e.to_string())
    }

    async fn load_path(path: &Path) -> Result<Manifest, String> {
        let is_dir = tokio::fs::metadata(path)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false);
        let file = if is_dir {
            path.join(MANIFEST_FILE_NAME)
        } else {
            path.to_path_buf()
        };
        read_manifest(&file).await.map_err(|e| e.to_string())
    }

    /// Versions in `requested` that `entry` does not already record.
    pub fn diff(requested: VersionSet, entry: Option<&ManifestEntry>) -> VersionSet {
        match entry {
            Some(entry) => requested.without(&entry.versions),
            None => requested,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DownloadError;
    use crate::testing::FakeTransfer;
    use tempfile::TempDir;

    fn store(transfer: FakeTransfer) -> ManifestStore {
        ManifestStore::new(Arc::new(transfer))
    }

    fn react_entry() -> ManifestEntry {
        let mut entry = ManifestEntry::new("react");
        entry.push_version("18.0.0", vec!["umd/react.production.min.js".to_string()]);
        entry
    }

    #[test]
    fn diff_subtracts_recorded_versions() {
        let requested = VersionSet::new(["18.0.0", "18.1.0"]);
        let entry = react_entry();

        let rest = ManifestStore::diff(requested.clone(), Some(&entry));
        assert_eq!(rest.as_slice(), ["18.1.0"]);
        assert_eq!(ManifestStore::diff(requested.clone(), None), requested);
    }

    #[test]
    fn parse_picks_url_or_path() {
        assert!(matches!(
            ManifestSource::parse("https://example.com/manifest.json"),
            ManifestSource::Url(_)
        ));
        assert!(matches!(
            ManifestSource::parse("./dist/manifest.json"),
            ManifestSource::Path(_)
        ));
    }

    #[tokio::test]
    async fn loaded_is_returned_unchanged() {
        let manifest = Manifest::new(vec![react_entry()]);
        let loaded = store(FakeTransfer::new())
            .load(&ManifestSource::Loaded(manifest.clone()))
            .await;
        assert_eq!(loaded, manifest);
    }

    #[tokio::test]
    async fn loads_from_url() {
        let manifest = Manifest::new(vec![react_entry()]);
        let url = "https://mirror.test/manifest.json";
        let transfer = FakeTransfer::new().with_body(url, manifest.to_document().unwrap());

        let loaded = store(transfer).load(&ManifestSource::parse(url)).await;
        assert_eq!(loaded, manifest);
    }

    #[tokio::test]
    async fn loads_from_directory_or_file() {
        let dir = TempDir::new().unwrap();
        let manifest = Manifest::new(vec![react_entry()]);
        write_manifest(dir.path(), &manifest).await.unwrap();
        let store = store(FakeTransfer::new());

        let from_dir = store.load(&ManifestSource::Path(dir.path().to_path_buf())).await;
        let from_file = store
            .load(&ManifestSource::Path(dir.path().join(MANIFEST_FILE_NAME)))
            .await;
        assert_eq!(from_dir, manifest);
        assert_eq!(from_file, manifest);
    }

    #[tokio::test]
    async fn failures_degrade_to_empty() {
        let url = "https://mirror.test/manifest.json";
        let transfer = FakeTransfer::new()
            .with_failure(
                url,
                DownloadError::Network {
                    url: url.to_string(),
                    message: "connection refused".to_string(),
                },
            )
            .with_body("https://mirror.test/bad.json", "<html>");
        let store = store(transfer);

        assert!(store.load(&ManifestSource::parse(url)).await.is_empty());
        assert!(
            store
                .load(&ManifestSource::parse("https://mirror.test/bad.json"))
                .await
                .is_empty()
        );
        assert!(
            store
                .load(&ManifestSource::parse("/definitely/not/here.json"))
                .await
                .is_empty()
        );
    }
}
