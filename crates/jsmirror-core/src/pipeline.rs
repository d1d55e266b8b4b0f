//! The fetch-and-reconcile pipeline.
//!
//! One run: load the manifest (incremental mode), resolve and download each
//! library in turn, regenerate the manifest from disk, then optionally push
//! the mirror to object storage.

use std::path::Path;
use std::sync::Arc;

use crate::config::MirrorConfig;
use crate::domain::{DownloadedFile, FileFailure, LibraryRequest, Manifest};
use crate::error::{ConfigError, FilesystemError, MirrorError};
use crate::manifest::{ManifestGenerator, ManifestStore};
use crate::orchestrator::DownloadOrchestrator;
use crate::ports::{
    CatalogError, CatalogPort, CatalogResult, RemoteFile, StorageSyncPort, TransferPort,
    UploadTarget,
};
use crate::resolver::VersionResolver;

/// Adapters the pipeline runs against.
#[derive(Clone)]
pub struct MirrorDeps {
    pub catalog: Arc<dyn CatalogPort>,
    pub transfer: Arc<dyn TransferPort>,
    /// Required only when an upload is configured.
    pub storage: Option<Arc<dyn StorageSyncPort>>,
}

/// What happened to one version of a library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionOutcome {
    /// Every file landed.
    Complete {
        version: String,
        downloaded: Vec<DownloadedFile>,
    },
    /// Some files failed; the rest landed.
    Incomplete {
        version: String,
        downloaded: Vec<DownloadedFile>,
        failures: Vec<FileFailure>,
    },
    /// The file list could not be fetched, so nothing was attempted.
    ListingFailed { version: String, error: CatalogError },
}

impl VersionOutcome {
    pub fn version(&self) -> &str {
        match self {
            Self::Complete { version, .. }
            | Self::Incomplete { version, .. }
            | Self::ListingFailed { version, .. } => version,
        }
    }

    pub fn downloaded(&self) -> &[DownloadedFile] {
        match self {
            Self::Complete { downloaded, .. } | Self::Incomplete { downloaded, .. } => downloaded,
            Self::ListingFailed { .. } => &[],
        }
    }

    pub const fn is_complete(&self) -> bool {
        matches!(self, Self::Complete { .. })
    }
}

/// What happened to one library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LibraryStatus {
    /// Versions could not be resolved.
    Skipped { reason: String },
    /// Nothing new to fetch.
    UpToDate,
    /// At least one version was attempted.
    Synced { versions: Vec<VersionOutcome> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryOutcome {
    pub library: String,
    pub status: LibraryStatus,
}

/// Result of a pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    pub libraries: Vec<LibraryOutcome>,
    /// Manifest regenerated from disk at the end of the run.
    pub manifest: Manifest,
}

impl SyncReport {
    fn versions(&self) -> impl Iterator<Item = &VersionOutcome> {
        self.libraries.iter().flat_map(|l| match &l.status {
            LibraryStatus::Synced { versions } => versions.as_slice(),
            LibraryStatus::Skipped { .. } | LibraryStatus::UpToDate => [].as_slice(),
        })
    }

    /// Versions attempted in this run.
    pub fn versions_fetched(&self) -> usize {
        self.versions().count()
    }

    /// Files written in this run.
    pub fn files_downloaded(&self) -> usize {
        self.versions().map(|v| v.downloaded().len()).sum()
    }

    /// Failed files plus failed listings plus skipped libraries.
    pub fn failure_count(&self) -> usize {
        let skipped = self
            .libraries
            .iter()
            .filter(|l| matches!(l.status, LibraryStatus::Skipped { .. }))
            .count();
        let version_failures: usize = self
            .versions()
            .map(|v| match v {
                VersionOutcome::Complete { .. } => 0,
                VersionOutcome::Incomplete { failures, .. } => failures.len(),
                VersionOutcome::ListingFailed { .. } => 1,
            })
            .sum();
        skipped + version_failures
    }

    pub fn is_clean(&self) -> bool {
        self.failure_count() == 0
    }
}

/// Resolved versions and their file lists, without downloading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryListing {
    pub library: String,
    pub versions: Vec<VersionListing>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionListing {
    pub version: String,
    pub files: CatalogResult<Vec<RemoteFile>>,
}

/// Entry point tying resolver, store, orchestrator and generator together.
pub struct MirrorPipeline {
    config: MirrorConfig,
    storage: Option<Arc<dyn StorageSyncPort>>,
    resolver: VersionResolver,
    store: ManifestStore,
    orchestrator: DownloadOrchestrator,
}

impl MirrorPipeline {
    pub fn new(config: MirrorConfig, deps: MirrorDeps) -> Self {
        let orchestrator = DownloadOrchestrator::new(
            Arc::clone(&deps.catalog),
            Arc::clone(&deps.transfer),
            config.concurrency,
        )
        .with_file_namer(config.file_namer.clone());

        Self {
            resolver: VersionResolver::new(deps.catalog),
            store: ManifestStore::new(deps.transfer),
            storage: deps.storage,
            orchestrator,
            config,
        }
    }

    pub const fn config(&self) -> &MirrorConfig {
        &self.config
    }

    /// Mirror every requested library, regenerate the manifest and upload.
    ///
    /// Per-library and per-file problems are recorded in the report. Only a
    /// bad destination, a failed manifest write or a failed upload is fatal.
    pub async fn run(&self, requests: &[LibraryRequest]) -> Result<SyncReport, MirrorError> {
        let root = self.prepare_destination().await?;
        let manifest = self.load_manifest().await;

        let mut libraries = Vec::with_capacity(requests.len());
        for request in requests {
            libraries.push(self.sync_library(request, manifest.as_ref(), root).await);
        }

        let manifest = ManifestGenerator::generate(root).await?;
        let report = SyncReport {
            libraries,
            manifest,
        };
        tracing::info!(
            libraries = report.libraries.len(),
            versions = report.versions_fetched(),
            files = report.files_downloaded(),
            failures = report.failure_count(),
            "Sync finished"
        );

        if let Some(target) = &self.config.upload {
            self.upload(target).await?;
        }
        Ok(report)
    }

    /// Resolve a request and list its files without downloading anything.
    pub async fn query(&self, request: &LibraryRequest) -> Result<LibraryListing, MirrorError> {
        let manifest = self.load_manifest().await;
        let versions = self.resolver.resolve(request, manifest.as_ref()).await?;
        let lists = self
            .orchestrator
            .fetch_file_lists(request.name(), &versions)
            .await;

        Ok(LibraryListing {
            library: request.name().to_string(),
            versions: lists
                .into_iter()
                .map(|(version, files)| VersionListing { version, files })
                .collect(),
        })
    }

    /// Rewrite the manifest documents from the destination tree.
    pub async fn regenerate_manifest(&self) -> Result<Manifest, MirrorError> {
        let root = self.prepare_destination().await?;
        Ok(ManifestGenerator::generate(root).await?)
    }

    /// Push the mirror to object storage.
    pub async fn upload(&self, target: &UploadTarget) -> Result<(), MirrorError> {
        let storage = self
            .storage
            .as_ref()
            .ok_or(ConfigError::StorageUnavailable)?;

        tracing::info!(
            source = %target.source.display(),
            remote = %target.remote_uri(),
            "Uploading mirror"
        );
        storage.sync(target).await?;
        tracing::info!(remote = %target.remote_uri(), "Upload finished");
        Ok(())
    }

    async fn prepare_destination(&self) -> Result<&Path, MirrorError> {
        let root = self.config.destination()?;
        tokio::fs::create_dir_all(root)
            .await
            .map_err(|e| FilesystemError::create_dir(root, &e))?;
        Ok(root)
    }

    async fn load_manifest(&self) -> Option<Manifest> {
        match &self.config.manifest {
            Some(source) => Some(self.store.load(source).await),
            None => None,
        }
    }

    async fn sync_library(
        &self,
        request: &LibraryRequest,
        manifest: Option<&Manifest>,
        root: &Path,
    ) -> LibraryOutcome {
        let library = request.name();
        let status = match self.resolver.resolve(request, manifest).await {
            Err(error) => {
                tracing::warn!(library = %library, %error, "Skipping library");
                LibraryStatus::Skipped {
                    reason: error.to_string(),
                }
            }
            Ok(versions) if versions.is_empty() => {
                tracing::info!(library = %library, "Up to date");
                LibraryStatus::UpToDate
            }
            Ok(versions) => {
                tracing::info!(library = %library, versions = versions.len(), "Syncing library");
                let mut outcomes = Vec::with_capacity(versions.len());
                let listings = self.orchestrator.fetch_file_lists(library, &versions).await;
                for (version, listing) in listings {
                    outcomes.push(self.sync_version(library, version, listing, root).await);
                }
                LibraryStatus::Synced { versions: outcomes }
            }
        };

        LibraryOutcome {
            library: library.to_string(),
            status,
        }
    }

    async fn sync_version(
        &self,
        library: &str,
        version: String,
        listing: CatalogResult<Vec<RemoteFile>>,
        root: &Path,
    ) -> VersionOutcome {
        let files = match listing {
            Ok(files) => files,
            Err(error) => {
                tracing::warn!(
                    library = %library,
                    version = %version,
                    %error,
                    "File listing failed"
                );
                return VersionOutcome::ListingFailed { version, error };
            }
        };

        let report = self
            .orchestrator
            .download_version(library, &version, &files, root)
            .await;
        if report.is_complete() {
            VersionOutcome::Complete {
                version,
                downloaded: report.downloaded,
            }
        } else {
            VersionOutcome::Incomplete {
                version,
                downloaded: report.downloaded,
                failures: report.failures,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::VersionSelector;
    use crate::manifest::ManifestSource;
    use crate::ports::UploadError;
    use crate::testing::{FAKE_CDN, FakeCatalog, FakeTransfer};
    use async_trait::async_trait;
    use tempfile::TempDir;

    mockall::mock! {
        Storage {}

        #[async_trait]
        impl StorageSyncPort for Storage {
            async fn sync(&self, target: &UploadTarget) -> Result<(), UploadError>;
        }
    }

    fn deps(catalog: FakeCatalog, transfer: FakeTransfer) -> MirrorDeps {
        MirrorDeps {
            catalog: Arc::new(catalog),
            transfer: Arc::new(transfer),
            storage: None,
        }
    }

    #[tokio::test]
    async fn records_skipped_and_partial_libraries() {
        let dir = TempDir::new().unwrap();
        let catalog = FakeCatalog::new()
            .with_versions("foo", &["1.0.0", "2.0.0"])
            .with_files("foo", "1.0.0", &["a.js", "b.js"])
            .with_files_error("foo", "2.0.0", CatalogError::RateLimited)
            .with_versions_error(
                "gone",
                CatalogError::LibraryNotFound {
                    name: "gone".to_string(),
                },
            );
        let transfer =
            FakeTransfer::new().with_body(&format!("{FAKE_CDN}/foo/1.0.0/a.js"), "a");
        let pipeline = MirrorPipeline::new(MirrorConfig::new(dir.path()), deps(catalog, transfer));
        let requests = vec![
            LibraryRequest::new("foo", VersionSelector::All).unwrap(),
            LibraryRequest::latest("gone").unwrap(),
        ];

        let report = pipeline.run(&requests).await.unwrap();

        assert!(matches!(report.libraries[1].status, LibraryStatus::Skipped { .. }));
        let LibraryStatus::Synced { versions } = &report.libraries[0].status else {
            panic!("foo should have been synced");
        };
        assert!(matches!(
            &versions[0],
            VersionOutcome::Incomplete { failures, .. } if failures.len() == 1
        ));
        assert!(matches!(&versions[1], VersionOutcome::ListingFailed { .. }));
        assert_eq!(report.files_downloaded(), 1);
        assert_eq!(report.failure_count(), 3);
        assert_eq!(report.manifest.entry("foo").unwrap().versions, ["1.0.0"]);
    }

    #[tokio::test]
    async fn query_lists_without_downloading() {
        let dir = TempDir::new().unwrap();
        let catalog = FakeCatalog::new()
            .with_versions("foo", &["1.0.0", "1.1.0"])
            .with_files("foo", "1.1.0", &["foo.js"]);
        let transfer = Arc::new(FakeTransfer::new());
        let pipeline = MirrorPipeline::new(
            MirrorConfig::new(dir.path().join("out")),
            MirrorDeps {
                catalog: Arc::new(catalog),
                transfer: transfer.clone(),
                storage: None,
            },
        );

        let listing = pipeline
            .query(&LibraryRequest::latest("foo").unwrap())
            .await
            .unwrap();

        assert_eq!(listing.versions.len(), 1);
        assert_eq!(listing.versions[0].version, "1.1.0");
        assert_eq!(listing.versions[0].files, Ok(vec![RemoteFile::new("foo.js")]));
        assert!(transfer.requests().is_empty());
        assert!(!dir.path().join("out").exists());
    }

    #[tokio::test]
    async fn query_honours_manifest() {
        let dir = TempDir::new().unwrap();
        let catalog = FakeCatalog::new().with_versions("foo", &["1.0.0"]);
        let mut entry = crate::domain::ManifestEntry::new("foo");
        entry.push_version("1.0.0", vec!["a.js".to_string()]);
        let config = MirrorConfig::new(dir.path())
            .with_manifest(ManifestSource::Loaded(Manifest::new(vec![entry])));
        let pipeline = MirrorPipeline::new(config, deps(catalog, FakeTransfer::new()));

        let listing = pipeline
            .query(&LibraryRequest::latest("foo").unwrap())
            .await
            .unwrap();
        assert!(listing.versions.is_empty());
    }

    #[tokio::test]
    async fn missing_destination_is_fatal() {
        let pipeline = MirrorPipeline::new(
            MirrorConfig::new(""),
            deps(FakeCatalog::new(), FakeTransfer::new()),
        );

        let err = pipeline.run(&[]).await.unwrap_err();
        assert!(matches!(err, MirrorError::Config(ConfigError::MissingDestination)));
    }

    #[tokio::test]
    async fn uncreatable_destination_is_fatal() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, "x").unwrap();
        let pipeline = MirrorPipeline::new(
            MirrorConfig::new(blocker.join("dist")),
            deps(FakeCatalog::new(), FakeTransfer::new()),
        );

        let err = pipeline.run(&[]).await.unwrap_err();
        assert!(matches!(
            err,
            MirrorError::Filesystem(FilesystemError::CreateDir { .. })
        ));
    }

    #[tokio::test]
    async fn upload_runs_once_after_sync() {
        let dir = TempDir::new().unwrap();
        let target = UploadTarget::new(dir.path(), "static");
        let expected = target.clone();
        let manifest_path = dir.path().join("manifest.json");

        let mut storage = MockStorage::new();
        storage
            .expect_sync()
            .withf(move |t| *t == expected && manifest_path.exists())
            .times(1)
            .returning(|_| Ok(()));
        let mut deps = deps(FakeCatalog::new(), FakeTransfer::new());
        deps.storage = Some(Arc::new(storage));
        let pipeline = MirrorPipeline::new(MirrorConfig::new(dir.path()).with_upload(target), deps);

        pipeline.run(&[]).await.unwrap();
    }

    #[tokio::test]
    async fn upload_failure_is_returned() {
        let dir = TempDir::new().unwrap();
        let mut storage = MockStorage::new();
        storage.expect_sync().times(1).returning(|_| {
            Err(UploadError::Failed {
                program: "ossutil".to_string(),
                status: "exit status: 1".to_string(),
            })
        });
        let mut deps = deps(FakeCatalog::new(), FakeTransfer::new());
        deps.storage = Some(Arc::new(storage));
        let pipeline = MirrorPipeline::new(
            MirrorConfig::new(dir.path()).with_upload(UploadTarget::new(dir.path(), "static")),
            deps,
        );

        let err = pipeline.run(&[]).await.unwrap_err();
        assert!(matches!(err, MirrorError::Upload(UploadError::Failed { .. })));
        assert!(dir.path().join("manifest.json").exists());
    }

    #[tokio::test]
    async fn upload_without_adapter_is_a_config_error() {
        let dir = TempDir::new().unwrap();
        let pipeline = MirrorPipeline::new(
            MirrorConfig::new(dir.path()),
            deps(FakeCatalog::new(), FakeTransfer::new()),
        );

        let err = pipeline
            .upload(&UploadTarget::new(dir.path(), "static"))
            .await
            .unwrap_err();
        assert!(matches!(err, MirrorError::Config(ConfigError::StorageUnavailable)));
    }
}
