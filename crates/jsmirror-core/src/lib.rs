#![doc = include_str!("../README.md")]
#![deny(unused_crate_dependencies)]

pub mod config;
pub mod domain;
pub mod error;
pub mod manifest;
pub mod orchestrator;
pub mod pipeline;
pub mod pool;
pub mod ports;
pub mod resolver;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

// Re-export commonly used types for convenience
pub use config::{DEFAULT_DESTINATION, MirrorConfig};
pub use domain::{
    DownloadedFile, FileFailure, FilterOutcome, LibraryDescriptor, LibraryDescriptors,
    LibraryRequest, Manifest, ManifestEntry, SelectorSpec, VersionFiles, VersionPredicate,
    VersionRange, VersionSelector, VersionSet, compare_versions, is_release_version,
};
pub use error::{ConfigError, DownloadError, FilesystemError, MirrorError};
pub use manifest::{
    MANIFEST_FILE_NAME, ManifestGenerator, ManifestSource, ManifestStore, read_manifest,
    write_manifest,
};
pub use orchestrator::{DownloadOrchestrator, FileNamer, FilePlacement, VersionDownload};
pub use pipeline::{
    LibraryListing, LibraryOutcome, LibraryStatus, MirrorDeps, MirrorPipeline, SyncReport,
    VersionListing, VersionOutcome,
};
pub use pool::{DEFAULT_CONCURRENCY, TaskPool};
pub use ports::{
    CatalogError, CatalogPort, CatalogResult, RemoteFile, StorageSyncPort, TransferPort,
    UploadError, UploadTarget,
};
pub use resolver::VersionResolver;
