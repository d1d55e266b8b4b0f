//! Mirror run configuration.

use std::fmt;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::manifest::ManifestSource;
use crate::orchestrator::FileNamer;
use crate::pool::DEFAULT_CONCURRENCY;
use crate::ports::UploadTarget;

/// Default mirror root, relative to the working directory.
pub const DEFAULT_DESTINATION: &str = "dist";

/// Everything one pipeline run needs to know besides the library requests.
///
/// Passed explicitly into [`crate::MirrorPipeline`]; there is no global state.
#[derive(Clone)]
pub struct MirrorConfig {
    /// Mirror root directory.
    pub destination: PathBuf,
    /// Task pool width for listings and transfers.
    pub concurrency: NonZeroUsize,
    /// Previously mirrored state; enables incremental mode when set.
    pub manifest: Option<ManifestSource>,
    /// Push the mirror to object storage after the run.
    pub upload: Option<UploadTarget>,
    /// Override for local file names.
    pub file_namer: Option<FileNamer>,
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            destination: PathBuf::from(DEFAULT_DESTINATION),
            concurrency: NonZeroUsize::new(DEFAULT_CONCURRENCY).unwrap_or(NonZeroUsize::MIN),
            manifest: None,
            upload: None,
            file_namer: None,
        }
    }
}

impl MirrorConfig {
    pub fn new(destination: impl Into<PathBuf>) -> Self {
        Self {
            destination: destination.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn with_concurrency(mut self, concurrency: NonZeroUsize) -> Self {
        self.concurrency = concurrency;
        self
    }

    #[must_use]
    pub fn with_manifest(mut self, manifest: ManifestSource) -> Self {
        self.manifest = Some(manifest);
        self
    }

    #[must_use]
    pub fn with_upload(mut self, upload: UploadTarget) -> Self {
        self.upload = Some(upload);
        self
    }

    #[must_use]
    pub fn with_file_namer(mut self, namer: FileNamer) -> Self {
        self.file_namer = Some(namer);
        self
    }

    /// Whether previously mirrored versions are skipped.
    pub const fn is_incremental(&self) -> bool {
        self.manifest.is_some()
    }

    /// The destination, if one is configured.
    pub fn destination(&self) -> Result<&Path, ConfigError> {
        if self.destination.as_os_str().is_empty() {
            return Err(ConfigError::MissingDestination);
        }
        Ok(&self.destination)
    }
}

impl fmt::Debug for MirrorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MirrorConfig")
            .field("destination", &self.destination)
            .field("concurrency", &self.concurrency)
            .field("manifest", &self.manifest)
            .field("upload", &self.upload)
            .field("file_namer", &self.file_namer.as_ref().map(|_| ".."))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = MirrorConfig::default();
        assert_eq!(config.destination, PathBuf::from("dist"));
        assert_eq!(config.concurrency.get(), 6);
        assert!(!config.is_incremental());
    }

    #[test]
    fn empty_destination_is_missing() {
        let config = MirrorConfig::new("");
        assert_eq!(config.destination(), Err(ConfigError::MissingDestination));
    }

    #[test]
    fn builder_sets_manifest() {
        let config =
            MirrorConfig::new("out").with_manifest(ManifestSource::parse("out/manifest.json"));
        assert!(config.is_incremental());
        assert_eq!(config.destination().unwrap(), Path::new("out"));
    }
}
