//! Error types for the mirror core.
//!
//! Each failure domain gets its own enum so callers can tell a bad request
//! from a broken disk from a flaky network. `MirrorError` is the umbrella the
//! pipeline returns; adapters map it to their own surfaces (CLI exit codes).

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::domain::{DownloadedFile, FileFailure};
use crate::ports::{CatalogError, UploadError};

/// Invalid caller input or configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// No destination directory was configured.
    #[error("No destination directory configured")]
    MissingDestination,

    /// A version selector could not be parsed.
    #[error("Invalid version selector '{value}': {reason}")]
    InvalidSelector {
        /// The selector text as given
        value: String,
        /// Parser message
        reason: String,
    },

    /// A library name cannot be used as a directory name.
    #[error("Invalid library name '{name}': {reason}")]
    InvalidLibraryName {
        /// The rejected name
        name: String,
        /// What is wrong with it
        reason: String,
    },

    /// Concurrency limit must be at least one.
    #[error("Invalid concurrency {value}: must be at least 1")]
    InvalidConcurrency {
        /// The rejected value
        value: usize,
    },

    /// The upload configuration could not be loaded.
    #[error("Invalid upload configuration at {}: {message}", .path.display())]
    UploadConfig {
        /// Where the configuration was read from
        path: PathBuf,
        /// What went wrong
        message: String,
    },

    /// An upload was requested but no storage adapter is wired in.
    #[error("Upload requested but no storage sync adapter is configured")]
    StorageUnavailable,
}

/// Local filesystem failures while reading or writing the mirror.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilesystemError {
    #[error("Failed to create directory {}: {message}", .path.display())]
    CreateDir { path: PathBuf, message: String },

    #[error("Failed to read {}: {message}", .path.display())]
    Read { path: PathBuf, message: String },

    #[error("Failed to write {}: {message}", .path.display())]
    Write { path: PathBuf, message: String },

    #[error("Failed to serialize manifest: {message}")]
    Serialize { message: String },
}

impl FilesystemError {
    pub fn create_dir(path: &Path, err: &io::Error) -> Self {
        Self::CreateDir {
            path: path.to_path_buf(),
            message: err.to_string(),
        }
    }

    pub fn read(path: &Path, err: &io::Error) -> Self {
        Self::Read {
            path: path.to_path_buf(),
            message: err.to_string(),
        }
    }

    pub fn write(path: &Path, err: &io::Error) -> Self {
        Self::Write {
            path: path.to_path_buf(),
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for FilesystemError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialize {
            message: err.to_string(),
        }
    }
}

/// Failures while transferring files.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DownloadError {
    /// The server answered with a non-success status.
    #[error("HTTP {status} fetching {url}")]
    Http {
        /// Requested URL
        url: String,
        /// Response status code
        status: u16,
    },

    /// The request never completed.
    #[error("Network error fetching {url}: {message}")]
    Network {
        /// Requested URL
        url: String,
        /// Transport message
        message: String,
    },

    /// Writing the file locally failed.
    #[error("I/O error at {}: {message}", .path.display())]
    Io {
        /// Local path involved
        path: PathBuf,
        /// OS message
        message: String,
    },

    /// The URL would place a file outside its version directory.
    #[error("Refusing unsafe path for {url}: {reason}")]
    UnsafePath {
        /// Source URL
        url: String,
        /// Which rule was violated
        reason: String,
    },

    /// Some files of a version could not be fetched.
    #[error(
        "{library}@{version} incomplete: {} failed, {} downloaded",
        .failures.len(),
        .downloaded.len()
    )]
    Incomplete {
        /// Library name
        library: String,
        /// Version being mirrored
        version: String,
        /// Every file that failed
        failures: Vec<FileFailure>,
        /// Files that did land on disk
        downloaded: Vec<DownloadedFile>,
    },
}

impl DownloadError {
    pub fn io(path: &Path, err: &io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            message: err.to_string(),
        }
    }

    pub fn unsafe_path(url: &str, reason: impl Into<String>) -> Self {
        Self::UnsafePath {
            url: url.to_string(),
            reason: reason.into(),
        }
    }
}

/// Top-level error returned by the mirror pipeline.
#[derive(Debug, Error)]
pub enum MirrorError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Filesystem(#[from] FilesystemError),

    #[error(transparent)]
    Download(#[from] DownloadError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Upload(#[from] UploadError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::InvalidSelector {
            value: ">=x".to_string(),
            reason: "unexpected character".to_string(),
        };
        assert!(err.to_string().contains(">=x"));

        let err = ConfigError::InvalidConcurrency { value: 0 };
        assert!(err.to_string().contains("at least 1"));
    }

    #[test]
    fn test_incomplete_counts_files() {
        let err = DownloadError::Incomplete {
            library: "foo".to_string(),
            version: "1.0.0".to_string(),
            failures: vec![FileFailure {
                url: "https://cdn.example/foo/1.0.0/b.js".to_string(),
                error: DownloadError::Http {
                    url: "https://cdn.example/foo/1.0.0/b.js".to_string(),
                    status: 404,
                },
            }],
            downloaded: vec![DownloadedFile {
                url: "https://cdn.example/foo/1.0.0/a.js".to_string(),
                path: PathBuf::from("dist/foo/1.0.0/a.js"),
            }],
        };
        assert_eq!(err.to_string(), "foo@1.0.0 incomplete: 1 failed, 1 downloaded");
    }

    #[test]
    fn test_mirror_error_is_transparent() {
        let err: MirrorError = ConfigError::MissingDestination.into();
        assert_eq!(err.to_string(), "No destination directory configured");

        let io = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        let err: MirrorError = FilesystemError::write(Path::new("dist/manifest.json"), &io).into();
        assert!(err.to_string().contains("dist/manifest.json"));
    }
}
