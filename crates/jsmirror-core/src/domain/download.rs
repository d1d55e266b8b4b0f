//! Per-file transfer outcomes.

use std::path::PathBuf;

use crate::error::DownloadError;

/// A file that landed on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadedFile {
    /// Source URL.
    pub url: String,
    /// Local destination.
    pub path: PathBuf,
}

/// A file that could not be fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFailure {
    /// Source URL.
    pub url: String,
    /// What went wrong.
    pub error: DownloadError,
}
