//! Object storage sync port.

use std::fmt;
use std::path::PathBuf;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Where and how to push the mirror after a run.
///
/// Loaded from a JSON document with camel-case keys
/// (`accessKeyId`, `incrementalMode`, ...). Credentials are passed through to
/// the sync program untouched.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadTarget {
    /// Local directory to upload.
    pub source: PathBuf,
    /// Prefix inside the bucket.
    #[serde(default)]
    pub dest: String,
    pub bucket: String,
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub access_key_id: Option<String>,
    #[serde(default)]
    pub secret_access_key: Option<String>,
    /// Only push files that changed.
    #[serde(default)]
    pub incremental_mode: bool,
    /// Sync program to run instead of the adapter default.
    #[serde(default)]
    pub command: Option<String>,
}

impl UploadTarget {
    pub fn new(source: impl Into<PathBuf>, bucket: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            dest: String::new(),
            bucket: bucket.into(),
            endpoint: None,
            access_key_id: None,
            secret_access_key: None,
            incremental_mode: false,
            command: None,
        }
    }

    /// Remote URI, e.g. `oss://bucket/prefix`.
    pub fn remote_uri(&self) -> String {
        let prefix = self.dest.trim_matches('/');
        if prefix.is_empty() {
            format!("oss://{}/", self.bucket)
        } else {
            format!("oss://{}/{prefix}", self.bucket)
        }
    }
}

impl fmt::Debug for UploadTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadTarget")
            .field("source", &self.source)
            .field("dest", &self.dest)
            .field("bucket", &self.bucket)
            .field("endpoint", &self.endpoint)
            .field("access_key_id", &self.access_key_id)
            .field(
                "secret_access_key",
                &self.secret_access_key.as_ref().map(|_| "<redacted>"),
            )
            .field("incremental_mode", &self.incremental_mode)
            .field("command", &self.command)
            .finish()
    }
}

/// Errors from the storage sync step.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadError {
    /// The sync program could not be started.
    #[error("Failed to start '{program}': {message}")]
    Spawn { program: String, message: String },

    /// The sync program ran and reported failure.
    #[error("'{program}' exited with {status}")]
    Failed { program: String, status: String },
}

/// Port for pushing the local mirror to object storage.
#[async_trait]
pub trait StorageSyncPort: Send + Sync {
    /// Synchronize `target.source` to the remote location.
    async fn sync(&self, target: &UploadTarget) -> Result<(), UploadError>;
}
