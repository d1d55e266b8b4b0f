//! File transfer port.

use std::path::Path;

use async_trait::async_trait;

use crate::error::DownloadError;

/// Port for moving bytes from a URL to local storage.
///
/// Implementations must leave `dest` either absent or complete: a partial
/// body is never visible under the destination name.
#[async_trait]
pub trait TransferPort: Send + Sync {
    /// Download `url` to `dest`, returning the number of bytes written.
    ///
    /// The parent directory of `dest` already exists.
    async fn download(&self, url: &str, dest: &Path) -> Result<u64, DownloadError>;

    /// Fetch a small document into memory.
    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, DownloadError>;
}
