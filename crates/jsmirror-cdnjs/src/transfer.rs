//! Streaming HTTP file transfer.
//!
//! Bodies are written to a hidden `.<name>.part` sibling and renamed into
//! place once complete, so the destination is either absent or whole.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use futures_util::StreamExt;
use jsmirror_core::{DownloadError, TransferPort};
use tokio::io::AsyncWriteExt;

use crate::config::CdnjsConfig;
use crate::error::CdnjsResult;

/// `TransferPort` backed by reqwest.
///
/// The configured timeout bounds connection setup only; large files may
/// take as long as they need once the body is flowing.
pub struct HttpTransfer {
    client: reqwest::Client,
}

impl HttpTransfer {
    pub fn new(config: &CdnjsConfig) -> CdnjsResult<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self { client })
    }

    async fn get(&self, url: &str) -> Result<reqwest::Response, DownloadError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| network(url, &e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::Http {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response)
    }

    async fn stream_to(
        &self,
        response: reqwest::Response,
        url: &str,
        part: &Path,
    ) -> Result<u64, DownloadError> {
        let mut file = tokio::fs::File::create(part)
            .await
            .map_err(|e| DownloadError::io(part, &e))?;

        let mut written: u64 = 0;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| network(url, &e))?;
            file.write_all(&chunk)
                .await
                .map_err(|e| DownloadError::io(part, &e))?;
            written += chunk.len() as u64;
        }
        file.flush().await.map_err(|e| DownloadError::io(part, &e))?;
        Ok(written)
    }
}

#[async_trait]
impl TransferPort for HttpTransfer {
    async fn download(&self, url: &str, dest: &Path) -> Result<u64, DownloadError> {
        let response = self.get(url).await?;
        let part = part_path(dest);

        let written = match self.stream_to(response, url, &part).await {
            Ok(written) => written,
            Err(e) => {
                let _ = tokio::fs::remove_file(&part).await;
                return Err(e);
            }
        };

        if let Err(e) = tokio::fs::rename(&part, dest).await {
            let _ = tokio::fs::remove_file(&part).await;
            return Err(DownloadError::io(dest, &e));
        }
        tracing::trace!(url = %url, bytes = written, "Transfer complete");
        Ok(written)
    }

    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, DownloadError> {
        let response = self.get(url).await?;
        let body = response.bytes().await.map_err(|e| network(url, &e))?;
        Ok(body.to_vec())
    }
}

fn network(url: &str, err: &reqwest::Error) -> DownloadError {
    DownloadError::Network {
        url: url.to_string(),
        message: err.to_string(),
    }
}

/// `dir/foo.js` -> `dir/.foo.js.part`
fn part_path(dest: &Path) -> PathBuf {
    let name = dest
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    dest.with_file_name(format!(".{name}.part"))
}
