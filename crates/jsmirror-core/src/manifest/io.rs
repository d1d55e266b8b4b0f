//! Manifest documents on disk.

use std::path::{Path, PathBuf};

use super::MANIFEST_FILE_NAME;
use crate::domain::Manifest;
use crate::error::FilesystemError;

/// Scratch name used while a manifest is being replaced.
const TEMP_FILE_NAME: &str = ".manifest.json.tmp";

/// Read and parse a manifest document.
pub async fn read_manifest(path: &Path) -> Result<Manifest, FilesystemError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| FilesystemError::read(path, &e))?;
    Manifest::from_slice(&bytes).map_err(|e| FilesystemError::Read {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Write `dir/manifest.json`, replacing any previous document atomically.
///
/// Returns the path written.
pub async fn write_manifest(dir: &Path, manifest: &Manifest) -> Result<PathBuf, FilesystemError> {
    let path = dir.join(MANIFEST_FILE_NAME);
    let temp = dir.join(TEMP_FILE_NAME);
    let document = manifest.to_document()?;

    tokio::fs::write(&temp, document)
        .await
        .map_err(|e| FilesystemError::write(&temp, &e))?;
    if let Err(e) = tokio::fs::rename(&temp, &path).await {
        let _ = tokio::fs::remove_file(&temp).await;
        return Err(FilesystemError::write(&path, &e));
    }

    tracing::debug!(path = %path.display(), libraries = manifest.len(), "Wrote manifest");
    Ok(path)
}
