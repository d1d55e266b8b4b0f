//! Rebuild the manifest from what is actually on disk.
//!
//! Layout scanned:
//!
//! ```text
//! <root>/<library>/<version>/<relative/path/to/file>
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::{MANIFEST_FILE_NAME, write_manifest};
use crate::domain::{Manifest, ManifestEntry, compare_versions};
use crate::error::FilesystemError;

/// Scans a mirror root and writes its manifest documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct ManifestGenerator;

impl ManifestGenerator {
    /// Scan `root` and write `manifest.json` into every library directory
    /// and into `root` itself.
    ///
    /// Output depends only on the tree, so regenerating an unchanged tree
    /// produces byte-identical documents.
    pub async fn generate(root: &Path) -> Result<Manifest, FilesystemError> {
        let manifest = Self::scan(root).await?;

        for entry in manifest.entries() {
            let library_dir = root.join(&entry.name);
            write_manifest(&library_dir, &Manifest::new(vec![entry.clone()])).await?;
        }
        write_manifest(root, &manifest).await?;

        tracing::info!(
            root = %root.display(),
            libraries = manifest.len(),
            "Regenerated manifest"
        );
        Ok(manifest)
    }

    /// Build the manifest for `root` without writing anything.
    pub async fn scan(root: &Path) -> Result<Manifest, FilesystemError> {
        let mut libraries = list_dir(root)
            .await?
            .into_iter()
            .filter(|e| e.kind == Kind::Dir)
            .map(|e| e.name)
            .collect::<Vec<_>>();
        libraries.sort();

        let mut entries = Vec::with_capacity(libraries.len());
        for library in libraries {
            entries.push(scan_library(&root.join(&library), library).await?);
        }
        Ok(Manifest::new(entries))
    }
}

async fn scan_library(dir: &Path, name: String) -> Result<ManifestEntry, FilesystemError> {
    // Files directly in the library directory have no version and are skipped.
    let mut versions: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for version_dir in list_dir(dir).await? {
        if version_dir.kind != Kind::Dir {
            continue;
        }
        let files = list_files_recursive(&dir.join(&version_dir.name)).await?;
        if !files.is_empty() {
            versions.insert(version_dir.name, files);
        }
    }

    let mut ordered: Vec<(String, Vec<String>)> = versions.into_iter().collect();
    ordered.sort_by(|(a, _), (b, _)| compare_versions(a, b));

    let mut entry = ManifestEntry::new(name);
    for (version, mut files) in ordered {
        files.sort();
        entry.push_version(version, files);
    }
    Ok(entry)
}

/// Every file under `dir` as a `/`-joined path relative to `dir`.
async fn list_files_recursive(dir: &Path) -> Result<Vec<String>, FilesystemError> {
    let mut files = Vec::new();
    let mut pending: Vec<(PathBuf, String)> = vec![(dir.to_path_buf(), String::new())];

    while let Some((current, prefix)) = pending.pop() {
        for entry in list_dir(&current).await? {
            let relative = if prefix.is_empty() {
                entry.name.clone()
            } else {
                format!("{prefix}/{}", entry.name)
            };
            match entry.kind {
                Kind::Dir => pending.push((current.join(&entry.name), relative)),
                Kind::File if entry.name != MANIFEST_FILE_NAME => files.push(relative),
                Kind::File | Kind::Other => {}
            }
        }
    }
    Ok(files)
}

#[derive(Debug, PartialEq, Eq)]
enum Kind {
    Dir,
    File,
    Other,
}

struct DirEntry {
    name: String,
    kind: Kind,
}

/// Visible entries of a directory. Hidden names (leading `.`) are dropped,
/// which also hides in-progress `.part` transfers. Symlinks are not followed.
async fn list_dir(dir: &Path) -> Result<Vec<DirEntry>, FilesystemError> {
    let mut reader = tokio::fs::read_dir(dir)
        .await
        .map_err(|e| FilesystemError::read(dir, &e))?;
    let mut entries = Vec::new();

    while let Some(entry) = reader
        .next_entry()
        .await
        .map_err(|e| FilesystemError::read(dir, &e))?
    {
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') {
            continue;
        }
        let file_type = entry
            .file_type()
            .await
            .map_err(|e| FilesystemError::read(&entry.path(), &e))?;
        let kind = if file_type.is_dir() {
            Kind::Dir
        } else if file_type.is_file() {
            Kind::File
        } else {
            Kind::Other
        };
        entries.push(DirEntry { name, kind });
    }
    Ok(entries)
}
