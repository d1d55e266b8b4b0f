//! Local path planning for mirrored files.
//!
//! A file URL such as `https://cdn/libs/foo/1.2.3/dist/foo.min.js` is split at
//! the first `/1.2.3/` segment. What follows, minus the last component, is
//! the sub-directory under `<root>/foo/1.2.3/`.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::DownloadError;

/// Maps a file URL to the local file name to store it under.
pub type FileNamer = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Where a remote file lands locally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePlacement {
    /// Source URL.
    pub url: String,
    /// Directory that must exist before the transfer.
    pub directory: PathBuf,
    /// Full destination path.
    pub path: PathBuf,
}

impl FilePlacement {
    /// Plan the destination of `url` for `library@version` under `root`.
    ///
    /// Rejects URLs that lack the version segment and any `.`, `..` or empty
    /// path segment, so a placement never escapes its version directory.
    pub fn plan(
        url: &str,
        library: &str,
        version: &str,
        root: &Path,
        namer: Option<&FileNamer>,
    ) -> Result<Self, DownloadError> {
        check_segment(url, library, "library name")?;
        check_segment(url, version, "version")?;

        let marker = format!("/{version}/");
        let Some(start) = url.find(&marker) else {
            return Err(DownloadError::unsafe_path(
                url,
                format!("URL has no '/{version}/' segment"),
            ));
        };

        let remainder = &url[start + marker.len()..];
        let remainder = remainder.split(['?', '#']).next().unwrap_or_default();
        let mut segments: Vec<&str> = remainder.split('/').collect();
        let default_name = segments.pop().unwrap_or_default();

        let mut directory = root.join(library).join(version);
        for segment in segments {
            check_segment(url, segment, "directory segment")?;
            directory.push(segment);
        }

        let file_name = namer.map_or_else(|| default_name.to_string(), |namer| namer(url));
        check_segment(url, &file_name, "file name")?;
        let path = directory.join(&file_name);

        Ok(Self {
            url: url.to_string(),
            directory,
            path,
        })
    }

    /// Create the destination directory and any missing parents.
    pub async fn ensure_dir(&self) -> Result<(), DownloadError> {
        tokio::fs::create_dir_all(&self.directory)
            .await
            .map_err(|e| DownloadError::io(&self.directory, &e))
    }
}

fn check_segment(url: &str, segment: &str, what: &str) -> Result<(), DownloadError> {
    if segment.is_empty() {
        return Err(DownloadError::unsafe_path(url, format!("empty {what}")));
    }
    if segment == "." || segment == ".." {
        return Err(DownloadError::unsafe_path(
            url,
            format!("{what} '{segment}' is a relative path"),
        ));
    }
    if segment.contains(['/', '\\']) {
        return Err(DownloadError::unsafe_path(
            url,
            format!("{what} '{segment}' contains a path separator"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan(url: &str) -> Result<FilePlacement, DownloadError> {
        FilePlacement::plan(url, "foo", "1.2.3", Path::new("out"), None)
    }

    #[test]
    fn nested_file_keeps_subdirectories() {
        let placement = plan("https://host/libs/foo/1.2.3/dist/foo.min.js").unwrap();
        assert_eq!(placement.directory, PathBuf::from("out/foo/1.2.3/dist"));
        assert_eq!(placement.path, PathBuf::from("out/foo/1.2.3/dist/foo.min.js"));
    }

    #[test]
    fn top_level_file() {
        let placement = plan("https://host/libs/foo/1.2.3/foo.js").unwrap();
        assert_eq!(placement.path, PathBuf::from("out/foo/1.2.3/foo.js"));
    }

    #[test]
    fn query_string_is_stripped() {
        let placement = plan("https://host/libs/foo/1.2.3/foo.js?v=1/2").unwrap();
        assert_eq!(placement.path, PathBuf::from("out/foo/1.2.3/foo.js"));
    }

    #[test]
    fn splits_at_first_version_segment() {
        let placement = plan("https://host/foo/1.2.3/docs/1.2.3/a.js").unwrap();
        assert_eq!(placement.path, PathBuf::from("out/foo/1.2.3/docs/1.2.3/a.js"));
    }

    #[test]
    fn custom_namer() {
        let namer: FileNamer = Arc::new(|url| format!("renamed-{}", url.len()));
        let url = "https://host/foo/1.2.3/a.js";
        let placement =
            FilePlacement::plan(url, "foo", "1.2.3", Path::new("out"), Some(&namer)).unwrap();
        assert_eq!(
            placement.path,
            PathBuf::from(format!("out/foo/1.2.3/renamed-{}", url.len()))
        );
    }

    #[test]
    fn rejects_traversal_and_missing_version() {
        for url in [
            "https://host/foo/1.2.3/../escape.js",
            "https://host/foo/1.2.3/./a.js",
            "https://host/foo/1.2.3/dist//a.js",
            "https://host/foo/1.2.3/dist/",
            "https://host/foo/9.9.9/a.js",
        ] {
            assert!(
                matches!(plan(url), Err(DownloadError::UnsafePath { .. })),
                "{url} should be rejected"
            );
        }
    }

    #[test]
    fn rejects_unsafe_version() {
        let result =
            FilePlacement::plan("https://host/foo/../a.js", "foo", "..", Path::new("out"), None);
        assert!(matches!(result, Err(DownloadError::UnsafePath { .. })));
    }

    #[tokio::test]
    async fn ensure_dir_is_idempotent() {
        let dir = tempfile::TempDir::new().unwrap();
        let placement = FilePlacement::plan(
            "https://host/foo/1.2.3/a/b/c.js",
            "foo",
            "1.2.3",
            dir.path(),
            None,
        )
        .unwrap();

        placement.ensure_dir().await.unwrap();
        placement.ensure_dir().await.unwrap();
        assert!(dir.path().join("foo/1.2.3/a/b").is_dir());
    }
}
