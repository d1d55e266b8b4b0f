//! End-to-end tests for `MirrorPipeline`.
//!
//! A single in-memory CDN stands in for both the catalog and the transfer
//! port, so a run goes from library request to files on disk and a
//! regenerated manifest without any network access.
//!
//! # What is tested
//!
//! - A `latest` request fetches exactly the newest version's files
//! - A second run fed the generated manifest fetches nothing
//! - Regenerating the manifest over an unchanged tree is byte-identical
//! - Nested remote paths land in matching local sub-directories
//! - Manifests loaded from a URL drive incremental mode

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use jsmirror_core::{
    CatalogError, CatalogPort, CatalogResult, DownloadError, LibraryDescriptors, LibraryRequest,
    LibraryStatus, ManifestGenerator, ManifestSource, MirrorConfig, MirrorDeps, MirrorPipeline,
    RemoteFile, TransferPort,
};
use tempfile::TempDir;

const CDN: &str = "https://cdn.stub/ajax/libs";

// ── Stub CDN ───────────────────────────────────────────────────────

#[derive(Default)]
struct StubCdn {
    /// library -> versions in catalog order
    versions: HashMap<String, Vec<String>>,
    /// (library, version) -> files
    files: HashMap<(String, String), Vec<String>>,
    /// Extra documents served by URL
    documents: HashMap<String, Vec<u8>>,
    fetched: Mutex<Vec<String>>,
}

impl StubCdn {
    fn library(mut self, name: &str, version: &str, files: &[&str]) -> Self {
        self.versions
            .entry(name.to_string())
            .or_default()
            .push(version.to_string());
        self.files.insert(
            (name.to_string(), version.to_string()),
            files.iter().map(ToString::to_string).collect(),
        );
        self
    }

    fn document(mut self, url: &str, body: Vec<u8>) -> Self {
        self.documents.insert(url.to_string(), body);
        self
    }

    fn fetched(&self) -> Vec<String> {
        self.fetched.lock().unwrap().clone()
    }

    fn body_for(&self, url: &str) -> Option<Vec<u8>> {
        if let Some(doc) = self.documents.get(url) {
            return Some(doc.clone());
        }
        url.strip_prefix(CDN).map(|path| path.as_bytes().to_vec())
    }
}

#[async_trait]
impl CatalogPort for StubCdn {
    async fn list_versions(&self, name: &str) -> CatalogResult<Vec<String>> {
        self.versions
            .get(name)
            .cloned()
            .ok_or_else(|| CatalogError::LibraryNotFound {
                name: name.to_string(),
            })
    }

    async fn list_files(&self, name: &str, version: &str) -> CatalogResult<Vec<RemoteFile>> {
        let files = self
            .files
            .get(&(name.to_string(), version.to_string()))
            .cloned()
            .unwrap_or_default();
        Ok(files.into_iter().map(RemoteFile::new).collect())
    }

    fn file_url(&self, name: &str, version: &str, path: &str) -> String {
        format!("{CDN}/{name}/{version}/{path}")
    }
}

#[async_trait]
impl TransferPort for StubCdn {
    async fn download(&self, url: &str, dest: &Path) -> Result<u64, DownloadError> {
        let body = self.fetch_bytes(url).await?;
        tokio::fs::write(dest, &body)
            .await
            .map_err(|e| DownloadError::io(dest, &e))?;
        Ok(body.len() as u64)
    }

    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, DownloadError> {
        self.fetched.lock().unwrap().push(url.to_string());
        self.body_for(url).ok_or_else(|| DownloadError::Http {
            url: url.to_string(),
            status: 404,
        })
    }
}

fn pipeline(cdn: &Arc<StubCdn>, config: MirrorConfig) -> MirrorPipeline {
    MirrorPipeline::new(
        config,
        MirrorDeps {
            catalog: cdn.clone(),
            transfer: cdn.clone(),
            storage: None,
        },
    )
}

fn requests(json: &str) -> Vec<LibraryRequest> {
    serde_json::from_str::<LibraryDescriptors>(json)
        .unwrap()
        .into_requests()
        .unwrap()
}

// ── Tests ──────────────────────────────────────────────────────────

#[tokio::test]
async fn latest_request_mirrors_one_file() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("out");
    let cdn = Arc::new(StubCdn::default().library("foo", "1.0.0", &["a.js"]));

    let report = pipeline(&cdn, MirrorConfig::new(&out))
        .run(&requests(r#"{"name": "foo", "version": "latest"}"#))
        .await
        .unwrap();

    assert_eq!(cdn.fetched(), [format!("{CDN}/foo/1.0.0/a.js")]);
    assert!(out.join("foo/1.0.0/a.js").is_file());
    assert_eq!(report.files_downloaded(), 1);
    assert!(report.is_clean());

    let entry = report.manifest.entry("foo").unwrap();
    assert_eq!(entry.versions, ["1.0.0"]);
    assert_eq!(entry.files[0].files, ["a.js"]);
}

#[tokio::test]
async fn second_run_with_generated_manifest_fetches_nothing() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("out");
    let cdn = Arc::new(
        StubCdn::default()
            .library("foo", "1.0.0", &["a.js"])
            .library("foo", "1.1.0", &["a.js", "b.js"])
            .library("bar", "2.0.0", &["bar.css"]),
    );
    let libs = requests(r#"[{"name": "foo", "version": ">=1.0.0"}, {"name": "bar"}]"#);
    let config = MirrorConfig::new(&out).with_manifest(ManifestSource::Path(out.clone()));

    let first = pipeline(&cdn, config.clone()).run(&libs).await.unwrap();
    assert_eq!(first.files_downloaded(), 4);
    let fetched_after_first = cdn.fetched().len();

    let second = pipeline(&cdn, config).run(&libs).await.unwrap();

    assert_eq!(cdn.fetched().len(), fetched_after_first);
    assert!(
        second
            .libraries
            .iter()
            .all(|l| l.status == LibraryStatus::UpToDate)
    );
    assert_eq!(second.manifest, first.manifest);
}

#[tokio::test]
async fn manifest_regeneration_is_byte_identical() {
    let dir = TempDir::new().unwrap();
    let cdn = Arc::new(
        StubCdn::default()
            .library("foo", "1.2.0", &["dist/foo.min.js", "foo.js"])
            .library("foo", "1.10.0", &["foo.js"]),
    );
    pipeline(&cdn, MirrorConfig::new(dir.path()))
        .run(&requests(r#"{"name": "foo", "version": "*"}"#))
        .await
        .unwrap();
    let first = std::fs::read(dir.path().join("manifest.json")).unwrap();

    ManifestGenerator::generate(dir.path()).await.unwrap();
    let second = std::fs::read(dir.path().join("manifest.json")).unwrap();

    assert_eq!(first, second);
    let library_doc = std::fs::read_to_string(dir.path().join("foo/manifest.json")).unwrap();
    assert!(library_doc.starts_with("[\n  {\n    \"name\": \"foo\""));
}

#[tokio::test]
async fn nested_paths_keep_their_directories() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("out");
    let cdn = Arc::new(StubCdn::default().library("foo", "1.2.3", &["dist/foo.min.js"]));

    pipeline(&cdn, MirrorConfig::new(&out))
        .run(&requests(r#"{"name": "foo", "version": "1.2.3"}"#))
        .await
        .unwrap();

    let body = std::fs::read_to_string(out.join("foo/1.2.3/dist/foo.min.js")).unwrap();
    assert_eq!(body, "/foo/1.2.3/dist/foo.min.js");
}

#[tokio::test]
async fn remote_manifest_skips_recorded_versions() {
    let dir = TempDir::new().unwrap();
    let manifest_url = "https://mirror.stub/manifest.json";
    let remote = br#"[{"name": "foo", "versions": ["1.0.0"], "files": []}]"#.to_vec();
    let cdn = Arc::new(
        StubCdn::default()
            .library("foo", "1.0.0", &["a.js"])
            .library("foo", "1.1.0", &["a.js"])
            .document(manifest_url, remote),
    );
    let config = MirrorConfig::new(dir.path()).with_manifest(ManifestSource::parse(manifest_url));

    let report = pipeline(&cdn, config)
        .run(&requests(r#"{"name": "foo", "version": ["1.0.0", "1.1.0"]}"#))
        .await
        .unwrap();

    assert_eq!(report.versions_fetched(), 1);
    assert!(dir.path().join("foo/1.1.0/a.js").exists());
    assert!(!dir.path().join("foo/1.0.0").exists());
}
