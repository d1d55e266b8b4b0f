//! The manifest: what has already been mirrored.

use serde::{Deserialize, Serialize};

/// Files of one mirrored version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionFiles {
    /// Library name.
    pub name: String,
    /// Version directory name.
    pub version: String,
    /// Paths relative to the version directory, `/`-separated.
    #[serde(default)]
    pub files: Vec<String>,
}

/// Everything mirrored for one library.
///
/// When produced by the generator, `versions` is exactly the set of
/// `version` values appearing in `files`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub name: String,
    #[serde(default)]
    pub versions: Vec<String>,
    #[serde(default)]
    pub files: Vec<VersionFiles>,
}

impl ManifestEntry {
    /// Create an empty entry for a library.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Append a version with its files, keeping `versions` in sync.
    pub fn push_version(&mut self, version: impl Into<String>, files: Vec<String>) {
        let version = version.into();
        if !self.versions.contains(&version) {
            self.versions.push(version.clone());
        }
        self.files.push(VersionFiles {
            name: self.name.clone(),
            version,
            files,
        });
    }

    pub fn has_version(&self, version: &str) -> bool {
        self.versions.iter().any(|v| v == version)
    }
}

/// Ordered list of manifest entries, one per library.
///
/// Serialized as a bare JSON array.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Manifest {
    entries: Vec<ManifestEntry>,
}

/// Documents in the wild are either arrays or a single library's object.
#[derive(Deserialize)]
#[serde(untagged)]
enum ManifestDocument {
    Entries(Vec<ManifestEntry>),
    Single(ManifestEntry),
}

impl Manifest {
    pub const fn new(entries: Vec<ManifestEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[ManifestEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<ManifestEntry> {
        self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Look up a library's entry by name.
    pub fn entry(&self, name: &str) -> Option<&ManifestEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// Parse a manifest document (array of entries or one entry object).
    pub fn from_slice(bytes: &[u8]) -> serde_json::Result<Self> {
        let document: ManifestDocument = serde_json::from_slice(bytes)?;
        Ok(match document {
            ManifestDocument::Entries(entries) => Self::new(entries),
            ManifestDocument::Single(entry) => Self::new(vec![entry]),
        })
    }

    /// Render the on-disk document: 2-space indented JSON with a trailing newline.
    pub fn to_document(&self) -> serde_json::Result<String> {
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        Ok(json)
    }
}

impl FromIterator<ManifestEntry> for Manifest {
    fn from_iter<I: IntoIterator<Item = ManifestEntry>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
