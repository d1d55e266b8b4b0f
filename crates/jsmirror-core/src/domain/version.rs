//! Version collections and ordering.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Plain release versions: 2 or 3 numeric components, no leading zeros,
/// no pre-release or build suffix.
static RELEASE_VERSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(0|[1-9]\d*)(\.(0|[1-9]\d*)){1,2}$").expect("release version pattern is valid")
});

/// Check whether a version string is a plain numeric release (`1.2` or `1.2.3`).
pub fn is_release_version(version: &str) -> bool {
    RELEASE_VERSION.is_match(version)
}

/// Order two version strings by their dot-separated components.
///
/// Numeric components compare numerically (`1.10.0` > `1.2.0`); anything else
/// falls back to string comparison. Ties are broken on the raw string so the
/// ordering is total and sorting is deterministic.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    let mut left = a.split('.');
    let mut right = b.split('.');

    loop {
        match (left.next(), right.next()) {
            (Some(l), Some(r)) => {
                let ord = match (l.parse::<u64>(), r.parse::<u64>()) {
                    (Ok(ln), Ok(rn)) => ln.cmp(&rn),
                    _ => l.cmp(r),
                };
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            (Some(_), None) => return Ordering::Greater,
            (None, Some(_)) => return Ordering::Less,
            (None, None) => return a.cmp(b),
        }
    }
}

/// Ordered sequence of version strings without duplicates.
///
/// Order is whatever the producer chose (catalog order for resolved sets);
/// construction drops repeated entries keeping the first occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VersionSet(Vec<String>);

impl VersionSet {
    /// Build a set from any sequence of versions, dropping duplicates.
    pub fn new<I, S>(versions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        versions.into_iter().map(Into::into).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn contains(&self, version: &str) -> bool {
        self.0.iter().any(|v| v == version)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }

    /// Remove every version listed in `excluded`, preserving order.
    #[must_use]
    pub fn without(self, excluded: &[String]) -> Self {
        if excluded.is_empty() {
            return self;
        }
        let excluded: HashSet<&str> = excluded.iter().map(String::as_str).collect();
        Self(
            self.0
                .into_iter()
                .filter(|v| !excluded.contains(v.as_str()))
                .collect(),
        )
    }
}

impl FromIterator<String> for VersionSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        let mut seen = HashSet::new();
        let mut versions = Vec::new();
        for version in iter {
            if seen.insert(version.clone()) {
                versions.push(version);
            }
        }
        Self(versions)
    }
}

impl IntoIterator for VersionSet {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a VersionSet {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
