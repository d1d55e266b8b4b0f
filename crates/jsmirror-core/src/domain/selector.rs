//! Version selectors.
//!
//! A selector narrows the catalog's version list down to the versions a
//! request wants mirrored. Textual selectors accept npm-style range syntax
//! since that is what library catalogs and their users speak.

use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::str::FromStr;
use std::sync::Arc;

use regex::Regex;
use semver::{Version, VersionReq};

use super::version::{VersionSet, compare_versions, is_release_version};
use crate::error::ConfigError;

/// Caller-supplied version filter.
pub type VersionPredicate = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// How a request picks versions out of the catalog's list.
#[derive(Clone, Default)]
pub enum VersionSelector {
    /// Newest plain release (`1.2.3`, no pre-release suffix).
    #[default]
    Latest,
    /// One exact version; resolved without asking the catalog.
    Exact(String),
    /// Semantic-version range.
    Range(VersionRange),
    /// Explicit list of wanted versions.
    List(Vec<String>),
    /// Versions matching a regular expression.
    Pattern(Regex),
    /// Versions accepted by a predicate.
    Predicate(VersionPredicate),
    /// Every version the catalog reports.
    All,
}

impl VersionSelector {
    /// Build a predicate selector.
    pub fn predicate(f: impl Fn(&str) -> bool + Send + Sync + 'static) -> Self {
        Self::Predicate(Arc::new(f))
    }

    /// Apply the selector to a catalog version list.
    ///
    /// Lists with at most one entry are returned as-is whatever the selector.
    pub fn filter(&self, versions: &[String]) -> FilterOutcome {
        if versions.len() <= 1 {
            return FilterOutcome::Matched(VersionSet::new(versions.iter().cloned()));
        }

        let keep = |accept: &dyn Fn(&str) -> bool| -> VersionSet {
            versions.iter().filter(|v| accept(v.as_str())).cloned().collect()
        };

        let set = match self {
            Self::Latest => versions
                .iter()
                .filter(|v| is_release_version(v))
                .max_by(|a, b| compare_versions(a, b))
                .into_iter()
                .cloned()
                .collect(),
            Self::Exact(wanted) => keep(&|v| v == wanted.as_str()),
            Self::Range(range) => keep(&|v| range.matches(v)),
            Self::List(wanted) => keep(&|v| wanted.iter().any(|w| w.as_str() == v)),
            Self::Pattern(pattern) => keep(&|v| pattern.is_match(v)),
            Self::Predicate(predicate) => {
                match catch_unwind(AssertUnwindSafe(|| keep(&|v| predicate(v)))) {
                    Ok(set) => set,
                    Err(_) => {
                        return FilterOutcome::Rejected {
                            reason: "version predicate panicked".to_string(),
                        };
                    }
                }
            }
            Self::All => VersionSet::new(versions.iter().cloned()),
        };

        FilterOutcome::Matched(set)
    }
}

impl fmt::Debug for VersionSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Latest => f.write_str("Latest"),
            Self::Exact(v) => f.debug_tuple("Exact").field(v).finish(),
            Self::Range(r) => f.debug_tuple("Range").field(&r.to_string()).finish(),
            Self::List(l) => f.debug_tuple("List").field(l).finish(),
            Self::Pattern(p) => f.debug_tuple("Pattern").field(&p.as_str()).finish(),
            Self::Predicate(_) => f.write_str("Predicate(..)"),
            Self::All => f.write_str("All"),
        }
    }
}

impl fmt::Display for VersionSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Latest => f.write_str("latest"),
            Self::Exact(v) => f.write_str(v),
            Self::Range(r) => write!(f, "{r}"),
            Self::List(l) => write!(f, "[{}]", l.join(", ")),
            Self::Pattern(p) => write!(f, "/{}/", p.as_str()),
            Self::Predicate(_) => f.write_str("<predicate>"),
            Self::All => f.write_str("all"),
        }
    }
}

impl FromStr for VersionSelector {
    type Err = ConfigError;

    /// Parse order: `latest`, exact version, `/regex/`, range.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        if s.eq_ignore_ascii_case("latest") {
            return Ok(Self::Latest);
        }

        if let Some(version) = parse_exact(s) {
            return Ok(Self::Exact(version.to_string()));
        }

        if s.len() >= 2 && s.starts_with('/') && s.ends_with('/') {
            let pattern = &s[1..s.len() - 1];
            return Regex::new(pattern)
                .map(Self::Pattern)
                .map_err(|e| ConfigError::InvalidSelector {
                    value: s.to_string(),
                    reason: e.to_string(),
                });
        }

        s.parse::<VersionRange>().map(Self::Range)
    }
}

/// Strictly parse a single version, tolerating a leading `v` or `=`.
fn parse_exact(s: &str) -> Option<Version> {
    let trimmed = s
        .strip_prefix('=')
        .unwrap_or(s)
        .trim_start()
        .trim_start_matches(['v', 'V']);
    Version::parse(trimmed).ok()
}

/// Outcome of applying a selector to a version list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterOutcome {
    /// The selector ran; these versions matched (possibly none).
    Matched(VersionSet),
    /// The selector could not be applied.
    Rejected {
        /// Why the filter was abandoned.
        reason: String,
    },
}

impl FilterOutcome {
    /// Matched versions, or an empty set when the filter was rejected.
    pub fn into_versions(self) -> VersionSet {
        match self {
            Self::Matched(set) => set,
            Self::Rejected { .. } => VersionSet::default(),
        }
    }
}

/// A semantic-version range in npm or Cargo syntax.
///
/// Supports `||` alternatives, whitespace- or comma-separated comparators,
/// hyphen ranges (`1.2.3 - 2.0.0`) and bare versions, which pin like `=`.
#[derive(Debug, Clone)]
pub struct VersionRange {
    source: String,
    alternatives: Vec<VersionReq>,
}

impl VersionRange {
    /// Check whether a version string satisfies any alternative.
    ///
    /// Strings that are not valid semantic versions never match.
    pub fn matches(&self, version: &str) -> bool {
        let Ok(version) = Version::parse(version.trim_start_matches(['v', '='])) else {
            return false;
        };
        self.alternatives.iter().any(|req| req.matches(&version))
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }
}

impl fmt::Display for VersionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl FromStr for VersionRange {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let alternatives = s
            .split("||")
            .map(|alt| {
                let normalized = normalize_comparators(alt);
                VersionReq::parse(&normalized).map_err(|e| ConfigError::InvalidSelector {
                    value: s.trim().to_string(),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            source: s.trim().to_string(),
            alternatives,
        })
    }
}

const OPERATORS: &[&str] = &["<=", ">=", "<", ">", "=", "~", "^"];

/// Rewrite one npm-style comparator set into `semver` crate syntax.
fn normalize_comparators(alt: &str) -> String {
    let tokens: Vec<&str> = alt
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|t| !t.is_empty())
        .collect();

    if tokens.is_empty() {
        return "*".to_string();
    }

    if let [low, "-", high] = tokens.as_slice() {
        return format!(">={}, <={}", strip_v(low), strip_v(high));
    }

    let mut comparators = Vec::with_capacity(tokens.len());
    let mut pending_op: Option<&str> = None;
    for token in tokens {
        if OPERATORS.contains(&token) {
            pending_op = Some(token);
            continue;
        }
        let comparator = match pending_op.take() {
            Some(op) => format!("{op}{}", strip_v(token)),
            // A bare wildcard adds nothing next to other comparators.
            None if matches!(token, "*" | "x" | "X") => continue,
            None => normalize_comparator(token),
        };
        comparators.push(comparator);
    }

    if comparators.is_empty() {
        return "*".to_string();
    }
    comparators.join(", ")
}

fn normalize_comparator(token: &str) -> String {
    let op_len = token
        .find(|c: char| !matches!(c, '<' | '>' | '=' | '~' | '^'))
        .unwrap_or(token.len());
    let (op, version) = token.split_at(op_len);
    let version = strip_v(version);

    if !op.is_empty() {
        return format!("{op}{version}");
    }
    if version.contains(['*', 'x', 'X']) {
        return version.to_string();
    }
    format!("={version}")
}

fn strip_v(version: &str) -> &str {
    version.trim_start_matches(['v', 'V'])
}
