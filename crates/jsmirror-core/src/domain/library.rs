//! Library requests.

use serde::{Deserialize, Serialize};

use super::selector::VersionSelector;
use crate::error::ConfigError;

/// A library to mirror together with the versions wanted.
///
/// Immutable once built. The name doubles as the library's directory name
/// under the mirror root, so it must be a single safe path segment.
#[derive(Debug, Clone)]
pub struct LibraryRequest {
    name: String,
    selector: VersionSelector,
}

impl LibraryRequest {
    /// Create a request, validating the library name.
    pub fn new(name: impl Into<String>, selector: VersionSelector) -> Result<Self, ConfigError> {
        let name = name.into().trim().to_string();
        validate_name(&name)?;
        Ok(Self { name, selector })
    }

    /// Request the latest release of a library.
    pub fn latest(name: impl Into<String>) -> Result<Self, ConfigError> {
        Self::new(name, VersionSelector::Latest)
    }

    /// Parse a `name` or `name@selector` spec, e.g. `react@>=18.3.1`.
    pub fn parse_spec(spec: &str) -> Result<Self, ConfigError> {
        let spec = spec.trim();
        match spec.split_once('@') {
            Some((name, selector)) => Self::new(name, selector.parse()?),
            None => Self::latest(spec),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub const fn selector(&self) -> &VersionSelector {
        &self.selector
    }
}

fn validate_name(name: &str) -> Result<(), ConfigError> {
    let invalid = |reason: &str| ConfigError::InvalidLibraryName {
        name: name.to_string(),
        reason: reason.to_string(),
    };

    if name.is_empty() {
        return Err(invalid("name is empty"));
    }
    if name == "." || name == ".." {
        return Err(invalid("name is a relative path"));
    }
    if name.contains(['/', '\\']) {
        return Err(invalid("name contains a path separator"));
    }
    Ok(())
}

/// Serialized library descriptor: `{"name": "react", "version": ">= 18"}`.
///
/// `version` may be a selector string or an array of exact versions, and
/// defaults to `latest` when omitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryDescriptor {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<SelectorSpec>,
}

/// Version field of a descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SelectorSpec {
    One(String),
    Many(Vec<String>),
}

impl TryFrom<LibraryDescriptor> for LibraryRequest {
    type Error = ConfigError;

    fn try_from(descriptor: LibraryDescriptor) -> Result<Self, Self::Error> {
        let selector = match descriptor.version {
            None => VersionSelector::Latest,
            Some(SelectorSpec::One(s)) => s.parse()?,
            Some(SelectorSpec::Many(list)) => VersionSelector::List(list),
        };
        Self::new(descriptor.name, selector)
    }
}

/// One descriptor or a list of them, as accepted in library files.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum LibraryDescriptors {
    One(LibraryDescriptor),
    Many(Vec<LibraryDescriptor>),
}

impl LibraryDescriptors {
    /// Convert every descriptor into a request, failing on the first bad one.
    pub fn into_requests(self) -> Result<Vec<LibraryRequest>, ConfigError> {
        let descriptors = match self {
            Self::One(d) => vec![d],
            Self::Many(ds) => ds,
        };
        descriptors.into_iter().map(LibraryRequest::try_from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_spec_defaults_to_latest() {
        let request = LibraryRequest::parse_spec("react").unwrap();
        assert_eq!(request.name(), "react");
        assert!(matches!(request.selector(), VersionSelector::Latest));
    }

    #[test]
    fn parse_spec_with_selector() {
        let request = LibraryRequest::parse_spec("react-dom@>= 18.3.1").unwrap();
        assert_eq!(request.name(), "react-dom");
        assert!(matches!(request.selector(), VersionSelector::Range(_)));

        let request = LibraryRequest::parse_spec("lodash@4.17.21").unwrap();
        assert!(matches!(request.selector(), VersionSelector::Exact(v) if v == "4.17.21"));
    }

    #[test]
    fn rejects_unsafe_names() {
        for name in ["", "..", "a/b", "a\\b"] {
            assert!(matches!(
                LibraryRequest::latest(name),
                Err(ConfigError::InvalidLibraryName { .. })
            ));
        }
    }

    #[test]
    fn descriptors_accept_single_object_and_arrays() {
        let one: LibraryDescriptors = serde_json::from_str(r#"{"name": "lit"}"#).unwrap();
        let requests = one.into_requests().unwrap();
        assert_eq!(requests.len(), 1);
        assert!(matches!(requests[0].selector(), VersionSelector::Latest));

        let many: LibraryDescriptors = serde_json::from_str(
            r#"[
                {"name": "react", "version": ">= 18.3.1"},
                {"name": "vue", "version": ["3.5.13", "3.5.12"]}
            ]"#,
        )
        .unwrap();
        let requests = many.into_requests().unwrap();
        assert_eq!(requests.len(), 2);
        assert!(matches!(requests[0].selector(), VersionSelector::Range(_)));
        assert!(matches!(requests[1].selector(), VersionSelector::List(l) if l.len() == 2));
    }

    #[test]
    fn bad_descriptor_selector_is_a_config_error() {
        let descriptor = LibraryDescriptor {
            name: "react".to_string(),
            version: Some(SelectorSpec::One("not a version".to_string())),
        };
        assert!(matches!(
            LibraryRequest::try_from(descriptor),
            Err(ConfigError::InvalidSelector { .. })
        ));
    }
}
