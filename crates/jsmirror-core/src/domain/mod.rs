//! Domain types for the mirror.
//!
//! Pure data types with no I/O:
//!
//! - `library` - what the caller asked for (`LibraryRequest`, descriptors)
//! - `selector` - how a version list is narrowed (`VersionSelector`, `VersionRange`)
//! - `version` - ordered version collections and version ordering
//! - `manifest` - the persisted record of mirrored libraries
//! - `download` - per-file transfer outcomes

mod download;
mod library;
mod manifest;
mod selector;
mod version;

pub use download::{DownloadedFile, FileFailure};
pub use library::{LibraryDescriptor, LibraryDescriptors, LibraryRequest, SelectorSpec};
pub use manifest::{Manifest, ManifestEntry, VersionFiles};
pub use selector::{FilterOutcome, VersionPredicate, VersionRange, VersionSelector};
pub use version::{VersionSet, compare_versions, is_release_version};
