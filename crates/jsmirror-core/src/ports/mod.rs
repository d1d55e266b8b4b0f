//! Port definitions (trait abstractions) for external systems.
//!
//! Ports define the interfaces the mirror core expects from infrastructure.
//! They use only domain types; adapters (`jsmirror-cdnjs`, the CLI's storage
//! sync) implement them.
//!
//! # Design Rules
//!
//! - No HTTP client types in any signature
//! - Catalog lookups and file transfers are separate ports so tests can fake
//!   them independently
//! - Storage sync is a single intent-based call

pub mod catalog;
pub mod storage;
pub mod transfer;

pub use catalog::{CatalogError, CatalogPort, CatalogResult, RemoteFile};
pub use storage::{StorageSyncPort, UploadError, UploadTarget};
pub use transfer::TransferPort;
