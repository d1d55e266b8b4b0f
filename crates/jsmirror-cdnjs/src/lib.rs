#![doc = include_str!("../README.md")]
#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]
// DefaultCdnjsClient is meant to be used through CatalogPort, not its
// internal generic structure
#![allow(private_interfaces)]

mod client;
mod config;
mod error;
mod http;
mod models;
mod port;
mod transfer;
mod url;

// ============================================================================
// Public API
// ============================================================================

// Catalog
pub use client::DefaultCdnjsClient;

// Transfer
pub use transfer::HttpTransfer;

// Configuration
pub use config::{CdnjsConfig, DEFAULT_API_URL, DEFAULT_CDN_URL};

// Errors
pub use error::{CdnjsError, CdnjsResult};
