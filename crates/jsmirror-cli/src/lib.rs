#![doc = include_str!("../README.md")]
#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

// Silence unused dev-dependency warnings
#[cfg(test)]
use tokio_test as _;

// Used by the binary only
use dotenvy as _;

pub mod bootstrap;
pub mod commands;
pub mod error;
pub mod handlers;
pub mod parser;
pub mod storage;

// Re-export primary types for convenient access
pub use bootstrap::{CliConfig, CliContext, bootstrap, init_tracing};
pub use commands::{Commands, DEFAULT_UPLOAD_CONFIG};
pub use error::{CliError, exit_code_for};
pub use parser::Cli;
pub use storage::{CommandStorageSync, DEFAULT_SYNC_PROGRAM, load_upload_target};
