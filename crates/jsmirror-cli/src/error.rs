//! CLI-specific error types and mappings.
//!
//! Maps `MirrorError` onto exit codes and user-facing messages.

use jsmirror_core::{ConfigError, MirrorError};
use thiserror::Error;

/// CLI-specific error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Argument error not caught by clap (e.g. no libraries given).
    #[error("Invalid arguments: {0}")]
    Arguments(String),

    /// IO error (file not found, permission denied, etc.).
    #[error("IO error: {0}")]
    Io(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The storage sync step failed.
    #[error("Upload failed: {0}")]
    Upload(String),

    /// Anything else from the pipeline.
    #[error("{0}")]
    Core(String),
}

impl CliError {
    /// Map error to appropriate exit code.
    ///
    /// Exit codes follow Unix conventions:
    /// - 1: General error
    /// - 2: Misuse of shell command (invalid arguments)
    /// - 64-78: Reserved for specific error categories (see sysexits.h)
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Core(_) => 1,
            Self::Arguments(_) => 2,
            Self::Upload(_) => 69, // EX_UNAVAILABLE
            Self::Io(_) => 74,     // EX_IOERR
            Self::Config(_) => 78, // EX_CONFIG
        }
    }
}

impl From<MirrorError> for CliError {
    fn from(err: MirrorError) -> Self {
        match err {
            MirrorError::Config(
                ConfigError::InvalidSelector { .. } | ConfigError::InvalidLibraryName { .. },
            ) => Self::Arguments(err.to_string()),
            MirrorError::Config(_) => Self::Config(err.to_string()),
            MirrorError::Filesystem(_) => Self::Io(err.to_string()),
            MirrorError::Upload(_) => Self::Upload(err.to_string()),
            MirrorError::Download(_) | MirrorError::Catalog(_) => Self::Core(err.to_string()),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        MirrorError::from(err).into()
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

/// Exit code for an error that reached `main`.
pub fn exit_code_for(err: &anyhow::Error) -> u8 {
    err.downcast_ref::<CliError>().map_or(1, CliError::exit_code)
}
