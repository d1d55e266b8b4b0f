//! Main CLI parser and top-level argument handling.
//!
//! This module defines the root CLI structure with global options.

use std::path::PathBuf;

use clap::Parser;
use jsmirror_core::{DEFAULT_CONCURRENCY, DEFAULT_DESTINATION};

use crate::commands::Commands;

/// Command-line interface for mirroring cdnjs libraries.
#[derive(Parser)]
#[command(name = "jsmirror")]
#[command(about = "Mirror JavaScript libraries from cdnjs into a local tree")]
#[command(version)]
pub struct Cli {
    /// Mirror root directory
    #[arg(
        short = 'd',
        long = "dest",
        env = "JSMIRROR_DEST",
        global = true,
        default_value = DEFAULT_DESTINATION
    )]
    pub dest: PathBuf,

    /// Maximum concurrent listings and downloads
    #[arg(
        short = 'j',
        long,
        env = "JSMIRROR_CONCURRENCY",
        global = true,
        default_value_t = DEFAULT_CONCURRENCY
    )]
    pub concurrency: usize,

    /// cdnjs API root
    #[arg(long = "api-url", env = "JSMIRROR_API_URL", global = true)]
    pub api_url: Option<String>,

    /// CDN root files are downloaded from
    #[arg(long = "cdn-url", env = "JSMIRROR_CDN_URL", global = true)]
    pub cdn_url: Option<String>,

    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}
