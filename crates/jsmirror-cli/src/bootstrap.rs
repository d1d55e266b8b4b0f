//! CLI bootstrap - the composition root.
//!
//! This module is the ONLY place where infrastructure is wired together
//! for the CLI adapter:
//! - cdnjs catalog client and HTTP transfer (via jsmirror-cdnjs)
//! - command-driven storage sync (via [`crate::storage`])
//!
//! Command handlers receive a `CliContext` and build pipelines from it.

use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use jsmirror_cdnjs::{CdnjsConfig, DefaultCdnjsClient, HttpTransfer};
use jsmirror_core::{ConfigError, MirrorConfig, MirrorDeps, MirrorPipeline};
use tracing_subscriber::EnvFilter;

use crate::error::CliError;
use crate::parser::Cli;
use crate::storage::CommandStorageSync;

/// Bootstrap configuration taken from global CLI options.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub destination: PathBuf,
    pub concurrency: NonZeroUsize,
    pub cdnjs: CdnjsConfig,
}

impl CliConfig {
    /// Validate global options.
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let concurrency = NonZeroUsize::new(cli.concurrency).ok_or(ConfigError::InvalidConcurrency {
            value: cli.concurrency,
        })?;

        let mut cdnjs = CdnjsConfig::new();
        if let Some(api_url) = &cli.api_url {
            cdnjs = cdnjs.with_api_url(api_url);
        }
        if let Some(cdn_url) = &cli.cdn_url {
            cdnjs = cdnjs.with_cdn_url(cdn_url);
        }

        Ok(Self {
            destination: cli.dest.clone(),
            concurrency,
            cdnjs,
        })
    }
}

/// Fully composed context for CLI commands.
pub struct CliContext {
    /// Destination and pool width; per-command options are layered on top.
    pub config: MirrorConfig,
    pub deps: MirrorDeps,
}

impl CliContext {
    /// Base mirror configuration for this invocation.
    pub fn mirror_config(&self) -> MirrorConfig {
        self.config.clone()
    }

    /// Pipeline running `config` against the wired adapters.
    pub fn pipeline(&self, config: MirrorConfig) -> MirrorPipeline {
        MirrorPipeline::new(config, self.deps.clone())
    }
}

/// Install the tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise `info`, or `debug` with `--verbose`.
pub fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .try_init()
        .ok(); // Ignore error if already initialized
}

/// Build the CLI context.
///
/// This is the composition root: the cdnjs client serves as catalog, the
/// reqwest transfer moves files and manifests, and `ossutil` handles uploads.
pub fn bootstrap(config: CliConfig) -> Result<CliContext> {
    let catalog =
        DefaultCdnjsClient::new(&config.cdnjs).map_err(|e| CliError::Config(e.to_string()))?;
    let transfer =
        HttpTransfer::new(&config.cdnjs).map_err(|e| CliError::Config(e.to_string()))?;

    tracing::debug!(
        destination = %config.destination.display(),
        concurrency = config.concurrency.get(),
        "Bootstrapped mirror context"
    );

    Ok(CliContext {
        config: MirrorConfig::new(config.destination).with_concurrency(config.concurrency),
        deps: MirrorDeps {
            catalog: Arc::new(catalog),
            transfer: Arc::new(transfer),
            storage: Some(Arc::new(CommandStorageSync::default())),
        },
    })
}
