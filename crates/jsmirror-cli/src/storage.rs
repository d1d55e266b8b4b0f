//! Storage sync adapter that shells out to an object-storage sync tool.
//!
//! The default program is `ossutil`; an upload target may name another
//! binary that accepts the same arguments. Credentials reach the child
//! through its environment so they never show up in the process table.

use std::ffi::OsString;
use std::path::Path;

use async_trait::async_trait;
use jsmirror_core::{ConfigError, StorageSyncPort, UploadError, UploadTarget};
use tokio::process::Command;

/// Program run when the upload target does not name one.
pub const DEFAULT_SYNC_PROGRAM: &str = "ossutil";

/// Environment variable carrying the access key id.
pub const ACCESS_KEY_ID_ENV: &str = "OSS_ACCESS_KEY_ID";

/// Environment variable carrying the access key secret.
pub const ACCESS_KEY_SECRET_ENV: &str = "OSS_ACCESS_KEY_SECRET";

/// `StorageSyncPort` running `<program> sync <source> oss://<bucket>/<dest>`.
#[derive(Debug, Clone)]
pub struct CommandStorageSync {
    program: String,
}

impl Default for CommandStorageSync {
    fn default() -> Self {
        Self::new(DEFAULT_SYNC_PROGRAM)
    }
}

impl CommandStorageSync {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn program_for<'a>(&'a self, target: &'a UploadTarget) -> &'a str {
        target.command.as_deref().unwrap_or(&self.program)
    }

    /// Arguments passed to the sync program. Never includes credentials.
    pub fn build_args(target: &UploadTarget) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "sync".into(),
            target.source.clone().into_os_string(),
            target.remote_uri().into(),
            "--force".into(),
        ];
        if target.incremental_mode {
            args.push("--update".into());
        }
        if let Some(endpoint) = &target.endpoint {
            args.extend(["--endpoint".into(), endpoint.into()]);
        }
        args
    }

    /// Environment handed to the sync program for the target's credentials.
    pub fn credential_env(target: &UploadTarget) -> Vec<(&'static str, &str)> {
        let mut env = Vec::new();
        if let Some(id) = &target.access_key_id {
            env.push((ACCESS_KEY_ID_ENV, id.as_str()));
        }
        if let Some(secret) = &target.secret_access_key {
            env.push((ACCESS_KEY_SECRET_ENV, secret.as_str()));
        }
        env
    }
}

#[async_trait]
impl StorageSyncPort for CommandStorageSync {
    async fn sync(&self, target: &UploadTarget) -> Result<(), UploadError> {
        let program = self.program_for(target);
        tracing::debug!(
            program = %program,
            remote = %target.remote_uri(),
            incremental = target.incremental_mode,
            "Running storage sync"
        );

        let status = Command::new(program)
            .args(Self::build_args(target))
            .envs(Self::credential_env(target))
            .status()
            .await
            .map_err(|e| UploadError::Spawn {
                program: program.to_string(),
                message: e.to_string(),
            })?;

        if !status.success() {
            return Err(UploadError::Failed {
                program: program.to_string(),
                status: status.to_string(),
            });
        }
        Ok(())
    }
}

/// Read an upload target document.
///
/// Missing files and malformed JSON are configuration errors.
pub fn load_upload_target(path: &Path) -> Result<UploadTarget, ConfigError> {
    let invalid = |message: String| ConfigError::UploadConfig {
        path: path.to_path_buf(),
        message,
    };
    let bytes = std::fs::read(path).map_err(|e| invalid(e.to_string()))?;
    let target: UploadTarget =
        serde_json::from_slice(&bytes).map_err(|e| invalid(e.to_string()))?;
    if target.bucket.trim().is_empty() {
        return Err(invalid("bucket is empty".to_string()));
    }
    Ok(target)
}
