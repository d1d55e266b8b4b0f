//! Upload command handler.

use std::path::Path;

use anyhow::Result;

use crate::bootstrap::CliContext;
use crate::error::CliError;
use crate::storage::load_upload_target;

/// Push the mirror to object storage using the target in `config_path`.
pub async fn execute(ctx: &CliContext, config_path: &Path) -> Result<()> {
    let target = load_upload_target(config_path).map_err(CliError::from)?;
    ctx.pipeline(ctx.mirror_config())
        .upload(&target)
        .await
        .map_err(CliError::from)?;
    println!("Uploaded {} to {}", target.source.display(), target.remote_uri());
    Ok(())
}
