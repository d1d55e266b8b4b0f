//! Manifest command handler.

use anyhow::Result;
use jsmirror_core::Manifest;

use crate::bootstrap::CliContext;
use crate::error::CliError;

/// Regenerate the manifest documents for the destination.
pub async fn execute(ctx: &CliContext) -> Result<Manifest> {
    let pipeline = ctx.pipeline(ctx.mirror_config());
    let manifest = pipeline.regenerate_manifest().await.map_err(CliError::from)?;

    let versions: usize = manifest.entries().iter().map(|e| e.versions.len()).sum();
    println!(
        "Wrote manifest for {} librar{} ({versions} version(s)) under {}",
        manifest.len(),
        if manifest.len() == 1 { "y" } else { "ies" },
        pipeline.config().destination.display()
    );
    Ok(manifest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::test_support::context;
    use jsmirror_core::testing::{FakeCatalog, FakeTransfer};
    use tempfile::TempDir;

    #[tokio::test]
    async fn regenerates_from_tree() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("foo/1.0.0/dist")).unwrap();
        std::fs::write(dir.path().join("foo/1.0.0/dist/foo.js"), "x").unwrap();
        let ctx = context(dir.path(), FakeCatalog::new(), FakeTransfer::new(), None);

        let manifest = execute(&ctx).await.unwrap();

        assert_eq!(manifest.entry("foo").unwrap().files[0].files, ["dist/foo.js"]);
        assert!(dir.path().join("foo/manifest.json").is_file());
    }

    #[tokio::test]
    async fn missing_destination_is_created() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("fresh");
        let ctx = context(&dest, FakeCatalog::new(), FakeTransfer::new(), None);

        let manifest = execute(&ctx).await.unwrap();

        assert!(manifest.is_empty());
        assert_eq!(std::fs::read_to_string(dest.join("manifest.json")).unwrap(), "[]\n");
    }
}
