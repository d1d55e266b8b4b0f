//! Command handlers.
//!
//! Handlers follow one pattern:
//! - Signature: `pub async fn execute(ctx: &CliContext, ...) -> Result<...>`
//! - Parse CLI-specific input, run the pipeline, format output for the terminal
//!
//! Mirroring logic stays in `jsmirror-core`.

pub mod manifest;
pub mod query;
pub mod sync;
pub mod upload;

use jsmirror_core::ManifestSource;

/// Manifest option shared by `sync` and `query`.
pub(crate) fn manifest_source(value: Option<&str>) -> Option<ManifestSource> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(ManifestSource::parse)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_manifest_option_is_ignored() {
        assert!(manifest_source(None).is_none());
        assert!(manifest_source(Some("  ")).is_none());
        assert!(matches!(
            manifest_source(Some("https://mirror.example/manifest.json")),
            Some(ManifestSource::Url(_))
        ));
    }
}
