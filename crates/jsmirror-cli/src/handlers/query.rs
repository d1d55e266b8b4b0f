//! Query command handler.
//!
//! Shows what a sync would fetch for one library without downloading.

use anyhow::Result;
use jsmirror_core::{LibraryListing, LibraryRequest};

use crate::bootstrap::CliContext;
use crate::error::CliError;
use crate::handlers::manifest_source;

/// Execute the query command and print the listing.
pub async fn execute(
    ctx: &CliContext,
    library: &str,
    manifest: Option<&str>,
) -> Result<LibraryListing> {
    let request = LibraryRequest::parse_spec(library).map_err(CliError::from)?;

    let mut config = ctx.mirror_config();
    if let Some(source) = manifest_source(manifest) {
        config = config.with_manifest(source);
    }

    let listing = ctx
        .pipeline(config)
        .query(&request)
        .await
        .map_err(CliError::from)?;

    print!("{}", render(&listing));
    Ok(listing)
}

fn render(listing: &LibraryListing) -> String {
    if listing.versions.is_empty() {
        return format!("{}: nothing to fetch\n", listing.library);
    }

    let mut out = format!("{} ({} version(s))\n", listing.library, listing.versions.len());
    for version in &listing.versions {
        match &version.files {
            Ok(files) => {
                out.push_str(&format!("  {} ({} files)\n", version.version, files.len()));
                for file in files {
                    out.push_str(&format!("    {}\n", file.path));
                }
            }
            Err(error) => {
                out.push_str(&format!("  {} (listing failed: {error})\n", version.version));
            }
        }
    }
    out
}
