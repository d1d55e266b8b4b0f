//! Sync command handler.
//!
//! Mirrors the requested libraries, prints a per-library summary and
//! optionally uploads the result.

use std::path::{Path, PathBuf};

use anyhow::Result;
use jsmirror_core::{
    LibraryDescriptors, LibraryOutcome, LibraryRequest, LibraryStatus, SyncReport, VersionOutcome,
};

use crate::bootstrap::CliContext;
use crate::error::CliError;
use crate::handlers::manifest_source;
use crate::storage::load_upload_target;

/// Arguments for the sync command.
pub struct SyncArgs {
    pub libraries: Vec<String>,
    pub libs_file: Option<PathBuf>,
    pub manifest: Option<String>,
    pub upload: Option<PathBuf>,
}

/// Execute the sync command.
///
/// Returns the finished report; the caller decides the exit status from
/// [`SyncReport::is_clean`].
///
/// # Errors
///
/// Fails when no library is given, a library spec or file is invalid, the
/// upload target cannot be read, or the pipeline hits a fatal error.
pub async fn execute(ctx: &CliContext, args: SyncArgs) -> Result<SyncReport> {
    let requests = collect_requests(&args.libraries, args.libs_file.as_deref())?;

    let mut config = ctx.mirror_config();
    if let Some(source) = manifest_source(args.manifest.as_deref()) {
        config = config.with_manifest(source);
    }
    if let Some(path) = &args.upload {
        config = config.with_upload(load_upload_target(path).map_err(CliError::from)?);
    }

    let report = ctx
        .pipeline(config)
        .run(&requests)
        .await
        .map_err(CliError::from)?;

    for outcome in &report.libraries {
        println!("{}", describe(outcome));
    }
    println!(
        "\n{} version(s), {} file(s) downloaded, {} failure(s)",
        report.versions_fetched(),
        report.files_downloaded(),
        report.failure_count()
    );
    Ok(report)
}

/// Library specs from the command line followed by those in `libs_file`.
pub fn collect_requests(
    specs: &[String],
    libs_file: Option<&Path>,
) -> Result<Vec<LibraryRequest>, CliError> {
    let mut requests = specs
        .iter()
        .map(|spec| LibraryRequest::parse_spec(spec))
        .collect::<Result<Vec<_>, _>>()?;

    if let Some(path) = libs_file {
        let text = std::fs::read_to_string(path)
            .map_err(|e| CliError::Io(format!("{}: {e}", path.display())))?;
        let descriptors: LibraryDescriptors = serde_json::from_str(&text)
            .map_err(|e| CliError::Arguments(format!("{}: {e}", path.display())))?;
        requests.extend(descriptors.into_requests()?);
    }

    if requests.is_empty() {
        return Err(CliError::Arguments(
            "no libraries given; pass NAME[@SELECTOR] or --libs FILE".to_string(),
        ));
    }
    Ok(requests)
}

/// One summary line for a library.
fn describe(outcome: &LibraryOutcome) -> String {
    match &outcome.status {
        LibraryStatus::Skipped { reason } => format!("{:<24} skipped: {reason}", outcome.library),
        LibraryStatus::UpToDate => format!("{:<24} up to date", outcome.library),
        LibraryStatus::Synced { versions } => {
            let parts: Vec<String> = versions
                .iter()
                .map(|v| match v {
                    VersionOutcome::Complete { version, downloaded } => {
                        format!("{version} ({} files)", downloaded.len())
                    }
                    VersionOutcome::Incomplete {
                        version,
                        downloaded,
                        failures,
                    } => format!(
                        "{version} ({} files, {} failed)",
                        downloaded.len(),
                        failures.len()
                    ),
                    VersionOutcome::ListingFailed { version, .. } => {
                        format!("{version} (listing failed)")
                    }
                })
                .collect();
            format!("{:<24} {}", outcome.library, parts.join(", "))
        }
    }
}
