//! Version resolution against the catalog.

use std::sync::Arc;

use crate::domain::{FilterOutcome, LibraryRequest, Manifest, VersionSelector, VersionSet};
use crate::manifest::ManifestStore;
use crate::ports::{CatalogPort, CatalogResult};

/// Turns a library request into the concrete versions to fetch.
#[derive(Clone)]
pub struct VersionResolver {
    catalog: Arc<dyn CatalogPort>,
}

impl VersionResolver {
    pub fn new(catalog: Arc<dyn CatalogPort>) -> Self {
        Self { catalog }
    }

    /// Resolve a request to versions, minus those already in `manifest`.
    ///
    /// Exact selectors skip the catalog entirely. A selector that cannot be
    /// applied resolves to nothing; only catalog failures are errors.
    pub async fn resolve(
        &self,
        request: &LibraryRequest,
        manifest: Option<&Manifest>,
    ) -> CatalogResult<VersionSet> {
        let name = request.name();

        let candidates = match request.selector() {
            VersionSelector::Exact(version) => VersionSet::new([version.as_str()]),
            selector => {
                let versions = self.catalog.list_versions(name).await?;
                tracing::debug!(
                    library = %name,
                    available = versions.len(),
                    selector = %selector,
                    "Fetched catalog versions"
                );
                match selector.filter(&versions) {
                    FilterOutcome::Matched(set) => set,
                    FilterOutcome::Rejected { reason } => {
                        tracing::warn!(library = %name, %reason, "Version filter rejected");
                        VersionSet::default()
                    }
                }
            }
        };

        Ok(match manifest {
            Some(manifest) => ManifestStore::diff(candidates, manifest.entry(name)),
            None => candidates,
        })
    }
}
