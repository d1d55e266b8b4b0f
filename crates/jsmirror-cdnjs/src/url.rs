//! URL construction for the cdnjs API and CDN.

use url::Url;

use crate::error::{CdnjsError, CdnjsResult};
use crate::models::CdnjsSettings;

/// Append path segments to the API base, percent-encoding each one.
fn api_url(settings: &CdnjsSettings, segments: &[&str], query: &str) -> CdnjsResult<Url> {
    let mut url = settings.api_url.clone();
    url.path_segments_mut()
        .map_err(|()| CdnjsError::UnsupportedUrl(settings.api_url.to_string()))?
        .pop_if_empty()
        .extend(segments);
    url.set_query(Some(query));
    Ok(url)
}

/// `{api}/libraries/{name}?fields=versions`
pub fn build_versions_url(settings: &CdnjsSettings, name: &str) -> CdnjsResult<Url> {
    api_url(settings, &["libraries", name], "fields=versions")
}

/// `{api}/libraries/{name}/{version}?fields=name,version,files`
pub fn build_files_url(settings: &CdnjsSettings, name: &str, version: &str) -> CdnjsResult<Url> {
    api_url(
        settings,
        &["libraries", name, version],
        "fields=name,version,files",
    )
}

/// `{cdn}/{name}/{version}/{path}`
pub fn build_file_url(settings: &CdnjsSettings, name: &str, version: &str, path: &str) -> String {
    format!(
        "{}/{name}/{version}/{}",
        settings.cdn_url,
        path.trim_start_matches('/')
    )
}
