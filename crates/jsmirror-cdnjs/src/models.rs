//! Internal settings and cdnjs API response shapes.

use std::time::Duration;

use serde::Deserialize;
use url::Url;

use crate::config::CdnjsConfig;
use crate::error::CdnjsResult;

/// Internal configuration derived from [`CdnjsConfig`].
#[derive(Debug, Clone)]
pub struct CdnjsSettings {
    pub api_url: Url,
    /// CDN root without a trailing slash.
    pub cdn_url: String,
    pub user_agent: String,
    pub timeout: Duration,
    pub max_retries: u8,
    pub retry_base_delay_ms: u64,
}

impl CdnjsSettings {
    pub fn from_config(config: &CdnjsConfig) -> CdnjsResult<Self> {
        Ok(Self {
            api_url: Url::parse(&config.api_url)?,
            cdn_url: config.cdn_url.trim_end_matches('/').to_string(),
            user_agent: config.user_agent.clone(),
            timeout: config.timeout,
            max_retries: config.max_retries,
            // Duration milliseconds won't exceed u64 in practice
            #[allow(clippy::cast_possible_truncation)]
            retry_base_delay_ms: config.retry_base_delay.as_millis() as u64,
        })
    }
}

/// `GET /libraries/{name}?fields=versions`
#[derive(Debug, Deserialize)]
pub struct VersionsResponse {
    #[serde(default)]
    pub versions: Vec<String>,
}

/// `GET /libraries/{name}/{version}?fields=name,version,files`
#[derive(Debug, Deserialize)]
pub struct FilesResponse {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub files: Vec<String>,
}

/// Error body cdnjs returns, sometimes with a 200 status.
#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    pub error: bool,
    #[serde(default)]
    pub status: Option<u16>,
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_trim_cdn_slash() {
        let config = CdnjsConfig::new().with_cdn_url("https://cdn.example/libs/");
        let settings = CdnjsSettings::from_config(&config).unwrap();
        assert_eq!(settings.cdn_url, "https://cdn.example/libs");
        assert_eq!(settings.retry_base_delay_ms, 500);
    }

    #[test]
    fn bad_api_url_is_rejected() {
        let config = CdnjsConfig::new().with_api_url("not a url");
        assert!(CdnjsSettings::from_config(&config).is_err());
    }

    #[test]
    fn files_response_tolerates_missing_fields() {
        let parsed: FilesResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.files.is_empty());
        assert!(parsed.name.is_none());
    }
}
