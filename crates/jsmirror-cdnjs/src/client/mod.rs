//! cdnjs client for listing library versions and files.

mod library;

use crate::config::CdnjsConfig;
use crate::error::CdnjsResult;
use crate::http::{HttpBackend, ReqwestBackend};
use crate::models::CdnjsSettings;

// ============================================================================
// Type Aliases
// ============================================================================

/// Default cdnjs client using the reqwest HTTP backend.
pub type DefaultCdnjsClient = CdnjsClient<ReqwestBackend>;

// ============================================================================
// Client
// ============================================================================

/// Client for the cdnjs API.
///
/// Generic over the HTTP backend so tests can swap in canned responses.
/// Use `DefaultCdnjsClient::new()` in production code.
pub struct CdnjsClient<B: HttpBackend> {
    pub(crate) backend: B,
    pub(crate) settings: CdnjsSettings,
}

impl DefaultCdnjsClient {
    /// Create a new client with the given configuration.
    ///
    /// Fails when the API URL does not parse or the HTTP client cannot be built.
    pub fn new(config: &CdnjsConfig) -> CdnjsResult<Self> {
        let settings = CdnjsSettings::from_config(config)?;
        let backend = ReqwestBackend::new(&settings)?;
        Ok(Self { backend, settings })
    }

    /// Create a new client against the public cdnjs endpoints.
    pub fn default_client() -> CdnjsResult<Self> {
        Self::new(&CdnjsConfig::default())
    }
}

impl<B: HttpBackend> CdnjsClient<B> {
    /// Create a new client with a custom backend.
    #[cfg(test)]
    pub(crate) const fn with_backend(settings: CdnjsSettings, backend: B) -> Self {
        Self { backend, settings }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub fn test_settings() -> CdnjsSettings {
        CdnjsSettings::from_config(&CdnjsConfig::new()).unwrap()
    }

    #[test]
    fn default_client_builds() {
        assert!(DefaultCdnjsClient::default_client().is_ok());
    }

    #[test]
    fn invalid_api_url_fails_construction() {
        let config = CdnjsConfig::new().with_api_url("::nope::");
        assert!(DefaultCdnjsClient::new(&config).is_err());
    }
}
