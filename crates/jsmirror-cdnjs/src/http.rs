//! HTTP backend abstraction for the cdnjs API.
//!
//! The production backend uses reqwest with automatic retry for transient
//! errors. Tests inject a fake backend with canned JSON.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use url::Url;

use crate::error::{CdnjsError, CdnjsResult};
use crate::models::{ApiErrorBody, CdnjsSettings};

// ============================================================================
// HTTP Backend Trait
// ============================================================================

/// Trait for HTTP backends that can fetch JSON from URLs.
///
/// This is an implementation detail - external code should use the
/// `CatalogPort` implementation on `DefaultCdnjsClient`.
#[async_trait]
pub trait HttpBackend: Send + Sync {
    /// Fetch JSON from a URL and deserialize it.
    async fn get_json<T: DeserializeOwned + Send>(&self, url: &Url) -> CdnjsResult<T>;
}

/// Deserialize an API body, surfacing `{"error": true, ...}` bodies as errors.
pub fn parse_api_body<T: DeserializeOwned>(value: serde_json::Value) -> CdnjsResult<T> {
    if let Ok(body) = serde_json::from_value::<ApiErrorBody>(value.clone()) {
        if body.error {
            return Err(CdnjsError::ApiError {
                status: body.status,
                message: body.message.unwrap_or_else(|| "unknown error".to_string()),
            });
        }
    }
    Ok(serde_json::from_value(value)?)
}

// ============================================================================
// Reqwest Backend
// ============================================================================

/// Production HTTP backend using reqwest with retry logic.
///
/// Implements exponential backoff for transient server errors (5xx)
/// and network errors.
pub struct ReqwestBackend {
    client: reqwest::Client,
    max_retries: u8,
    retry_base_delay_ms: u64,
}

impl ReqwestBackend {
    /// Create a new reqwest backend with the given settings.
    pub fn new(settings: &CdnjsSettings) -> CdnjsResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(settings.timeout)
            .user_agent(settings.user_agent.clone())
            .build()?;

        Ok(Self {
            client,
            max_retries: settings.max_retries,
            retry_base_delay_ms: settings.retry_base_delay_ms,
        })
    }

    /// Fetch a URL with automatic retry for transient errors.
    async fn fetch_with_retry(&self, url: &Url) -> CdnjsResult<reqwest::Response> {
        let mut last_error: Option<CdnjsError> = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let delay = Duration::from_millis(
                    self.retry_base_delay_ms * 2u64.pow(u32::from(attempt) - 1),
                );
                tracing::debug!(url = %url, attempt, ?delay, "Retrying cdnjs request");
                tokio::time::sleep(delay).await;
            }

            match self.client.get(url.as_str()).send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        return Ok(response);
                    }

                    // 5xx errors are retryable (server-side issues)
                    if status.is_server_error() && attempt < self.max_retries {
                        last_error = Some(CdnjsError::ApiRequestFailed {
                            status: status.as_u16(),
                            url: url.to_string(),
                        });
                        continue;
                    }

                    // 4xx errors or final attempt - fail immediately
                    return Err(CdnjsError::ApiRequestFailed {
                        status: status.as_u16(),
                        url: url.to_string(),
                    });
                }
                Err(e) => {
                    // Network errors are retryable
                    if attempt < self.max_retries {
                        last_error = Some(e.into());
                        continue;
                    }
                    return Err(e.into());
                }
            }
        }

        // The final attempt always returns above; status 0 marks "no response".
        Err(last_error.unwrap_or_else(|| CdnjsError::ApiRequestFailed {
            status: 0,
            url: url.to_string(),
        }))
    }
}

#[async_trait]
impl HttpBackend for ReqwestBackend {
    async fn get_json<T: DeserializeOwned + Send>(&self, url: &Url) -> CdnjsResult<T> {
        let response = self.fetch_with_retry(url).await?;
        let value: serde_json::Value = response.json().await?;
        parse_api_body(value)
    }
}

// ============================================================================
// Fake Backend for Testing
// ============================================================================


#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::VersionsResponse;
    use serde_json::json;

    #[test]
    fn error_body_is_an_error() {
        let result: CdnjsResult<VersionsResponse> = parse_api_body(json!({
            "error": true,
            "status": 404,
            "message": "Library not found"
        }));
        let Err(CdnjsError::ApiError { status, message }) = result else {
            panic!("expected API error");
        };
        assert_eq!(status, Some(404));
        assert_eq!(message, "Library not found");
    }

    #[test]
    fn regular_body_parses() {
        let parsed: VersionsResponse =
            parse_api_body(json!({"versions": ["1.0.0", "2.0.0"]})).unwrap();
        assert_eq!(parsed.versions, ["1.0.0", "2.0.0"]);
    }

    #[tokio::test]
    async fn unreachable_host_is_a_network_error() {
        let settings = CdnjsSettings {
            max_retries: 0,
            timeout: Duration::from_secs(2),
            ..CdnjsSettings::from_config(&crate::CdnjsConfig::new()).unwrap()
        };
        let backend = ReqwestBackend::new(&settings).unwrap();
        let url = Url::parse("http://127.0.0.1:1/libraries/x").unwrap();

        let result: CdnjsResult<VersionsResponse> = backend.get_json(&url).await;
        assert!(matches!(result, Err(CdnjsError::Network(_))));
    }
}
