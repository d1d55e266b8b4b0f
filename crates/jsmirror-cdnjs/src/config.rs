//! Public configuration for the cdnjs adapter.
//!
//! The internal settings used by the client and transfer are derived from this.

use std::time::Duration;

/// Default cdnjs API root.
pub const DEFAULT_API_URL: &str = "https://api.cdnjs.com";

/// Default CDN root serving library files.
pub const DEFAULT_CDN_URL: &str = "https://cdnjs.cloudflare.com/ajax/libs";

/// Configuration for the cdnjs client and HTTP transfer.
///
/// # Example
///
/// ```
/// use jsmirror_cdnjs::CdnjsConfig;
/// use std::time::Duration;
///
/// let config = CdnjsConfig::new()
///     .with_timeout(Duration::from_secs(60))
///     .with_user_agent("my-mirror/1.0");
/// ```
#[derive(Debug, Clone)]
pub struct CdnjsConfig {
    /// Base URL for the cdnjs API
    pub(crate) api_url: String,
    /// Base URL for file downloads
    pub(crate) cdn_url: String,
    /// User agent string for HTTP requests
    pub(crate) user_agent: String,
    /// Request timeout for API calls, connect timeout for transfers
    pub(crate) timeout: Duration,
    /// Maximum number of retry attempts for transient API errors
    pub(crate) max_retries: u8,
    /// Base delay for exponential backoff
    pub(crate) retry_base_delay: Duration,
}

impl Default for CdnjsConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            cdn_url: DEFAULT_CDN_URL.to_string(),
            user_agent: concat!("jsmirror/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout: Duration::from_secs(30),
            max_retries: 3,
            retry_base_delay: Duration::from_millis(500),
        }
    }
}

impl CdnjsConfig {
    /// Create a new configuration with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the API base URL.
    ///
    /// Defaults to `https://api.cdnjs.com`.
    #[must_use]
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    /// Set the CDN base URL files are downloaded from.
    ///
    /// Defaults to `https://cdnjs.cloudflare.com/ajax/libs`.
    #[must_use]
    pub fn with_cdn_url(mut self, url: impl Into<String>) -> Self {
        self.cdn_url = url.into();
        self
    }

    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the request timeout.
    ///
    /// Defaults to 30 seconds.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Defaults to 3 retries.
    #[must_use]
    pub const fn with_max_retries(mut self, retries: u8) -> Self {
        self.max_retries = retries;
        self
    }

    /// Set the base delay for exponential backoff retries.
    ///
    /// Defaults to 500ms.
    #[must_use]
    pub const fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_base_delay = delay;
        self
    }
}
