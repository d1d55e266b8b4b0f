//! Error types for cdnjs operations.
//!
//! Catalog errors are mapped to the core `CatalogError` at the port boundary.

use thiserror::Error;

/// Result type alias for cdnjs operations.
pub type CdnjsResult<T> = Result<T, CdnjsError>;

/// Errors related to the cdnjs API.
#[derive(Debug, Error)]
pub enum CdnjsError {
    /// API request failed with an HTTP error status.
    #[error("cdnjs API request failed with status {status}: {url}")]
    ApiRequestFailed {
        /// HTTP status code
        status: u16,
        /// The URL that was requested
        url: String,
    },

    /// The API answered successfully but reported an error in the body.
    #[error("cdnjs API error: {message}")]
    ApiError {
        /// Status reported in the body, if any
        status: Option<u16>,
        /// Message from the response body
        message: String,
    },

    /// Network or HTTP client error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The URL cannot carry path segments (e.g. `mailto:`).
    #[error("URL cannot be used as an API base: {0}")]
    UnsupportedUrl(String),

    /// JSON parsing error.
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),
}
