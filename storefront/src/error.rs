//! Error types for the storefront

use thiserror::Error;

/// Errors returned by the shop API client
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Request could not be sent or the connection failed
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Response body could not be decoded
    #[error("Response parsing failed: {0}")]
    ResponseParseFailed(String),

    /// Server answered with a non-success status
    #[error("API error (status {status}): {message}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Error text from the body, or the status reason
        message: String,
    },
}

/// Errors raised while reading configuration at startup
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A required variable is not set
    #[error("Missing {0} environment variable")]
    Missing(&'static str),

    /// `API_ORIGIN` is not an absolute http(s) URL
    #[error("Invalid API_ORIGIN {origin:?}: {reason}")]
    InvalidOrigin {
        /// The rejected value
        origin: String,
        /// Why it was rejected
        reason: String,
    },
}
