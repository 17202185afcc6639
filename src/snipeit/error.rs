//! Error types for asset service operations.

use thiserror::Error;

/// Errors raised by the Snipe-IT API or the transport beneath it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// 401: the API key was rejected.
    #[error("Authentication failed: check the API key")]
    Authentication,

    /// 403: the key lacks the permission for this call.
    #[error("Permission denied for {0}")]
    PermissionDenied(String),

    /// 404: endpoint or record does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// 429: the service is throttling this client.
    #[error("Rate limited by asset service")]
    RateLimited,

    /// 5xx response.
    #[error("Server error {status}: {message}")]
    Server { status: u16, message: String },

    /// Any other non-success HTTP status.
    #[error("Request failed with status {status}: {message}")]
    Upstream { status: u16, message: String },

    /// DNS, TLS or connection failure.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Request exceeded the configured timeout.
    #[error("Request timeout after {0}s")]
    Timeout(u64),

    /// HTTP 200 with `"status": "error"` in the body.
    #[error("Rejected by asset service: {0}")]
    Rejected(String),

    /// Body doesn't match the expected shape.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Client could not be built from its settings.
    #[error("Configuration error: {0}")]
    Configuration(String),
}
