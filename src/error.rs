// Error types for icondeck.
// Handles GitHub API errors, cache errors, and general application errors.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("GitHub API error: {0}")]
    Api(#[from] reqwest::Error),

    #[error("Authentication failed: invalid or expired token")]
    Unauthorized,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Rate limit exceeded, resets at {reset_at}")]
    RateLimited { reset_at: String },

    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Unexpected response shape from {endpoint}: {source}")]
    Schema {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl CatalogError {
    /// Whether a retry has a chance of succeeding.
    /// Connection failures, timeouts, 5xx and rate limiting are transient;
    /// every other client error and every decode error is permanent.
    pub fn is_retryable(&self) -> bool {
        match self {
            CatalogError::Api(e) => {
                if let Some(status) = e.status() {
                    status.is_server_error() || status.as_u16() == 429
                } else {
                    e.is_connect() || e.is_timeout() || e.is_request() || e.is_body()
                }
            }
            CatalogError::RateLimited { .. } => true,
            CatalogError::Http { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;
