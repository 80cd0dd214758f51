//! Error model used by Tempo API client operations.

use reqwest::StatusCode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, TempoError>;

/// Represents every failure a Tempo API call can surface: classified HTTP statuses, transport failures, local validation and lifecycle errors.
#[derive(Debug, Error)]
pub enum TempoError {
    #[error("Authentication failed. Please check your API token.")]
    Authentication,
    #[error("Access forbidden. Check your API token permissions.")]
    Authorization,
    #[error("Rate limit exceeded. Please try again later.")]
    RateLimited,
    #[error("HTTP {}: {body}", .status.as_u16())]
    Http { status: StatusCode, body: String },
    #[error("API request failed: request timed out: {0}")]
    Timeout(String),
    #[error("API request failed: network error: {0}")]
    Network(String),
    #[error("API request failed: {0}")]
    Request(String),
    #[error("API request failed: invalid JSON response: {0}")]
    Serialization(String),
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("client is closed")]
    Closed,
}

impl TempoError {
    /// Classifies an unsuccessful HTTP status into the matching error variant.
    pub fn from_status(status: StatusCode, body: impl Into<String>) -> Self {
        match status {
            StatusCode::UNAUTHORIZED => TempoError::Authentication,
            StatusCode::FORBIDDEN => TempoError::Authorization,
            StatusCode::TOO_MANY_REQUESTS => TempoError::RateLimited,
            _ => TempoError::Http {
                status,
                body: body.into(),
            },
        }
    }

    /// Returns the HTTP status for status-classified failures.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            TempoError::Authentication => Some(StatusCode::UNAUTHORIZED),
            TempoError::Authorization => Some(StatusCode::FORBIDDEN),
            TempoError::RateLimited => Some(StatusCode::TOO_MANY_REQUESTS),
            TempoError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True for failures below the HTTP status layer (timeouts, connection errors, malformed responses).
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            TempoError::Timeout(_)
                | TempoError::Network(_)
                | TempoError::Request(_)
                | TempoError::Serialization(_)
        )
    }
}

impl From<reqwest::Error> for TempoError {
    /// Converts reqwest errors into transport variants; statuses are classified separately.
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TempoError::Timeout(err.to_string())
        } else if err.is_connect() {
            TempoError::Network(err.to_string())
        } else if err.is_decode() {
            TempoError::Serialization(err.to_string())
        } else {
            TempoError::Request(err.to_string())
        }
    }
}

impl From<serde_json::Error> for TempoError {
    fn from(err: serde_json::Error) -> Self {
        TempoError::Serialization(err.to_string())
    }
}
