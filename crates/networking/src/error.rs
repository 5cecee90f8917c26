//! Errors returned by the moderation service client

use thiserror::Error;

/// HTTP statuses worth retrying
const TRANSIENT_STATUSES: &[u16] = &[408, 425, 429, 500, 502, 503, 504, 522, 524];

/// Moderation service errors
///
/// None of these ever mean "not flagged": callers must block the submission
/// and ask the user to try again.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Connection or transport failure
    #[error("Network error: {0}")]
    Network(String),

    /// Request exceeded the configured timeout
    #[error("Request timed out")]
    Timeout,

    /// The service answered with a non-success status
    #[error("Moderation service returned {status}: {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Response body or reason
        message: String,
    },

    /// The response body was not the expected JSON
    #[error("Failed to parse moderation response: {0}")]
    Parse(String),
}

impl ServiceError {
    /// Check if the error is transient and the request may succeed later
    pub fn is_retryable(&self) -> bool {
        match self {
            ServiceError::Network(_) | ServiceError::Timeout => true,
            ServiceError::Api { status, .. } => TRANSIENT_STATUSES.contains(status),
            ServiceError::Parse(_) => false,
        }
    }

    /// HTTP status, if the service answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            ServiceError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ServiceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ServiceError::Timeout
        } else if err.is_decode() {
            ServiceError::Parse(err.to_string())
        } else {
            ServiceError::Network(err.to_string())
        }
    }
}

/// Result type for moderation service calls
pub type Result<T> = std::result::Result<T, ServiceError>;
