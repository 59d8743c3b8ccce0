//! HTTP adapter error types

use thiserror::Error;

use volunteer_domain::errors::DomainError;

/// Result type for HTTP operations
pub type Result<T> = std::result::Result<T, HttpError>;

/// HTTP adapter errors
#[derive(Debug, Error)]
pub enum HttpError {
    /// Network request failed
    #[error("Network request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// Invalid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// HTTP error status
    #[error("HTTP {status}: {message}")]
    HttpStatus {
        status: reqwest::StatusCode,
        message: String,
    },

    /// Response body did not match the expected record
    #[error("Invalid response body: {0}")]
    Decode(String),

    /// Client build error
    #[error("Failed to build HTTP client: {0}")]
    BuildError(String),
}

impl HttpError {
    /// Translate into the engine's taxonomy for the resource that was addressed
    pub fn into_domain(self, entity_type: &str, id: impl ToString) -> DomainError {
        match self {
            HttpError::HttpStatus { status, message } => match status.as_u16() {
                404 => DomainError::not_found(entity_type, id),
                401 | 403 => DomainError::AccessDenied {
                    resource: format!("{} {}", entity_type, id.to_string()),
                },
                400 | 422 => DomainError::validation(entity_type, message),
                _ => DomainError::CollaboratorUnavailable {
                    reason: format!("HTTP {}: {}", status, message),
                },
            },
            other => DomainError::CollaboratorUnavailable {
                reason: other.to_string(),
            },
        }
    }
}
