//! Error types for the email service client.

use thiserror::Error;

/// Result type for email client operations.
pub type Result<T> = std::result::Result<T, EmailError>;

/// Email service client errors.
#[derive(Debug, Error)]
pub enum EmailError {
    /// Network error (connection refused, timeout, DNS)
    #[error("Network error: {0}")]
    Network(String),

    /// The service answered with a non-2xx status
    #[error("API error ({status}): {body}")]
    Api { status: u16, body: String },

    /// Response body was not the expected JSON
    #[error("Parse error: {0}")]
    Parse(String),
}

impl EmailError {
    /// HTTP status code for API errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            EmailError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}
