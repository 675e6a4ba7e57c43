//! Adapter construction errors

use thiserror::Error;

/// Result type for building clients
pub type Result<T> = std::result::Result<T, OpenStackError>;

/// Failures while setting up a client. Request failures are reported through
/// the port error types instead.
#[derive(Debug, Error)]
pub enum OpenStackError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid auth token: {0}")]
    InvalidToken(String),

    #[error("Failed to create client: {0}")]
    Client(#[from] reqwest::Error),
}
