//! Cloud provider error types

use thiserror::Error;

/// Cloud provider errors
#[derive(Error, Debug)]
pub enum CloudError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The provider refused the request as unprocessable
    /// (e.g. shutting down a droplet that is already off).
    #[error("Unprocessable request: {0}")]
    Unprocessable(String),

    #[error("API error ({status} {id}): {message}")]
    Api {
        status: u16,
        id: String,
        message: String,
    },

    #[error("Action {action} failed: {reason}")]
    ActionFailed { action: String, reason: String },

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CloudError>;
