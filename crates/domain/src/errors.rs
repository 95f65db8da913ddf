//! Error types used throughout the client

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for the WeCom client
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum WecomError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Non-zero `errcode` reported inside a response body or a result record.
    #[error("Service error {code}: {message}")]
    Service { code: i64, message: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl WecomError {
    /// Build a service error, falling back to a generic message when the
    /// service sent an empty `errmsg`.
    pub fn service(code: i64, message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.is_empty() {
            format!("request error with code {code}")
        } else {
            message
        };
        Self::Service { code, message }
    }
}

/// Result type alias for WeCom operations
pub type Result<T> = std::result::Result<T, WecomError>;
