//! API-specific error types
//!
//! Provides error classification for API operations with retry metadata.
//! Service-reported `errcode` values are classified alongside HTTP failures.

use std::time::Duration;

use thiserror::Error;
use wecom_common::{CommonError, ErrorClassification, ErrorSeverity};
use wecom_domain::constants::{
    ERRCODE_CONCURRENCY_LIMIT, ERRCODE_FREQUENCY_LIMIT, ERRCODE_INVALID_TOKEN,
    ERRCODE_MISSING_TOKEN, ERRCODE_SYSTEM_BUSY, ERRCODE_TOKEN_EXPIRED,
};
use wecom_domain::WecomError;

use crate::errors::InfraError;

/// Categories of API errors for retry logic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorCategory {
    /// Authentication errors (401, 403, token errcodes) - retry after token refresh
    Authentication,
    /// Rate limiting errors (429, frequency errcodes) - retry with backoff
    RateLimit,
    /// Server errors (5xx, system busy) - retryable
    Server,
    /// Client errors (4xx, rejected input) - non-retryable
    Client,
    /// Network/connection errors - retryable
    Network,
    /// Configuration errors - non-retryable
    Config,
}

/// API operation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Rate limit exceeded: {0}")]
    RateLimit(String),

    #[error("Server error: {0}")]
    Server(String),

    #[error("Client error: {0}")]
    Client(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Non-zero `errcode` in a response envelope.
    #[error("Service error {code}: {message}")]
    Service { code: i64, message: String },

    /// Downloaded data failed verification or decryption.
    #[error("Data integrity error: {0}")]
    Integrity(String),

    #[error("Timeout after {0:?}")]
    Timeout(Duration),
}

impl ApiError {
    /// Service error with the standard fallback message.
    pub fn service(code: i64, message: impl Into<String>) -> Self {
        match WecomError::service(code, message) {
            WecomError::Service { code, message } => Self::Service { code, message },
            other => Self::Client(other.to_string()),
        }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Get the error category for this error
    pub fn category(&self) -> ApiErrorCategory {
        match self {
            Self::Auth(_) => ApiErrorCategory::Authentication,
            Self::RateLimit(_) => ApiErrorCategory::RateLimit,
            Self::Server(_) => ApiErrorCategory::Server,
            Self::Client(_) | Self::InvalidInput(_) | Self::Integrity(_) => {
                ApiErrorCategory::Client
            }
            Self::Network(_) | Self::Timeout(_) => ApiErrorCategory::Network,
            Self::Config(_) => ApiErrorCategory::Config,
            Self::Service { code, .. } => service_category(*code),
        }
    }

    /// `errcode` reported by the service, if any.
    pub const fn service_code(&self) -> Option<i64> {
        match self {
            Self::Service { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// `true` when the service rejected the access token itself.
    pub fn is_token_error(&self) -> bool {
        self.service_code().is_some_and(is_token_errcode)
    }

    /// Check if this error should be retried
    pub fn should_retry(&self) -> bool {
        matches!(
            self.category(),
            ApiErrorCategory::Authentication
                | ApiErrorCategory::RateLimit
                | ApiErrorCategory::Server
                | ApiErrorCategory::Network
        )
    }

    /// Get suggested retry delay in seconds
    pub fn retry_delay_secs(&self) -> u64 {
        match self.category() {
            ApiErrorCategory::Authentication => 5,
            ApiErrorCategory::RateLimit => 60,
            ApiErrorCategory::Server => 10,
            ApiErrorCategory::Network => 5,
            ApiErrorCategory::Client | ApiErrorCategory::Config => 0,
        }
    }
}

const fn is_token_errcode(code: i64) -> bool {
    matches!(code, ERRCODE_INVALID_TOKEN | ERRCODE_MISSING_TOKEN | ERRCODE_TOKEN_EXPIRED)
}

const fn service_category(code: i64) -> ApiErrorCategory {
    if is_token_errcode(code) {
        ApiErrorCategory::Authentication
    } else if matches!(code, ERRCODE_FREQUENCY_LIMIT | ERRCODE_CONCURRENCY_LIMIT) {
        ApiErrorCategory::RateLimit
    } else if code == ERRCODE_SYSTEM_BUSY {
        ApiErrorCategory::Server
    } else {
        ApiErrorCategory::Client
    }
}

impl ErrorClassification for ApiError {
    fn is_retryable(&self) -> bool {
        self.should_retry()
    }

    fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ApiErrorCategory::RateLimit | ApiErrorCategory::Network => ErrorSeverity::Warning,
            ApiErrorCategory::Config => ErrorSeverity::Critical,
            _ => ErrorSeverity::Error,
        }
    }

    fn is_critical(&self) -> bool {
        self.category() == ApiErrorCategory::Config
    }

    fn retry_after(&self) -> Option<Duration> {
        self.should_retry().then(|| Duration::from_secs(self.retry_delay_secs()))
    }
}

impl From<WecomError> for ApiError {
    fn from(err: WecomError) -> Self {
        match err {
            WecomError::Config(message) => Self::Config(message),
            WecomError::Network(message) => Self::Network(message),
            WecomError::Auth(message) => Self::Auth(message),
            WecomError::InvalidInput(message) => Self::InvalidInput(message),
            WecomError::Serialization(message) => Self::Client(message),
            WecomError::Service { code, message } => Self::Service { code, message },
            WecomError::Internal(message) => Self::Server(message),
        }
    }
}

impl From<ApiError> for WecomError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Auth(message) => Self::Auth(message),
            ApiError::Config(message) => Self::Config(message),
            ApiError::InvalidInput(message) => Self::InvalidInput(message),
            ApiError::Service { code, message } => Self::Service { code, message },
            ApiError::Network(_) | ApiError::Timeout(_) | ApiError::RateLimit(_) => {
                Self::Network(err.to_string())
            }
            ApiError::Server(_) | ApiError::Client(_) | ApiError::Integrity(_) => {
                Self::Internal(err.to_string())
            }
        }
    }
}

impl From<CommonError> for ApiError {
    fn from(err: CommonError) -> Self {
        match err {
            CommonError::Validation { .. } => Self::InvalidInput(err.to_string()),
            CommonError::Crypto { .. } => Self::Integrity(err.to_string()),
            CommonError::Serialization { .. } => Self::Client(err.to_string()),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        WecomError::from(InfraError::from(err.without_url())).into()
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        WecomError::from(InfraError::from(err)).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_categories() {
        assert_eq!(
            ApiError::Auth("test".to_string()).category(),
            ApiErrorCategory::Authentication
        );
        assert_eq!(
            ApiError::RateLimit("test".to_string()).category(),
            ApiErrorCategory::RateLimit
        );
        assert_eq!(ApiError::Server("test".to_string()).category(), ApiErrorCategory::Server);
        assert_eq!(ApiError::Network("test".to_string()).category(), ApiErrorCategory::Network);
        assert_eq!(ApiError::invalid_input("empty userid").category(), ApiErrorCategory::Client);
    }

    #[test]
    fn json_errors_become_client_errors() {
        let err = serde_json::from_str::<u32>("not json").unwrap_err();
        assert!(matches!(ApiError::from(err), ApiError::Client(_)));
    }

    #[test]
    fn service_codes_are_classified() {
        assert_eq!(
            ApiError::service(42001, "expired").category(),
            ApiErrorCategory::Authentication
        );
        assert_eq!(ApiError::service(40014, "").category(), ApiErrorCategory::Authentication);
        assert_eq!(ApiError::service(45009, "").category(), ApiErrorCategory::RateLimit);
        assert_eq!(ApiError::service(-1, "busy").category(), ApiErrorCategory::Server);
        assert_eq!(ApiError::service(60111, "no user").category(), ApiErrorCategory::Client);

        assert!(ApiError::service(41001, "").is_token_error());
        assert!(!ApiError::service(45033, "").is_token_error());
        assert!(!ApiError::Auth("401".into()).is_token_error());
    }

    #[test]
    fn service_message_falls_back_to_code() {
        let err = ApiError::service(60003, "");
        assert_eq!(err.to_string(), "Service error 60003: request error with code 60003");
    }

    #[test]
    fn test_should_retry() {
        assert!(ApiError::Auth("test".to_string()).should_retry());
        assert!(ApiError::RateLimit("test".to_string()).should_retry());
        assert!(ApiError::Server("test".to_string()).should_retry());
        assert!(ApiError::Network("test".to_string()).should_retry());
        assert!(!ApiError::Client("test".to_string()).should_retry());
        assert!(!ApiError::Config("test".to_string()).should_retry());
        assert!(!ApiError::Integrity("data md5 mismatch".to_string()).should_retry());
    }

    #[test]
    fn test_retry_delays() {
        assert_eq!(ApiError::Auth("test".to_string()).retry_delay_secs(), 5);
        assert_eq!(ApiError::RateLimit("test".to_string()).retry_delay_secs(), 60);
        assert_eq!(ApiError::Server("test".to_string()).retry_delay_secs(), 10);
        assert_eq!(ApiError::Network("test".to_string()).retry_delay_secs(), 5);
        assert_eq!(ApiError::Client("test".to_string()).retry_delay_secs(), 0);
        assert_eq!(ApiError::service(45009, "").retry_after(), Some(Duration::from_secs(60)));
        assert_eq!(ApiError::service(60111, "").retry_after(), None);
    }

    #[test]
    fn converts_to_and_from_domain_error() {
        let api: ApiError = WecomError::service(60111, "userid not found").into();
        assert_eq!(api.service_code(), Some(60111));

        let domain: WecomError = api.into();
        assert_eq!(
            domain,
            WecomError::Service { code: 60111, message: "userid not found".into() }
        );

        let crypto: ApiError = CommonError::crypto("unpad", "bad padding").into();
        assert!(matches!(crypto, ApiError::Integrity(_)));
    }
}
