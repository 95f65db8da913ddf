//! Common error types and utilities
//!
//! Errors produced by the shared primitives in this crate. Client-facing
//! crates compose `CommonError` into their own error enums instead of
//! duplicating its variants.
//!
//! # Error Handling Architecture
//!
//! 1. **`CommonError`**: error patterns shared by several modules
//!    (serialization, validation and cipher failures)
//! 2. **`ErrorClassification` trait**: a standard interface for classifying
//!    errors by retryability and severity
//! 3. **`ErrorSeverity` enum**: a unified severity scale for logging
//!
//! ## Example
//!
//! ```rust,ignore
//! #[derive(Debug, Error)]
//! pub enum MyModuleError {
//!     #[error("Invalid widget configuration: {0}")]
//!     InvalidWidget(String),
//!
//!     #[error(transparent)]
//!     Common(#[from] CommonError),
//! }
//! ```

use std::fmt;
use std::time::Duration;

/// Standard result type using CommonError
pub type CommonResult<T> = Result<T, CommonError>;

/// Common error variants that appear across multiple modules
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommonError {
    /// Serialization or deserialization errors
    Serialization { message: String, format: String },

    /// Validation errors
    Validation { field: String, message: String },

    /// Cipher setup, encryption, decryption or padding failures
    Crypto { operation: String, message: String },
}

impl fmt::Display for CommonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Serialization { message, format } => {
                write!(f, "Serialization error ({format}): {message}")
            }
            Self::Validation { field, message } => {
                write!(f, "Validation error for field '{field}': {message}")
            }
            Self::Crypto { operation, message } => {
                write!(f, "Crypto error during '{operation}': {message}")
            }
        }
    }
}

impl std::error::Error for CommonError {}

impl ErrorClassification for CommonError {
    fn is_retryable(&self) -> bool {
        false
    }

    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Serialization { .. } | Self::Validation { .. } => ErrorSeverity::Error,
            Self::Crypto { .. } => ErrorSeverity::Critical,
        }
    }

    fn is_critical(&self) -> bool {
        matches!(self, Self::Crypto { .. })
    }

    fn retry_after(&self) -> Option<Duration> {
        None
    }
}

impl CommonError {
    pub fn serialization_format<S: Into<String>, F: Into<String>>(format: F, message: S) -> Self {
        Self::Serialization { message: message.into(), format: format.into() }
    }

    pub fn validation<F: Into<String>, M: Into<String>>(field: F, message: M) -> Self {
        Self::Validation { field: field.into(), message: message.into() }
    }

    pub fn crypto<O: Into<String>, M: Into<String>>(operation: O, message: M) -> Self {
        Self::Crypto { operation: operation.into(), message: message.into() }
    }
}

/// Error classification trait for consistent error handling across modules
pub trait ErrorClassification {
    /// Check if this error is retryable
    ///
    /// Retryable errors are transient issues that may succeed if attempted
    /// again, such as network timeouts, rate limiting or a busy service.
    fn is_retryable(&self) -> bool;

    /// Get the error severity level
    fn severity(&self) -> ErrorSeverity;

    /// Check if this is a critical error requiring immediate attention
    fn is_critical(&self) -> bool;

    /// Get the suggested retry delay if applicable
    fn retry_after(&self) -> Option<Duration>;
}

/// Error severity levels for monitoring and alerting
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    /// Informational, typically for debugging
    Info,
    /// Warning, should be monitored but not critical
    Warning,
    /// Error, requires attention and action
    Error,
    /// Critical, immediate action required
    Critical,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "INFO"),
            Self::Warning => write!(f, "WARN"),
            Self::Error => write!(f, "ERROR"),
            Self::Critical => write!(f, "CRITICAL"),
        }
    }
}

// Standard conversions from common error types
impl From<serde_json::Error> for CommonError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization_format("JSON", err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_failing_part() {
        assert_eq!(
            CommonError::validation("iv", "must be 16 bytes").to_string(),
            "Validation error for field 'iv': must be 16 bytes"
        );
        assert_eq!(
            CommonError::serialization_format("base64", "invalid symbol").to_string(),
            "Serialization error (base64): invalid symbol"
        );
        assert_eq!(
            CommonError::crypto("cbc decrypt", "error crypt size").to_string(),
            "Crypto error during 'cbc decrypt': error crypt size"
        );
    }

    #[test]
    fn classification() {
        let err = CommonError::crypto("unpad", "bad padding");
        assert!(err.is_critical());
        assert!(!err.is_retryable());
        assert_eq!(err.severity(), ErrorSeverity::Critical);

        let err = CommonError::validation("key", "bad");
        assert!(!err.is_critical());
        assert_eq!(err.severity(), ErrorSeverity::Error);
    }

    #[test]
    fn json_errors_convert() {
        let err: CommonError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(err, CommonError::Serialization { ref format, .. } if format == "JSON"));
    }
}
