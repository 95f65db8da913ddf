//! Access token with expiry tracking

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

/// Access token issued by `gettoken`.
///
/// Not serializable: the secret is only reachable through [`Self::secret`].
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken {
    token: String,
    /// Lifetime granted by the service, in seconds.
    expires_in: i64,
    expires_at: DateTime<Utc>,
}

impl AccessToken {
    /// Token valid for `expires_in` seconds from now.
    #[must_use]
    pub fn new(token: impl Into<String>, expires_in: i64) -> Self {
        Self::issued_at(token, expires_in, Utc::now())
    }

    /// Token issued at a given instant.
    #[must_use]
    pub fn issued_at(token: impl Into<String>, expires_in: i64, issued_at: DateTime<Utc>) -> Self {
        Self {
            token: token.into(),
            expires_in,
            expires_at: issued_at + Duration::seconds(expires_in.max(0)),
        }
    }

    pub fn secret(&self) -> &str {
        &self.token
    }

    pub const fn expires_in(&self) -> i64 {
        self.expires_in
    }

    pub const fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// `true` if the token is expired or expires within `threshold_seconds`.
    #[must_use]
    pub fn is_expired(&self, threshold_seconds: i64) -> bool {
        self.is_expired_at(Utc::now(), threshold_seconds)
    }

    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>, threshold_seconds: i64) -> bool {
        now + Duration::seconds(threshold_seconds) >= self.expires_at
    }

    /// Seconds left; negative once expired.
    #[must_use]
    pub fn seconds_until_expiry(&self) -> i64 {
        (self.expires_at - Utc::now()).num_seconds()
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("token", &"[REDACTED]")
            .field("expires_in", &self.expires_in)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Reason a locally held token cannot be used without re-authenticating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenCheck {
    #[error("token is nil")]
    Missing,

    #[error("token expired")]
    Expired,

    #[error("object not initialized")]
    NotInitialized,
}

impl TokenCheck {
    /// Local validity check of a held token and the credentials behind it.
    ///
    /// Checked in order: token present, token not expired (with
    /// `threshold_seconds` of slack), credentials present.
    ///
    /// # Errors
    /// Returns the first failing condition.
    pub fn evaluate(
        token: Option<&AccessToken>,
        corp_id: &str,
        corp_secret: &str,
        threshold_seconds: i64,
    ) -> Result<(), Self> {
        let token = match token {
            Some(token) if !token.secret().is_empty() => token,
            _ => return Err(Self::Missing),
        };
        if token.is_expired(threshold_seconds) {
            return Err(Self::Expired);
        }
        if corp_id.is_empty() || corp_secret.is_empty() {
            return Err(Self::NotInitialized);
        }
        Ok(())
    }
}
