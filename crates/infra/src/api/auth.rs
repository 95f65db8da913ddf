//! Corp access-token management
//!
//! The corp id and secret are traded for a short-lived access token at
//! `gettoken`. [`CorpTokenService`] caches that token and refreshes it
//! shortly before it expires.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument};
use wecom_common::{AccessToken, TokenCheck};
use wecom_domain::constants::TOKEN_PATH;
use wecom_domain::WecomConfig;

use super::client::{get_envelope, join_url};
use super::errors::ApiError;
use crate::http::HttpClient;

/// Trait for providing access tokens
///
/// This trait allows dependency injection and testing with mock providers.
#[async_trait]
pub trait AccessTokenProvider: Send + Sync {
    /// Get a valid access token
    ///
    /// This method should handle token refresh if needed.
    async fn access_token(&self) -> Result<String, ApiError>;

    /// Drop any cached token so the next call fetches a fresh one.
    async fn invalidate(&self) {}
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

/// Access-token holder for one corp application.
pub struct CorpTokenService {
    http_client: Arc<HttpClient>,
    corp_id: String,
    corp_secret: String,
    token_url: String,
    refresh_threshold_secs: i64,
    token: RwLock<Option<AccessToken>>,
}

impl fmt::Debug for CorpTokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CorpTokenService")
            .field("corp_id", &self.corp_id)
            .field("corp_secret", &"[REDACTED]")
            .field("token_url", &self.token_url)
            .field("refresh_threshold_secs", &self.refresh_threshold_secs)
            .finish_non_exhaustive()
    }
}

impl CorpTokenService {
    pub fn new(config: &WecomConfig, http_client: Arc<HttpClient>) -> Self {
        Self {
            http_client,
            corp_id: config.corp_id.clone(),
            corp_secret: config.corp_secret.clone(),
            token_url: join_url(&config.api_base_url, TOKEN_PATH),
            refresh_threshold_secs: config.refresh_threshold_secs,
            token: RwLock::new(None),
        }
    }

    /// Validate the cached token locally, without any network traffic.
    pub async fn check(&self) -> Result<(), TokenCheck> {
        self.check_with_threshold(0).await
    }

    async fn check_with_threshold(&self, threshold_secs: i64) -> Result<(), TokenCheck> {
        let token = self.token.read().await;
        TokenCheck::evaluate(token.as_ref(), &self.corp_id, &self.corp_secret, threshold_secs)
    }

    /// Fetch a new token from the service and cache it.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the service rejects the credentials
    pub async fn authenticate(&self) -> Result<(), ApiError> {
        let fresh = self.fetch_token().await?;
        *self.token.write().await = Some(fresh);
        Ok(())
    }

    /// Authenticate only when the local check fails.
    ///
    /// # Errors
    ///
    /// Returns error if a required refresh fails
    pub async fn check_and_auth(&self) -> Result<(), ApiError> {
        self.refresh_if_needed(0).await.map(|_| ())
    }

    /// Currently cached token, if any.
    pub async fn current_token(&self) -> Option<AccessToken> {
        self.token.read().await.clone()
    }

    async fn refresh_if_needed(&self, threshold_secs: i64) -> Result<String, ApiError> {
        if self.check_with_threshold(threshold_secs).await.is_ok() {
            if let Some(token) = self.token.read().await.as_ref() {
                return Ok(token.secret().to_string());
            }
        }

        // Concurrent callers queue on the write lock; the first one refreshes.
        let mut guard = self.token.write().await;
        let reason = TokenCheck::evaluate(
            guard.as_ref(),
            &self.corp_id,
            &self.corp_secret,
            threshold_secs,
        );
        match (reason, guard.as_ref()) {
            (Ok(()), Some(token)) => return Ok(token.secret().to_string()),
            (Err(reason), _) => debug!(%reason, "refreshing access token"),
            (Ok(()), None) => {}
        }

        let fresh = self.fetch_token().await?;
        let secret = fresh.secret().to_string();
        *guard = Some(fresh);
        Ok(secret)
    }

    #[instrument(skip(self), fields(corp_id = %self.corp_id))]
    async fn fetch_token(&self) -> Result<AccessToken, ApiError> {
        if self.corp_id.is_empty() || self.corp_secret.is_empty() {
            return Err(ApiError::Config(TokenCheck::NotInitialized.to_string()));
        }

        let query = [("corpid", self.corp_id.clone()), ("corpsecret", self.corp_secret.clone())];
        let response: TokenResponse =
            get_envelope(&self.http_client, &self.token_url, &query).await?.into_typed()?;

        info!(expires_in = response.expires_in, "access token obtained");
        Ok(AccessToken::new(response.access_token, response.expires_in))
    }
}

#[async_trait]
impl AccessTokenProvider for CorpTokenService {
    async fn access_token(&self) -> Result<String, ApiError> {
        self.refresh_if_needed(self.refresh_threshold_secs).await
    }

    async fn invalidate(&self) {
        debug!("dropping cached access token");
        *self.token.write().await = None;
    }
}
