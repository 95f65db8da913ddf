//! Authenticated API client
//!
//! Wraps [`HttpClient`] with access-token injection, HTTP status mapping and
//! response envelope unwrapping. A call rejected for a stale token is retried
//! once after the token provider drops its cached token.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Method, RequestBuilder, StatusCode};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, instrument, warn};
use wecom_domain::constants::DEFAULT_API_BASE_URL;
use wecom_domain::{WecomConfig, WecomError};

use super::auth::AccessTokenProvider;
use super::envelope::{parse_response_body, ResponseBody};
use super::errors::ApiError;
use crate::http::HttpClient;

/// Query parameters of a request, in order.
pub type Query<'a> = [(&'a str, String)];

/// Configuration for API client
#[derive(Debug, Clone)]
pub struct ApiClientConfig {
    /// Base URL for API (e.g., "https://qyapi.weixin.qq.com/cgi-bin")
    pub base_url: String,
    /// Per-attempt timeout; retries get their own
    pub timeout: Duration,
    /// Total attempts for transport failures
    pub max_attempts: usize,
    /// Append `debug=1` to authenticated requests
    pub debug: bool,
}

impl Default for ApiClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
            max_attempts: 3,
            debug: false,
        }
    }
}

impl From<&WecomConfig> for ApiClientConfig {
    fn from(config: &WecomConfig) -> Self {
        Self {
            base_url: config.api_base_url.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
            max_attempts: config.max_attempts,
            debug: config.debug,
        }
    }
}

/// API client for the corp server API
pub struct ApiClient {
    http_client: Arc<HttpClient>,
    auth: Arc<dyn AccessTokenProvider>,
    config: ApiClientConfig,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient").field("config", &self.config).finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a new API client with its own HTTP transport
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be created
    pub fn new(
        config: ApiClientConfig,
        auth: Arc<dyn AccessTokenProvider>,
    ) -> Result<Self, ApiError> {
        let http_client = HttpClient::builder()
            .timeout(config.timeout)
            .max_attempts(config.max_attempts)
            .build()
            .map_err(|e| ApiError::Config(format!("Failed to build HttpClient: {e}")))?;

        Ok(Self::with_http_client(config, Arc::new(http_client), auth))
    }

    /// Create an API client sharing an existing HTTP transport
    pub fn with_http_client(
        config: ApiClientConfig,
        http_client: Arc<HttpClient>,
        auth: Arc<dyn AccessTokenProvider>,
    ) -> Self {
        Self { http_client, auth, config }
    }

    /// Create a builder for fluent configuration
    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::default()
    }

    pub fn config(&self) -> &ApiClientConfig {
        &self.config
    }

    /// Absolute URL of an API path relative to the base URL.
    pub fn endpoint(&self, path: &str) -> String {
        join_url(&self.config.base_url, path)
    }

    /// Authenticated GET returning the unwrapped payload
    ///
    /// # Errors
    ///
    /// Returns error on transport failure, non-2xx status or non-zero `errcode`
    #[instrument(skip(self, query), fields(path = %path))]
    pub async fn get(&self, path: &str, query: &Query<'_>) -> Result<ResponseBody, ApiError> {
        self.execute_authorized(Method::GET, path, query, None).await
    }

    /// Authenticated POST with a JSON body
    ///
    /// # Errors
    ///
    /// Returns error if the body cannot be serialized or the request fails
    #[instrument(skip(self, body), fields(path = %path))]
    pub async fn post<T: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<ResponseBody, ApiError> {
        let body = serde_json::to_value(body)
            .map_err(|e| ApiError::Client(format!("Failed to serialize body: {e}")))?;
        self.execute_authorized(Method::POST, path, &[], Some(body)).await
    }

    /// GET without an access token, for absolute URLs
    ///
    /// # Errors
    ///
    /// Returns error on transport failure, non-2xx status or non-zero `errcode`
    #[instrument(skip(self, query))]
    pub async fn get_unauthenticated(
        &self,
        url: &str,
        query: &Query<'_>,
    ) -> Result<ResponseBody, ApiError> {
        get_envelope(&self.http_client, url, query).await
    }

    /// Fetch raw bytes from an absolute URL, no envelope handling
    ///
    /// # Errors
    ///
    /// Returns error on transport failure or non-2xx status
    #[instrument(skip(self, url))]
    pub async fn download(&self, url: &str) -> Result<Vec<u8>, ApiError> {
        let request = self.http_client.request(Method::GET, url);
        let bytes = send_for_bytes(&self.http_client, request).await?;
        debug!(size = bytes.len(), "download complete");
        Ok(bytes)
    }

    async fn execute_authorized(
        &self,
        method: Method,
        path: &str,
        query: &Query<'_>,
        body: Option<Value>,
    ) -> Result<ResponseBody, ApiError> {
        let url = self.endpoint(path);
        let mut retried = false;

        loop {
            let token = self.auth.access_token().await?;
            let mut request = self
                .http_client
                .request(method.clone(), &url)
                .query(&self.auth_query(&token))
                .query(query);
            if let Some(body) = &body {
                request = request.json(body);
            }

            let result = send_for_bytes(&self.http_client, request)
                .await
                .and_then(|bytes| parse_response_body(&bytes));

            match result {
                Err(err) if err.is_token_error() && !retried => {
                    warn!(path = %path, error = %err, "access token rejected, refreshing");
                    self.auth.invalidate().await;
                    retried = true;
                }
                Err(err) => return Err(err),
                Ok(body) => {
                    debug!(path = %path, "request successful");
                    return Ok(body);
                }
            }
        }
    }

    fn auth_query(&self, token: &str) -> Vec<(&'static str, String)> {
        let mut query = vec![("access_token", token.to_string())];
        if self.config.debug {
            query.push(("debug", "1".to_string()));
        }
        query
    }
}

/// GET `url` with `query` only and parse the JSON envelope.
///
/// No access token is attached; token acquisition goes through here too.
pub(crate) async fn get_envelope(
    http_client: &HttpClient,
    url: &str,
    query: &Query<'_>,
) -> Result<ResponseBody, ApiError> {
    let request = http_client.request(Method::GET, url).query(query);
    let bytes = send_for_bytes(http_client, request).await?;
    parse_response_body(&bytes)
}

/// Send a request, map non-2xx statuses and return the body bytes.
///
/// The per-attempt timeout is enforced by the HTTP client; the outer guard
/// only bounds the whole retry sequence.
pub(crate) async fn send_for_bytes(
    http_client: &HttpClient,
    request: RequestBuilder,
) -> Result<Vec<u8>, ApiError> {
    let budget = http_client.call_budget();
    let response = match tokio::time::timeout(budget, http_client.send(request)).await {
        Ok(Ok(response)) => response,
        Ok(Err(err)) => return Err(map_wecom_error(err)),
        Err(_) => return Err(ApiError::Timeout(budget)),
    };

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(map_status_error(status, body));
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| {
            ApiError::Network(format!("Failed to read response body: {}", e.without_url()))
        })?;
    Ok(bytes.to_vec())
}

fn map_status_error(status: StatusCode, body: String) -> ApiError {
    let message = if body.is_empty() {
        format!("returned status {status}")
    } else {
        format!("returned status {status}: {body}")
    };

    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        ApiError::Auth(message)
    } else if status == StatusCode::TOO_MANY_REQUESTS {
        ApiError::RateLimit(message)
    } else if status.is_server_error() {
        ApiError::Server(message)
    } else if status.is_client_error() {
        ApiError::Client(message)
    } else {
        ApiError::Network(message)
    }
}

fn map_wecom_error(err: WecomError) -> ApiError {
    match err {
        WecomError::InvalidInput(message) => ApiError::Client(message),
        other => ApiError::from(other),
    }
}

pub(crate) fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

/// Builder for API client
#[derive(Default)]
pub struct ApiClientBuilder {
    config: Option<ApiClientConfig>,
    auth: Option<Arc<dyn AccessTokenProvider>>,
    http_client: Option<Arc<HttpClient>>,
}

impl ApiClientBuilder {
    /// Set the API configuration
    pub fn config(mut self, config: ApiClientConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the authentication provider
    pub fn auth(mut self, auth: Arc<dyn AccessTokenProvider>) -> Self {
        self.auth = Some(auth);
        self
    }

    /// Reuse an existing HTTP transport
    pub fn http_client(mut self, http_client: Arc<HttpClient>) -> Self {
        self.http_client = Some(http_client);
        self
    }

    /// Build the API client
    ///
    /// # Errors
    ///
    /// Returns error if required fields are missing or client creation fails
    pub fn build(self) -> Result<ApiClient, ApiError> {
        let config = self.config.unwrap_or_default();
        let auth =
            self.auth.ok_or_else(|| ApiError::Config("Auth provider not set".to_string()))?;

        match self.http_client {
            Some(http_client) => Ok(ApiClient::with_http_client(config, http_client, auth)),
            None => ApiClient::new(config, auth),
        }
    }
}
