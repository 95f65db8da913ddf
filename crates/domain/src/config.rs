//! Client configuration

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_API_BASE_URL, DEFAULT_OAUTH_BASE_URL};
use crate::errors::{Result, WecomError};

/// Connection settings for one corp application.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WecomConfig {
    pub corp_id: String,
    #[serde(skip_serializing, default)]
    pub corp_secret: String,
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_oauth_base_url")]
    pub oauth_base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_attempts")]
    pub max_attempts: usize,
    /// Appends `debug=1` to every authenticated request.
    #[serde(default)]
    pub debug: bool,
    /// Refresh the access token this many seconds before it expires.
    #[serde(default = "default_refresh_threshold_secs")]
    pub refresh_threshold_secs: i64,
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_oauth_base_url() -> String {
    DEFAULT_OAUTH_BASE_URL.to_string()
}

const fn default_timeout_secs() -> u64 {
    30
}

const fn default_max_attempts() -> usize {
    3
}

const fn default_refresh_threshold_secs() -> i64 {
    300
}

impl WecomConfig {
    /// Configuration with default endpoints for the given credentials.
    pub fn new(corp_id: impl Into<String>, corp_secret: impl Into<String>) -> Self {
        Self {
            corp_id: corp_id.into(),
            corp_secret: corp_secret.into(),
            api_base_url: default_api_base_url(),
            oauth_base_url: default_oauth_base_url(),
            timeout_secs: default_timeout_secs(),
            max_attempts: default_max_attempts(),
            debug: false,
            refresh_threshold_secs: default_refresh_threshold_secs(),
        }
    }

    /// Point both API and OAuth hosts at another base (mock servers, proxies).
    #[must_use]
    pub fn with_base_urls(mut self, api: impl Into<String>, oauth: impl Into<String>) -> Self {
        self.api_base_url = api.into();
        self.oauth_base_url = oauth.into();
        self
    }

    #[must_use]
    pub const fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Check the settings before any request is made.
    ///
    /// # Errors
    /// Returns `WecomError::Config` when credentials are empty, the timeout
    /// is zero, or a base URL is not http(s).
    pub fn validate(&self) -> Result<()> {
        if self.corp_id.trim().is_empty() {
            return Err(WecomError::Config("corp_id must not be empty".into()));
        }
        if self.corp_secret.trim().is_empty() {
            return Err(WecomError::Config("corp_secret must not be empty".into()));
        }
        if self.timeout_secs == 0 {
            return Err(WecomError::Config("timeout_secs must be greater than zero".into()));
        }
        let urls = [("api_base_url", &self.api_base_url), ("oauth_base_url", &self.oauth_base_url)];
        for (name, url) in urls {
            if !(url.starts_with("https://") || url.starts_with("http://")) {
                return Err(WecomError::Config(format!("{name} must be an http(s) URL: {url}")));
            }
        }
        Ok(())
    }
}

impl fmt::Debug for WecomConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WecomConfig")
            .field("corp_id", &self.corp_id)
            .field("corp_secret", &"[REDACTED]")
            .field("api_base_url", &self.api_base_url)
            .field("oauth_base_url", &self.oauth_base_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("max_attempts", &self.max_attempts)
            .field("debug", &self.debug)
            .field("refresh_threshold_secs", &self.refresh_threshold_secs)
            .finish()
    }
}
