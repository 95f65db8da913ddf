//! Client facade for one corp application

use std::sync::Arc;

use tracing::info;
use wecom_common::crypto::ExportKey;
use wecom_domain::{AuthRequest, WecomConfig};

use crate::api::{ApiClient, ApiClientConfig, ApiError, CorpTokenService};
use crate::batch::{ExportCommands, ImportCommands};
use crate::contact::{DepartmentCommands, TagCommands, UserCommands};
use crate::http::HttpClient;
use crate::oauth::{self, OAuthCommands};

/// Entry point of the directory API.
///
/// The token service, HTTP transport and API client are shared by every
/// command group, so accessors are cheap and may be called per request.
///
/// ```no_run
/// # async fn run() -> Result<(), wecom_infra::ApiError> {
/// use wecom_domain::WecomConfig;
/// use wecom_infra::Wecom;
///
/// let wecom = Wecom::new(WecomConfig::new("ww0001", "secret"))?;
/// let user = wecom.users().get("zhangsan").await?;
/// println!("{}", user.name);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Wecom {
    config: Arc<WecomConfig>,
    auth: Arc<CorpTokenService>,
    client: Arc<ApiClient>,
}

impl Wecom {
    /// Build the client stack for `config`. No request is sent until the
    /// first call needs a token.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Config`] when the configuration is invalid or the
    /// HTTP transport cannot be created
    pub fn new(config: WecomConfig) -> Result<Self, ApiError> {
        config.validate()?;

        let http_client = Arc::new(HttpClient::from_config(&config)?);
        let auth = Arc::new(CorpTokenService::new(&config, Arc::clone(&http_client)));
        let client = Arc::new(ApiClient::with_http_client(
            ApiClientConfig::from(&config),
            http_client,
            auth.clone(),
        ));

        info!(corp_id = %config.corp_id, base_url = %config.api_base_url, "wecom client ready");
        Ok(Self { config: Arc::new(config), auth, client })
    }

    pub fn config(&self) -> &WecomConfig {
        &self.config
    }

    /// Token service backing every authenticated call
    pub fn auth(&self) -> &CorpTokenService {
        &self.auth
    }

    pub fn users(&self) -> UserCommands {
        UserCommands::new(Arc::clone(&self.client))
    }

    pub fn departments(&self) -> DepartmentCommands {
        DepartmentCommands::new(Arc::clone(&self.client))
    }

    pub fn tags(&self) -> TagCommands {
        TagCommands::new(Arc::clone(&self.client))
    }

    pub fn imports(&self) -> ImportCommands {
        ImportCommands::new(Arc::clone(&self.client))
    }

    pub fn exports(&self) -> ExportCommands {
        ExportCommands::new(Arc::clone(&self.client))
    }

    pub fn oauth(&self) -> OAuthCommands {
        OAuthCommands::new(Arc::clone(&self.client))
    }

    /// Fresh random key for an export job.
    pub fn new_export_key(&self) -> ExportKey {
        ExportKey::generate()
    }

    /// QR-connect login URL under the configured OAuth host.
    ///
    /// # Errors
    ///
    /// See [`oauth::authorize_url`]
    pub fn authorize_url(&self, request: &AuthRequest) -> Result<String, ApiError> {
        oauth::authorize_url(&self.config.oauth_base_url, request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_invalid_config() {
        let err = Wecom::new(WecomConfig::new("", "secret")).unwrap_err();
        assert!(matches!(err, ApiError::Config(_)));
    }

    #[test]
    fn authorize_url_uses_configured_host() {
        let config = WecomConfig::new("ww0001", "secret")
            .with_base_urls("http://127.0.0.1:9/cgi-bin", "http://127.0.0.1:9");
        let wecom = Wecom::new(config).unwrap();
        let request = AuthRequest::new("ww0001", "1", "https://a.example");
        let url = wecom.authorize_url(&request).unwrap();
        assert!(url.starts_with("http://127.0.0.1:9/wwopen/sso/qrConnect?appid=ww0001"));
    }

    #[test]
    fn export_keys_are_unique() {
        let wecom = Wecom::new(WecomConfig::new("ww0001", "secret")).unwrap();
        assert_ne!(wecom.new_export_key(), wecom.new_export_key());
    }
}
