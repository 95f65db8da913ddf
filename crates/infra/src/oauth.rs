//! Web login through the WeCom QR-code flow.
//!
//! [`authorize_url`] builds the page users are redirected to. After they
//! scan, the service redirects back with a `code` that
//! [`OAuthCommands::user_info`] resolves to a member id.

use std::sync::Arc;

use tracing::{debug, instrument};
use url::Url;
use wecom_domain::constants::OAUTH_QR_CONNECT_PATH;
use wecom_domain::AuthRequest;

use crate::api::{ApiClient, ApiError};
use crate::contact::{require_non_empty, userid_from_userinfo};

/// Build the QR-connect login URL under `oauth_base`.
///
/// `state` and `lang` are left out when unset or empty.
///
/// # Errors
///
/// Returns [`ApiError::InvalidInput`] when `appid`, `agentid` or
/// `redirect_uri` is empty, and [`ApiError::Config`] when the base is not a
/// valid URL
pub fn authorize_url(oauth_base: &str, request: &AuthRequest) -> Result<String, ApiError> {
    require_non_empty("appid", &request.appid)?;
    require_non_empty("agentid", &request.agentid)?;
    require_non_empty("redirect_uri", &request.redirect_uri)?;

    let base = format!("{}{OAUTH_QR_CONNECT_PATH}", oauth_base.trim_end_matches('/'));
    let mut url = Url::parse(&base)
        .map_err(|e| ApiError::Config(format!("Invalid OAuth base URL '{oauth_base}': {e}")))?;

    {
        let mut query = url.query_pairs_mut();
        query
            .append_pair("appid", &request.appid)
            .append_pair("agentid", &request.agentid)
            .append_pair("redirect_uri", &request.redirect_uri);
        for (key, value) in [("state", &request.state), ("lang", &request.lang)] {
            if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
                query.append_pair(key, value);
            }
        }
    }

    Ok(url.into())
}

/// Code exchange for the login redirect
#[derive(Debug, Clone)]
pub struct OAuthCommands {
    client: Arc<ApiClient>,
}

impl OAuthCommands {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// Resolve the redirect `code` to the member's userid.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Auth`] when the response carries no member id
    /// (the visitor is not a corp member), or the request error
    #[instrument(skip(self, code))]
    pub async fn user_info(&self, code: &str) -> Result<String, ApiError> {
        require_non_empty("code", code)?;
        let body = self.client.get("user/getuserinfo", &[("code", code.to_string())]).await?;
        let userid = userid_from_userinfo(&body)?
            .ok_or_else(|| ApiError::Auth("login code did not resolve to a member".into()))?;
        debug!("login code resolved");
        Ok(userid)
    }
}
