//! OAuth web-login request

use serde::{Deserialize, Serialize};

/// Parameters of the QR-code login redirect.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthRequest {
    /// Corp id.
    pub appid: String,
    /// Web application agent id.
    pub agentid: String,
    pub redirect_uri: String,
    /// Echoed back on the redirect; use it for CSRF protection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    /// `zh` or `en`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
}

impl AuthRequest {
    pub fn new(
        appid: impl Into<String>,
        agentid: impl Into<String>,
        redirect_uri: impl Into<String>,
    ) -> Self {
        Self {
            appid: appid.into(),
            agentid: agentid.into(),
            redirect_uri: redirect_uri.into(),
            state: None,
            lang: None,
        }
    }

    #[must_use]
    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    #[must_use]
    pub fn with_lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = Some(lang.into());
        self
    }
}
