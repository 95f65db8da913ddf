//! Conversions from external infrastructure errors into domain errors.

use reqwest::Error as HttpError;
use serde_json::Error as JsonError;
use wecom_common::CommonError;
use wecom_domain::WecomError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub WecomError);

impl From<InfraError> for WecomError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<WecomError> for InfraError {
    fn from(value: WecomError) -> Self {
        Self(value)
    }
}

trait IntoWecomError {
    fn into_wecom(self) -> WecomError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → WecomError */
/* -------------------------------------------------------------------------- */

impl IntoWecomError for HttpError {
    fn into_wecom(self) -> WecomError {
        if self.is_timeout() {
            return WecomError::Network("HTTP request timed out".into());
        }

        #[cfg(not(target_arch = "wasm32"))]
        if self.is_connect() {
            return WecomError::Network("HTTP connection failure".into());
        }

        if self.is_builder() {
            return WecomError::InvalidInput(format!("invalid HTTP request: {self}"));
        }

        if self.is_decode() {
            return WecomError::Serialization(format!("failed to decode HTTP body: {self}"));
        }

        if let Some(status) = self.status() {
            let code = status.as_u16();
            let message =
                format!("HTTP {} {}", code, status.canonical_reason().unwrap_or("unknown status"));

            return match code {
                401 | 403 => WecomError::Auth(message),
                400..=499 => WecomError::InvalidInput(message),
                _ => WecomError::Network(message),
            };
        }

        WecomError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        Self(value.into_wecom())
    }
}

/* -------------------------------------------------------------------------- */
/* serde_json::Error → WecomError */
/* -------------------------------------------------------------------------- */

impl IntoWecomError for JsonError {
    fn into_wecom(self) -> WecomError {
        WecomError::Serialization(format!(
            "invalid JSON at line {} column {}: {self}",
            self.line(),
            self.column()
        ))
    }
}

impl From<JsonError> for InfraError {
    fn from(value: JsonError) -> Self {
        Self(value.into_wecom())
    }
}

/* -------------------------------------------------------------------------- */
/* CommonError → WecomError */
/* -------------------------------------------------------------------------- */

impl IntoWecomError for CommonError {
    fn into_wecom(self) -> WecomError {
        match self {
            CommonError::Validation { .. } => WecomError::InvalidInput(self.to_string()),
            CommonError::Serialization { .. } => WecomError::Serialization(self.to_string()),
            CommonError::Crypto { .. } => WecomError::Internal(self.to_string()),
        }
    }
}

impl From<CommonError> for InfraError {
    fn from(value: CommonError) -> Self {
        Self(value.into_wecom())
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use reqwest::{Client, StatusCode};
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    #[tokio::test]
    async fn http_status_401_maps_to_auth_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(StatusCode::UNAUTHORIZED))
            .mount(&server)
            .await;

        let client = Client::builder().no_proxy().build().unwrap();
        let error = client.get(server.uri()).send().await.unwrap().error_for_status().unwrap_err();

        let mapped: WecomError = InfraError::from(error).into();
        match mapped {
            WecomError::Auth(msg) => assert!(msg.contains("401")),
            other => panic!("expected auth error, got {other:?}"),
        }
    }

    #[test]
    fn json_error_maps_to_serialization() {
        let err = serde_json::from_str::<serde_json::Value>("{oops").unwrap_err();
        let mapped: WecomError = InfraError::from(err).into();
        assert!(matches!(mapped, WecomError::Serialization(msg) if msg.contains("line 1")));
    }

    #[test]
    fn crypto_error_maps_to_internal() {
        let mapped: WecomError = InfraError::from(CommonError::crypto("unpad", "bad")).into();
        assert!(matches!(mapped, WecomError::Internal(_)));

        let mapped: WecomError =
            InfraError::from(CommonError::validation("key", "too short")).into();
        assert!(matches!(mapped, WecomError::InvalidInput(_)));
    }
}
