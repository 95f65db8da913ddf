//! Response envelope handling
//!
//! Every API response is a JSON object carrying `errcode` and `errmsg` next
//! to the payload fields. A non-zero `errcode` becomes
//! [`ApiError::Service`]; otherwise the remaining fields are handed back as
//! a [`ResponseBody`].

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use wecom_domain::constants::ERRCODE_OK;

use super::errors::ApiError;

/// Payload fields of a successful response, envelope keys removed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResponseBody {
    fields: Map<String, Value>,
}

impl ResponseBody {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// Deserialize the whole payload into `T`.
    pub fn into_typed<T: DeserializeOwned>(self) -> Result<T, ApiError> {
        serde_json::from_value(Value::Object(self.fields))
            .map_err(|e| ApiError::Client(format!("Failed to decode response: {e}")))
    }

    /// Required field decoded as `T`.
    pub fn field<T: DeserializeOwned>(&self, key: &str) -> Result<T, ApiError> {
        self.optional(key)?
            .ok_or_else(|| ApiError::Client(format!("Response is missing field '{key}'")))
    }

    /// Optional field; `null` counts as absent.
    pub fn optional<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, ApiError> {
        match self.fields.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => T::deserialize(value)
                .map(Some)
                .map_err(|e| ApiError::Client(format!("Failed to decode field '{key}': {e}"))),
        }
    }

    /// Required identifier field as text. Numbers are rendered in decimal.
    pub fn string(&self, key: &str) -> Result<String, ApiError> {
        match self.fields.get(key) {
            Some(Value::String(s)) => Ok(s.clone()),
            Some(Value::Number(n)) => Ok(n.to_string()),
            Some(other) => {
                Err(ApiError::Client(format!("Field '{key}' is not a string or number: {other}")))
            }
            None => Err(ApiError::Client(format!("Response is missing field '{key}'"))),
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.fields
    }
}

/// Parse a response body and promote a non-zero `errcode` to an error.
///
/// A missing `errcode` counts as success.
pub fn parse_response_body(bytes: &[u8]) -> Result<ResponseBody, ApiError> {
    let value: Value = serde_json::from_slice(bytes)
        .map_err(|e| ApiError::Client(format!("Failed to parse response: {e}")))?;
    let Value::Object(mut fields) = value else {
        return Err(ApiError::Client("Failed to parse response: expected a JSON object".into()));
    };

    let code = match fields.remove("errcode") {
        None | Some(Value::Null) => ERRCODE_OK,
        Some(Value::Number(n)) => n.as_i64().ok_or_else(|| {
            ApiError::Client(format!("Failed to parse response: invalid errcode {n}"))
        })?,
        Some(Value::String(s)) => s.trim().parse().map_err(|_| {
            ApiError::Client(format!("Failed to parse response: invalid errcode {s}"))
        })?,
        Some(other) => {
            return Err(ApiError::Client(format!(
                "Failed to parse response: invalid errcode {other}"
            )))
        }
    };
    let message = match fields.remove("errmsg") {
        Some(Value::String(s)) => s,
        _ => String::new(),
    };

    if code != ERRCODE_OK {
        return Err(ApiError::service(code, message));
    }
    Ok(ResponseBody::new(fields))
}
