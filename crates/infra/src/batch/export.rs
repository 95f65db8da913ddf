//! Bulk export jobs (`export/*`)
//!
//! Exported files are AES-256-CBC encrypted with the caller's [`ExportKey`].
//! [`ExportCommands::download`] checks size and MD5 of the ciphertext before
//! decrypting it.

use std::sync::Arc;

use md5::{Digest, Md5};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, instrument};
use wecom_common::crypto::ExportKey;
use wecom_domain::constants::{MAX_EXPORT_BLOCK_SIZE, MIN_EXPORT_BLOCK_SIZE};
use wecom_domain::{Department, ExportResult, ExportUrl, TagMembers, User};

use crate::api::{ApiClient, ApiError};
use crate::contact::require_non_empty;

#[derive(Serialize)]
struct ExportBody {
    encoding_aeskey: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    block_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tagid: Option<u32>,
}

/// Export job commands
#[derive(Debug, Clone)]
pub struct ExportCommands {
    client: Arc<ApiClient>,
}

impl ExportCommands {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// Export members with basic fields. Returns the job id.
    ///
    /// # Errors
    ///
    /// Returns error on an out-of-range block size or if the request fails
    #[instrument(skip(self, key))]
    pub async fn simple_user(
        &self,
        key: &ExportKey,
        block_size: Option<u32>,
    ) -> Result<String, ApiError> {
        self.start("export/simple_user", key, block_size, None).await
    }

    /// Export members with full details. Returns the job id.
    ///
    /// # Errors
    ///
    /// Returns error on an out-of-range block size or if the request fails
    #[instrument(skip(self, key))]
    pub async fn user(&self, key: &ExportKey, block_size: Option<u32>) -> Result<String, ApiError> {
        self.start("export/user", key, block_size, None).await
    }

    /// # Errors
    ///
    /// Returns error on an out-of-range block size or if the request fails
    #[instrument(skip(self, key))]
    pub async fn department(
        &self,
        key: &ExportKey,
        block_size: Option<u32>,
    ) -> Result<String, ApiError> {
        self.start("export/department", key, block_size, None).await
    }

    /// Export the members of one tag. Returns the job id.
    ///
    /// # Errors
    ///
    /// Returns error on an out-of-range block size or if the request fails
    #[instrument(skip(self, key))]
    pub async fn tag_user(
        &self,
        tagid: u32,
        key: &ExportKey,
        block_size: Option<u32>,
    ) -> Result<String, ApiError> {
        self.start("export/taguser", key, block_size, Some(tagid)).await
    }

    /// Poll an export job
    ///
    /// # Errors
    ///
    /// Returns error on an empty job id or if the request fails
    #[instrument(skip(self))]
    pub async fn result(&self, jobid: &str) -> Result<ExportResult, ApiError> {
        require_non_empty("jobid", jobid)?;
        self.client.get("export/get_result", &[("jobid", jobid.to_string())]).await?.into_typed()
    }

    /// Fetch one file of a finished job and decrypt it.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Integrity`] when the body does not match the
    /// advertised size or MD5, or cannot be decrypted with `key`
    #[instrument(skip(self, key, file), fields(size = file.size))]
    pub async fn download(&self, key: &ExportKey, file: &ExportUrl) -> Result<Vec<u8>, ApiError> {
        let data = self.client.download(&file.url).await?;
        verify_file(&data, file)?;
        let plain = key.decrypt_export(&data)?;
        debug!(bytes = plain.len(), "export file decrypted");
        Ok(plain)
    }

    async fn start(
        &self,
        path: &str,
        key: &ExportKey,
        block_size: Option<u32>,
        tagid: Option<u32>,
    ) -> Result<String, ApiError> {
        if let Some(size) = block_size {
            if !(MIN_EXPORT_BLOCK_SIZE..=MAX_EXPORT_BLOCK_SIZE).contains(&size) {
                return Err(ApiError::invalid_input(format!(
                    "block_size must be {MIN_EXPORT_BLOCK_SIZE}..={MAX_EXPORT_BLOCK_SIZE}, \
                     got {size}"
                )));
            }
        }
        let body = ExportBody { encoding_aeskey: key.encoding_aes_key(), block_size, tagid };
        let jobid = self.client.post(path, &body).await?.string("jobid")?;
        info!(%jobid, path, "export job started");
        Ok(jobid)
    }
}

fn verify_file(data: &[u8], file: &ExportUrl) -> Result<(), ApiError> {
    if data.len() as u64 != file.size {
        return Err(ApiError::Integrity("data size mismatch".into()));
    }
    let digest = hex::encode(Md5::digest(data));
    if !digest.eq_ignore_ascii_case(&file.md5) {
        return Err(ApiError::Integrity("data md5 mismatch".into()));
    }
    Ok(())
}

/// Members from a decrypted user export.
///
/// # Errors
///
/// Returns error if the content is not a member list
pub fn decode_users(plain: &[u8]) -> Result<Vec<User>, ApiError> {
    decode_list(plain, "userlist")
}

/// Departments from a decrypted department export.
///
/// # Errors
///
/// Returns error if the content is not a department list
pub fn decode_departments(plain: &[u8]) -> Result<Vec<Department>, ApiError> {
    decode_list(plain, "department")
}

/// Members of a decrypted tag export.
///
/// # Errors
///
/// Returns error if the content is not a tag member object
pub fn decode_tag_members(plain: &[u8]) -> Result<TagMembers, ApiError> {
    serde_json::from_slice(plain)
        .map_err(|e| ApiError::Client(format!("Failed to decode tag export: {e}")))
}

// Files hold either the bare list or an object wrapping it under `key`.
fn decode_list<T: DeserializeOwned>(plain: &[u8], key: &str) -> Result<Vec<T>, ApiError> {
    let value: Value = serde_json::from_slice(plain)
        .map_err(|e| ApiError::Client(format!("Failed to decode export file: {e}")))?;
    let list = match value {
        Value::Object(mut map) => map.remove(key).unwrap_or(Value::Array(Vec::new())),
        other => other,
    };
    serde_json::from_value(list)
        .map_err(|e| ApiError::Client(format!("Failed to decode export '{key}': {e}")))
}
