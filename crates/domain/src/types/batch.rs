//! Bulk import and export job models

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

use crate::errors::{Result, WecomError};

/// Per-record `errcode`/`errmsg` pair carried by job results and callbacks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceStatus {
    #[serde(default)]
    pub errcode: i64,
    #[serde(default)]
    pub errmsg: String,
}

impl ServiceStatus {
    /// # Errors
    /// Returns `WecomError::Service` when `errcode` is non-zero.
    pub fn check(&self) -> Result<()> {
        if self.errcode == 0 {
            Ok(())
        } else {
            Err(WecomError::service(self.errcode, self.errmsg.clone()))
        }
    }
}

/// Body of `batch/syncuser`, `batch/replaceuser` and `batch/replaceparty`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportRequest {
    /// Media id of the uploaded CSV file.
    pub media_id: String,
    /// Invite newly created members; the service defaults to `true`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_invite: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub callback: Option<ImportCallback>,
}

impl ImportRequest {
    pub fn new(media_id: impl Into<String>) -> Self {
        Self { media_id: media_id.into(), ..Self::default() }
    }
}

/// Where the service pushes the job-finished event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportCallback {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encodingaeskey: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportStatus {
    Started,
    InProgress,
    Completed,
}

impl ImportStatus {
    pub const fn from_code(code: i32) -> Option<Self> {
        match code {
            1 => Some(Self::Started),
            2 => Some(Self::InProgress),
            3 => Some(Self::Completed),
            _ => None,
        }
    }
}

/// Progress and outcome of an import job (`batch/getresult`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImportResult {
    pub status: i32,
    /// `sync_user`, `replace_user` or `replace_party`.
    #[serde(rename = "type", default)]
    pub job_type: String,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub percentage: u8,
    /// Raw per-record results; decode with [`Self::user_results`] or
    /// [`Self::party_results`] depending on `job_type`.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub result: Vec<serde_json::Value>,
}

impl ImportResult {
    pub const fn state(&self) -> Option<ImportStatus> {
        ImportStatus::from_code(self.status)
    }

    pub fn is_completed(&self) -> bool {
        self.state() == Some(ImportStatus::Completed)
    }

    /// # Errors
    /// Returns `WecomError::Serialization` if the records are not user results.
    pub fn user_results(&self) -> Result<Vec<ImportUserResult>> {
        decode_records(&self.result)
    }

    /// # Errors
    /// Returns `WecomError::Serialization` if the records are not party results.
    pub fn party_results(&self) -> Result<Vec<ImportPartyResult>> {
        decode_records(&self.result)
    }
}

/// Unfinished jobs report their record list as `null`.
fn null_as_empty<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

fn decode_records<T: DeserializeOwned>(records: &[serde_json::Value]) -> Result<Vec<T>> {
    records
        .iter()
        .cloned()
        .map(|record| {
            serde_json::from_value(record)
                .map_err(|e| WecomError::Serialization(format!("invalid import record: {e}")))
        })
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportUserResult {
    pub userid: String,
    #[serde(flatten)]
    pub status: ServiceStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportPartyResult {
    /// Bitwise OR of [`PartyAction`] values.
    #[serde(default)]
    pub action: u32,
    pub partyid: u32,
    #[serde(flatten)]
    pub status: ServiceStatus,
}

impl ImportPartyResult {
    pub fn has_action(&self, action: PartyAction) -> bool {
        self.action & action.bit() != 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartyAction {
    Created,
    Renamed,
    Moved,
    Reordered,
}

impl PartyAction {
    pub const fn bit(self) -> u32 {
        match self {
            Self::Created => 1,
            Self::Renamed => 2,
            Self::Moved => 4,
            Self::Reordered => 8,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportStatus {
    Pending,
    Processing,
    Done,
    Failed,
}

impl ExportStatus {
    pub const fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::Pending),
            1 => Some(Self::Processing),
            2 => Some(Self::Done),
            3 => Some(Self::Failed),
            _ => None,
        }
    }
}

/// Outcome of an export job (`export/get_result`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportResult {
    pub status: i32,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub data_list: Vec<ExportUrl>,
}

impl ExportResult {
    pub const fn state(&self) -> Option<ExportStatus> {
        ExportStatus::from_code(self.status)
    }

    pub fn is_done(&self) -> bool {
        self.state() == Some(ExportStatus::Done)
    }
}

/// One encrypted export file. The link supports ranged downloads and
/// expires after two hours.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportUrl {
    pub url: String,
    /// Ciphertext size in bytes.
    pub size: u64,
    /// Hex MD5 of the ciphertext.
    pub md5: String,
}
