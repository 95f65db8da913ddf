//! Inbound callback event models
//!
//! Events are pushed as XML documents. Only the fields used by the
//! directory callbacks are modelled; unknown elements are ignored.

use serde::{Deserialize, Serialize};

use super::batch::ServiceStatus;

/// Callback event envelope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallbackEvent {
    /// Corp id of the receiver.
    #[serde(rename = "ToUserName", default)]
    pub to_user_name: String,
    /// Sender; `sys` for service-generated events.
    #[serde(rename = "FromUserName", default)]
    pub from_user_name: String,
    #[serde(rename = "CreateTime", default)]
    pub create_time: i64,
    #[serde(rename = "MsgType", default)]
    pub msg_type: String,
    #[serde(rename = "Event", default)]
    pub event: String,
    #[serde(rename = "ChangeType", default, skip_serializing_if = "Option::is_none")]
    pub change_type: Option<String>,
    /// Affected member for `*_user` contact changes.
    #[serde(rename = "UserID", default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    /// Affected department for `*_party` contact changes.
    #[serde(rename = "Id", default, skip_serializing_if = "Option::is_none")]
    pub party_id: Option<u32>,
    /// Affected tag for `update_tag`.
    #[serde(rename = "TagId", default, skip_serializing_if = "Option::is_none")]
    pub tag_id: Option<u32>,
    #[serde(rename = "BatchJob", default, skip_serializing_if = "Option::is_none")]
    pub batch_job: Option<BatchJob>,
}

impl CallbackEvent {
    /// Classify the event by `Event` and its sub-type.
    pub fn kind(&self) -> EventKind {
        match self.event.as_str() {
            "batch_job_result" => EventKind::BatchJobResult(
                self.batch_job
                    .as_ref()
                    .map_or(JobType::Unknown(String::new()), |job| JobType::parse(&job.job_type)),
            ),
            "change_contact" => EventKind::ChangeContact(ChangeType::parse(
                self.change_type.as_deref().unwrap_or_default(),
            )),
            other => EventKind::Other(other.to_string()),
        }
    }
}

/// Finished bulk job reported by a `batch_job_result` event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchJob {
    #[serde(rename = "JobId", default)]
    pub job_id: String,
    #[serde(rename = "JobType", default)]
    pub job_type: String,
    #[serde(rename = "ErrCode", default)]
    pub errcode: i64,
    #[serde(rename = "ErrMsg", default)]
    pub errmsg: String,
}

impl BatchJob {
    pub fn kind(&self) -> JobType {
        JobType::parse(&self.job_type)
    }

    pub fn status(&self) -> ServiceStatus {
        ServiceStatus { errcode: self.errcode, errmsg: self.errmsg.clone() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    BatchJobResult(JobType),
    ChangeContact(ChangeType),
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobType {
    ExportUser,
    ExportSimpleUser,
    ExportDepartment,
    ExportTag,
    SyncUser,
    ReplaceUser,
    InviteUser,
    ReplaceParty,
    Unknown(String),
}

impl JobType {
    pub fn parse(value: &str) -> Self {
        match value {
            "export_user" => Self::ExportUser,
            "export_simple_user" => Self::ExportSimpleUser,
            "export_department" => Self::ExportDepartment,
            "export_tag" => Self::ExportTag,
            "sync_user" => Self::SyncUser,
            "replace_user" => Self::ReplaceUser,
            "invite_user" => Self::InviteUser,
            "replace_party" => Self::ReplaceParty,
            other => Self::Unknown(other.to_string()),
        }
    }

    pub const fn is_export(&self) -> bool {
        matches!(
            self,
            Self::ExportUser | Self::ExportSimpleUser | Self::ExportDepartment | Self::ExportTag
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeType {
    CreateUser,
    UpdateUser,
    DeleteUser,
    CreateParty,
    UpdateParty,
    DeleteParty,
    UpdateTag,
    Unknown(String),
}

impl ChangeType {
    pub fn parse(value: &str) -> Self {
        match value {
            "create_user" => Self::CreateUser,
            "update_user" => Self::UpdateUser,
            "delete_user" => Self::DeleteUser,
            "create_party" => Self::CreateParty,
            "update_party" => Self::UpdateParty,
            "delete_party" => Self::DeleteParty,
            "update_tag" => Self::UpdateTag,
            other => Self::Unknown(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn job_type_parsing() {
        assert_eq!(JobType::parse("export_tag"), JobType::ExportTag);
        assert!(JobType::parse("export_simple_user").is_export());
        assert!(!JobType::parse("sync_user").is_export());
        assert_eq!(JobType::parse("nope"), JobType::Unknown("nope".into()));
    }

    #[test]
    fn kind_for_contact_change() {
        let event = CallbackEvent {
            msg_type: "event".into(),
            event: "change_contact".into(),
            change_type: Some("delete_party".into()),
            ..CallbackEvent::default()
        };
        assert_eq!(event.kind(), EventKind::ChangeContact(ChangeType::DeleteParty));
    }

    #[test]
    fn kind_for_batch_job() {
        let event = CallbackEvent {
            event: "batch_job_result".into(),
            batch_job: Some(BatchJob {
                job_id: "job-1".into(),
                job_type: "replace_party".into(),
                errcode: 0,
                errmsg: "ok".into(),
            }),
            ..CallbackEvent::default()
        };
        assert_eq!(event.kind(), EventKind::BatchJobResult(JobType::ReplaceParty));
    }

    #[test]
    fn kind_for_other_event() {
        let event = CallbackEvent { event: "enter_agent".into(), ..CallbackEvent::default() };
        assert_eq!(event.kind(), EventKind::Other("enter_agent".into()));
    }
}
