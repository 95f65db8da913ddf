//! Domain types and models

pub mod batch;
pub mod callback;
pub mod contact;
pub mod oauth;

pub use batch::{
    ExportResult, ExportStatus, ExportUrl, ImportCallback, ImportPartyResult, ImportRequest,
    ImportResult, ImportStatus, ImportUserResult, PartyAction, ServiceStatus,
};
pub use callback::{BatchJob, CallbackEvent, ChangeType, EventKind, JobType};
pub use contact::{
    Department, DepartmentId, DeptUser, ExternalAttr, ExternalAttrText, ExternalAttrWeb,
    ExternalProfile, Gender, InviteResult, Tag, TagMembers, TagMembershipResult, User, UserStatus,
    WechatChannel,
};
pub use oauth::AuthRequest;
