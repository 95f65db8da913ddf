//! Directory models: users, departments and tags

use serde::{Deserialize, Serialize};

/// Directory member.
///
/// Only `userid` is always present. `name` and `department` are required by
/// `user/create`; every other field is optional and omitted from requests
/// when unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub userid: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub department: Vec<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open_userid: Option<String>,
    /// Sort value per department; must line up with `department`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub order: Vec<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobile: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub biz_mail: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub is_leader_in_dept: Vec<u8>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub direct_leader: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumb_avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telephone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hide_mobile: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub english_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main_department: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qr_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_position: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_profile: Option<ExternalProfile>,
}

impl User {
    /// Minimal member accepted by `user/create`.
    pub fn new(userid: impl Into<String>, name: impl Into<String>, department: Vec<u32>) -> Self {
        Self { userid: userid.into(), name: name.into(), department, ..Self::default() }
    }

    /// Activation state decoded from `status`.
    pub fn status(&self) -> Option<UserStatus> {
        self.status.and_then(UserStatus::from_code)
    }

    /// Gender decoded from the string-typed `gender` field.
    pub fn gender(&self) -> Option<Gender> {
        self.gender.as_deref().map(Gender::from_code)
    }
}

/// Member activation state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserStatus {
    Active,
    Disabled,
    Inactive,
    Left,
}

impl UserStatus {
    pub const fn from_code(code: i32) -> Option<Self> {
        match code {
            1 => Some(Self::Active),
            2 => Some(Self::Disabled),
            4 => Some(Self::Inactive),
            5 => Some(Self::Left),
            _ => None,
        }
    }

    pub const fn code(self) -> i32 {
        match self {
            Self::Active => 1,
            Self::Disabled => 2,
            Self::Inactive => 4,
            Self::Left => 5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gender {
    Undefined,
    Male,
    Female,
}

impl Gender {
    pub fn from_code(code: &str) -> Self {
        match code {
            "1" => Self::Male,
            "2" => Self::Female,
            _ => Self::Undefined,
        }
    }
}

/// Attributes shown to external contacts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_corp_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wechat_channels: Option<WechatChannel>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub external_attr: Vec<ExternalAttr>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WechatChannel {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    /// 0 confirmed, 1 pending confirmation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<i32>,
}

/// Extended attribute. `type` 0 is text, 1 is a web link, 2 a mini program.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalAttr {
    #[serde(rename = "type")]
    pub kind: i32,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<ExternalAttrText>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web: Option<ExternalAttrWeb>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalAttrText {
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalAttrWeb {
    pub url: String,
    pub title: String,
}

/// Targets rejected by `batch/invite`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InviteResult {
    #[serde(default, rename = "invaliduser")]
    pub invalid_users: Vec<String>,
    #[serde(default, rename = "invalidparty")]
    pub invalid_parties: Vec<u32>,
    #[serde(default, rename = "invalidtag")]
    pub invalid_tags: Vec<u32>,
}

impl InviteResult {
    pub fn is_clean(&self) -> bool {
        self.invalid_users.is_empty()
            && self.invalid_parties.is_empty()
            && self.invalid_tags.is_empty()
    }
}

/// Entry of `user/list_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeptUser {
    pub userid: String,
    pub department: u32,
}

/// Department details.
///
/// `id` is optional on create (the service assigns one); `name` and
/// `parentid` are required on create, `id` on update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u32>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_en: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub department_leader: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parentid: Option<u32>,
    /// Larger values sort first within the parent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<u32>,
}

impl Department {
    pub fn new(name: impl Into<String>, parentid: u32) -> Self {
        Self { name: name.into(), parentid: Some(parentid), ..Self::default() }
    }
}

/// Entry of `department/simplelist`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepartmentId {
    pub id: u32,
    #[serde(default)]
    pub parentid: u32,
    #[serde(default)]
    pub order: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub tagid: u32,
    pub tagname: String,
}

/// Members of one tag (`tag/get` and tag exports).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagMembers {
    #[serde(default)]
    pub tagname: String,
    #[serde(default)]
    pub userlist: Vec<User>,
    #[serde(default)]
    pub partylist: Vec<u32>,
}

/// Rejected members of a tag add/remove call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagMembershipResult {
    pub invalid_users: Vec<String>,
    pub invalid_parties: Vec<u32>,
}

impl TagMembershipResult {
    /// Decode the service's `|`-separated `invalidlist`.
    pub fn from_parts(invalidlist: &str, invalid_parties: Vec<u32>) -> Self {
        let invalid_users = invalidlist
            .split('|')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        Self { invalid_users, invalid_parties }
    }

    pub fn is_clean(&self) -> bool {
        self.invalid_users.is_empty() && self.invalid_parties.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn new_user_serializes_only_required_fields() {
        let user = User::new("zhangsan", "Zhang San", vec![1, 2]);
        let value = serde_json::to_value(&user).unwrap();
        assert_eq!(value, json!({"userid": "zhangsan", "name": "Zhang San", "department": [1, 2]}));
    }

    #[test]
    fn user_decodes_status_and_gender() {
        let user: User = serde_json::from_value(json!({
            "userid": "lisi",
            "name": "Li Si",
            "status": 4,
            "gender": "2",
            "extattr": {"attrs": []}
        }))
        .unwrap();
        assert_eq!(user.status(), Some(UserStatus::Inactive));
        assert_eq!(user.gender(), Some(Gender::Female));
        assert_eq!(UserStatus::Inactive.code(), 4);
    }

    #[test]
    fn external_attr_uses_type_key() {
        let attr = ExternalAttr {
            kind: 1,
            name: "site".into(),
            text: None,
            web: Some(ExternalAttrWeb { url: "https://example.com".into(), title: "home".into() }),
        };
        let value = serde_json::to_value(&attr).unwrap();
        assert_eq!(value["type"], 1);
        assert!(value.get("text").is_none());
    }

    #[test]
    fn membership_result_splits_invalid_list() {
        let result = TagMembershipResult::from_parts("usr1|usr2| usr3", vec![2, 4]);
        assert_eq!(result.invalid_users, vec!["usr1", "usr2", "usr3"]);
        assert!(!result.is_clean());
        assert!(TagMembershipResult::from_parts("", vec![]).is_clean());
    }

    #[test]
    fn department_new_sets_parent() {
        let dept = Department::new("R&D", 1);
        let value = serde_json::to_value(&dept).unwrap();
        assert_eq!(value, json!({"name": "R&D", "parentid": 1}));
    }
}
