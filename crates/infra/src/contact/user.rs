//! Member endpoints (`user/*`, `batch/invite`, `corp/get_join_qrcode`)

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, instrument};
use wecom_domain::constants::{MAX_LIST_ID_LIMIT, MIN_LIST_ID_LIMIT};
use wecom_domain::{DeptUser, InviteResult, User};

use super::{require_non_empty, userid_from_userinfo};
use crate::api::{ApiClient, ApiError};

#[derive(Serialize)]
struct UseridList<'a> {
    useridlist: &'a [String],
}

#[derive(Serialize)]
struct UseridBody<'a> {
    userid: &'a str,
}

#[derive(Serialize)]
struct OpenidBody<'a> {
    openid: &'a str,
}

#[derive(Serialize)]
struct MobileBody<'a> {
    mobile: &'a str,
}

#[derive(Serialize)]
struct EmailBody<'a> {
    email: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    email_type: Option<u8>,
}

#[derive(Serialize)]
struct ListIdBody<'a> {
    #[serde(skip_serializing_if = "str::is_empty")]
    cursor: &'a str,
    limit: u32,
}

/// Recipients of a `batch/invite` call. Empty lists are left out of the
/// request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InviteTargets {
    #[serde(rename = "user", skip_serializing_if = "Vec::is_empty")]
    pub users: Vec<String>,
    #[serde(rename = "party", skip_serializing_if = "Vec::is_empty")]
    pub parties: Vec<u32>,
    #[serde(rename = "tag", skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<u32>,
}

impl InviteTargets {
    pub fn users(users: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self { users: users.into_iter().map(Into::into).collect(), ..Self::default() }
    }

    #[must_use]
    pub fn with_parties(mut self, parties: impl IntoIterator<Item = u32>) -> Self {
        self.parties.extend(parties);
        self
    }

    #[must_use]
    pub fn with_tags(mut self, tags: impl IntoIterator<Item = u32>) -> Self {
        self.tags.extend(tags);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty() && self.parties.is_empty() && self.tags.is_empty()
    }
}

/// Member management commands
#[derive(Debug, Clone)]
pub struct UserCommands {
    client: Arc<ApiClient>,
}

impl UserCommands {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// Create a member. `userid`, `name` and at least one department are
    /// required.
    ///
    /// # Errors
    ///
    /// Returns error on invalid input or if the service rejects the member
    #[instrument(skip(self, user), fields(userid = %user.userid))]
    pub async fn create(&self, user: &User) -> Result<(), ApiError> {
        require_non_empty("userid", &user.userid)?;
        require_non_empty("name", &user.name)?;
        if user.department.is_empty() {
            return Err(ApiError::invalid_input("department must not be empty"));
        }

        self.client.post("user/create", user).await?;
        debug!("member created");
        Ok(())
    }

    /// Read one member
    ///
    /// # Errors
    ///
    /// Returns error if the member does not exist or the request fails
    #[instrument(skip(self))]
    pub async fn get(&self, userid: &str) -> Result<User, ApiError> {
        require_non_empty("userid", userid)?;
        self.client.get("user/get", &[("userid", userid.to_string())]).await?.into_typed()
    }

    /// Members of a department with `userid`, `name`, `department` and
    /// `open_userid` only
    ///
    /// # Errors
    ///
    /// Returns error if the request fails
    #[instrument(skip(self))]
    pub async fn simple_list(&self, department_id: u32) -> Result<Vec<User>, ApiError> {
        self.list_from("user/simplelist", department_id).await
    }

    /// Members of a department with full details
    ///
    /// # Errors
    ///
    /// Returns error if the request fails
    #[instrument(skip(self))]
    pub async fn list(&self, department_id: u32) -> Result<Vec<User>, ApiError> {
        self.list_from("user/list", department_id).await
    }

    async fn list_from(&self, path: &str, department_id: u32) -> Result<Vec<User>, ApiError> {
        let body =
            self.client.get(path, &[("department_id", department_id.to_string())]).await?;
        let users: Vec<User> = body.optional("userlist")?.unwrap_or_default();
        debug!(count = users.len(), "members listed");
        Ok(users)
    }

    /// Update a member; only set fields are sent
    ///
    /// # Errors
    ///
    /// Returns error on invalid input or if the service rejects the update
    #[instrument(skip(self, user), fields(userid = %user.userid))]
    pub async fn update(&self, user: &User) -> Result<(), ApiError> {
        require_non_empty("userid", &user.userid)?;
        self.client.post("user/update", user).await?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns error if the member does not exist or the request fails
    #[instrument(skip(self))]
    pub async fn delete(&self, userid: &str) -> Result<(), ApiError> {
        require_non_empty("userid", userid)?;
        self.client.get("user/delete", &[("userid", userid.to_string())]).await?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns error if the list is empty or the request fails
    #[instrument(skip(self, userids), fields(count = userids.len()))]
    pub async fn batch_delete(&self, userids: &[String]) -> Result<(), ApiError> {
        if userids.is_empty() {
            return Err(ApiError::invalid_input("useridlist must not be empty"));
        }
        self.client.post("user/batchdelete", &UseridList { useridlist: userids }).await?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns error if the request fails
    #[instrument(skip(self))]
    pub async fn convert_to_openid(&self, userid: &str) -> Result<String, ApiError> {
        require_non_empty("userid", userid)?;
        self.client.post("user/convert_to_openid", &UseridBody { userid }).await?.string("openid")
    }

    /// # Errors
    ///
    /// Returns error if the request fails
    #[instrument(skip(self))]
    pub async fn convert_to_userid(&self, openid: &str) -> Result<String, ApiError> {
        require_non_empty("openid", openid)?;
        self.client.post("user/convert_to_userid", &OpenidBody { openid }).await?.string("userid")
    }

    /// Confirm second-factor verification of a member
    ///
    /// # Errors
    ///
    /// Returns error if the request fails
    #[instrument(skip(self))]
    pub async fn auth_succ(&self, userid: &str) -> Result<(), ApiError> {
        require_non_empty("userid", userid)?;
        self.client.get("user/authsucc", &[("userid", userid.to_string())]).await?;
        Ok(())
    }

    /// Invite members, departments or tags to join
    ///
    /// # Errors
    ///
    /// Returns error if no target is given or the request fails
    #[instrument(skip(self, targets))]
    pub async fn batch_invite(&self, targets: &InviteTargets) -> Result<InviteResult, ApiError> {
        if targets.is_empty() {
            return Err(ApiError::invalid_input("at least one of user, party or tag is required"));
        }
        let result: InviteResult = self.client.post("batch/invite", targets).await?.into_typed()?;
        if !result.is_clean() {
            debug!(
                invalid_users = result.invalid_users.len(),
                invalid_parties = result.invalid_parties.len(),
                invalid_tags = result.invalid_tags.len(),
                "invite partially rejected"
            );
        }
        Ok(result)
    }

    /// Join QR code link. `size_type` ranges over 1..=4.
    ///
    /// # Errors
    ///
    /// Returns error on an invalid size or if the request fails
    #[instrument(skip(self))]
    pub async fn join_qrcode(&self, size_type: Option<u8>) -> Result<String, ApiError> {
        let mut query = Vec::new();
        if let Some(size) = size_type {
            if !(1..=4).contains(&size) {
                return Err(ApiError::invalid_input(format!("size_type must be 1..=4, got {size}")));
            }
            query.push(("size_type", size.to_string()));
        }
        self.client.get("corp/get_join_qrcode", &query).await?.string("join_qrcode")
    }

    /// # Errors
    ///
    /// Returns error if no member has this mobile or the request fails
    #[instrument(skip(self, mobile))]
    pub async fn userid_by_mobile(&self, mobile: &str) -> Result<String, ApiError> {
        require_non_empty("mobile", mobile)?;
        self.client.post("user/getuserid", &MobileBody { mobile }).await?.string("userid")
    }

    /// `email_type` is 1 for corp mail and 2 for personal mail.
    ///
    /// # Errors
    ///
    /// Returns error on an invalid type or if the request fails
    #[instrument(skip(self, email))]
    pub async fn userid_by_email(
        &self,
        email: &str,
        email_type: Option<u8>,
    ) -> Result<String, ApiError> {
        require_non_empty("email", email)?;
        if let Some(kind) = email_type {
            if !(1..=2).contains(&kind) {
                return Err(ApiError::invalid_input(format!(
                    "email_type must be 1 or 2, got {kind}"
                )));
            }
        }
        self.client
            .post("user/get_userid_by_email", &EmailBody { email, email_type })
            .await?
            .string("userid")
    }

    /// One page of `(userid, department)` pairs. An empty cursor starts from
    /// the beginning; an empty returned cursor means the last page.
    ///
    /// # Errors
    ///
    /// Returns error on an out-of-range limit or if the request fails
    #[instrument(skip(self))]
    pub async fn list_ids(
        &self,
        cursor: &str,
        limit: u32,
    ) -> Result<(String, Vec<DeptUser>), ApiError> {
        if !(MIN_LIST_ID_LIMIT..=MAX_LIST_ID_LIMIT).contains(&limit) {
            return Err(ApiError::invalid_input(format!(
                "limit must be {MIN_LIST_ID_LIMIT}..={MAX_LIST_ID_LIMIT}, got {limit}"
            )));
        }
        let body = self.client.post("user/list_id", &ListIdBody { cursor, limit }).await?;
        let next_cursor = body.optional::<String>("next_cursor")?.unwrap_or_default();
        let users = body.optional::<Vec<DeptUser>>("dept_user")?.unwrap_or_default();
        Ok((next_cursor, users))
    }

    /// Resolve a login `code` to the member's userid.
    ///
    /// # Errors
    ///
    /// Returns error if the code is invalid, belongs to a non-member, or the
    /// request fails
    #[instrument(skip(self, code))]
    pub async fn userid_from_code(&self, code: &str) -> Result<String, ApiError> {
        require_non_empty("code", code)?;
        let body = self.client.get("user/getuserinfo", &[("code", code.to_string())]).await?;
        userid_from_userinfo(&body)?
            .ok_or_else(|| ApiError::Client("Response is missing field 'userid'".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invite_targets_omit_empty_lists() {
        let targets = InviteTargets::users(["zhangsan"]).with_tags([3]);
        let json = serde_json::to_value(&targets).unwrap();
        assert_eq!(json, serde_json::json!({"user": ["zhangsan"], "tag": [3]}));
        assert!(InviteTargets::default().is_empty());
    }

    #[test]
    fn list_id_body_skips_empty_cursor() {
        let json = serde_json::to_value(ListIdBody { cursor: "", limit: 100 }).unwrap();
        assert_eq!(json, serde_json::json!({"limit": 100}));
    }

    #[test]
    fn email_body_sends_type_as_number() {
        let json = serde_json::to_value(EmailBody { email: "a@b.c", email_type: Some(2) }).unwrap();
        assert_eq!(json, serde_json::json!({"email": "a@b.c", "email_type": 2}));
    }
}
