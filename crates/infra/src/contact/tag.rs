//! Tag endpoints (`tag/*`)

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, instrument, warn};
use wecom_domain::constants::{MAX_TAG_PARTIES_PER_REQUEST, MAX_TAG_USERS_PER_REQUEST};
use wecom_domain::{Tag, TagMembers, TagMembershipResult};

use super::require_non_empty;
use crate::api::{ApiClient, ApiError, ResponseBody};

#[derive(Serialize)]
struct TagBody<'a> {
    tagname: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    tagid: Option<u32>,
}

#[derive(Serialize)]
struct MembershipBody<'a> {
    tagid: u32,
    #[serde(skip_serializing_if = "<[String]>::is_empty")]
    userlist: &'a [String],
    #[serde(skip_serializing_if = "<[u32]>::is_empty")]
    partylist: &'a [u32],
}

impl<'a> MembershipBody<'a> {
    fn new(tagid: u32, users: &'a [String], parties: &'a [u32]) -> Result<Self, ApiError> {
        if users.is_empty() && parties.is_empty() {
            return Err(ApiError::invalid_input("userlist and partylist cannot both be empty"));
        }
        if users.len() > MAX_TAG_USERS_PER_REQUEST {
            return Err(ApiError::invalid_input(format!(
                "userlist holds {} entries, at most {MAX_TAG_USERS_PER_REQUEST} allowed",
                users.len()
            )));
        }
        if parties.len() > MAX_TAG_PARTIES_PER_REQUEST {
            return Err(ApiError::invalid_input(format!(
                "partylist holds {} entries, at most {MAX_TAG_PARTIES_PER_REQUEST} allowed",
                parties.len()
            )));
        }
        Ok(Self { tagid, userlist: users, partylist: parties })
    }
}

/// Tag management commands
#[derive(Debug, Clone)]
pub struct TagCommands {
    client: Arc<ApiClient>,
}

impl TagCommands {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// Create a tag. Without `tagid` the service assigns one.
    ///
    /// # Errors
    ///
    /// Returns error on an empty name or if the request fails
    #[instrument(skip(self))]
    pub async fn create(&self, tagname: &str, tagid: Option<u32>) -> Result<u32, ApiError> {
        require_non_empty("tagname", tagname)?;
        let tagid: u32 =
            self.client.post("tag/create", &TagBody { tagname, tagid }).await?.field("tagid")?;
        debug!(tagid, "tag created");
        Ok(tagid)
    }

    /// Rename a tag
    ///
    /// # Errors
    ///
    /// Returns error on an empty name or if the request fails
    #[instrument(skip(self))]
    pub async fn update(&self, tagid: u32, tagname: &str) -> Result<(), ApiError> {
        require_non_empty("tagname", tagname)?;
        self.client.post("tag/update", &TagBody { tagname, tagid: Some(tagid) }).await?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns error if the request fails
    #[instrument(skip(self))]
    pub async fn delete(&self, tagid: u32) -> Result<(), ApiError> {
        self.client.get("tag/delete", &[("tagid", tagid.to_string())]).await?;
        Ok(())
    }

    /// Name, members and departments of a tag
    ///
    /// # Errors
    ///
    /// Returns error if the request fails
    #[instrument(skip(self))]
    pub async fn members(&self, tagid: u32) -> Result<TagMembers, ApiError> {
        self.client.get("tag/get", &[("tagid", tagid.to_string())]).await?.into_typed()
    }

    /// # Errors
    ///
    /// Returns error when both lists are empty, a list is over its limit, or
    /// the request fails
    #[instrument(skip(self, users, parties), fields(users = users.len(), parties = parties.len()))]
    pub async fn add_members(
        &self,
        tagid: u32,
        users: &[String],
        parties: &[u32],
    ) -> Result<TagMembershipResult, ApiError> {
        let body = MembershipBody::new(tagid, users, parties)?;
        membership_result(&self.client.post("tag/addtagusers", &body).await?)
    }

    /// # Errors
    ///
    /// Returns error when both lists are empty, a list is over its limit, or
    /// the request fails
    #[instrument(skip(self, users, parties), fields(users = users.len(), parties = parties.len()))]
    pub async fn remove_members(
        &self,
        tagid: u32,
        users: &[String],
        parties: &[u32],
    ) -> Result<TagMembershipResult, ApiError> {
        let body = MembershipBody::new(tagid, users, parties)?;
        membership_result(&self.client.post("tag/deltagusers", &body).await?)
    }

    /// # Errors
    ///
    /// Returns error if the request fails
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Tag>, ApiError> {
        let body = self.client.get("tag/list", &[]).await?;
        Ok(body.optional("taglist")?.unwrap_or_default())
    }
}

fn membership_result(body: &ResponseBody) -> Result<TagMembershipResult, ApiError> {
    let invalidlist = body.optional::<String>("invalidlist")?.unwrap_or_default();
    let invalidparty = body.optional::<Vec<u32>>("invalidparty")?.unwrap_or_default();
    let result = TagMembershipResult::from_parts(&invalidlist, invalidparty);
    if !result.is_clean() {
        warn!(
            invalid_users = result.invalid_users.len(),
            invalid_parties = result.invalid_parties.len(),
            "tag membership partially applied"
        );
    }
    Ok(result)
}
