//! Directory management: members, departments and tags.

pub mod department;
pub mod tag;
pub mod user;

pub use department::DepartmentCommands;
pub use tag::TagCommands;
pub use user::{InviteTargets, UserCommands};

use crate::api::ApiError;

/// Reject blank identifiers before any request is made.
pub(crate) fn require_non_empty(field: &str, value: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        Err(ApiError::invalid_input(format!("{field} must not be empty")))
    } else {
        Ok(())
    }
}

/// Identifier field of `user/getuserinfo`; older responses capitalize it.
pub(crate) fn userid_from_userinfo(
    body: &crate::api::ResponseBody,
) -> Result<Option<String>, ApiError> {
    for key in ["userid", "UserId"] {
        if let Some(userid) = body.optional::<String>(key)? {
            if !userid.is_empty() {
                return Ok(Some(userid));
            }
        }
    }
    Ok(None)
}
