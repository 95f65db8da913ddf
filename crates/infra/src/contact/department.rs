//! Department endpoints (`department/*`)

use std::sync::Arc;

use tracing::{debug, instrument};
use wecom_domain::{Department, DepartmentId};

use super::require_non_empty;
use crate::api::{ApiClient, ApiError};

/// Department management commands
#[derive(Debug, Clone)]
pub struct DepartmentCommands {
    client: Arc<ApiClient>,
}

impl DepartmentCommands {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// Create a department and return its id.
    ///
    /// # Errors
    ///
    /// Returns error when `name` or `parentid` is missing or the service
    /// rejects the department
    #[instrument(skip(self, department), fields(name = %department.name))]
    pub async fn create(&self, department: &Department) -> Result<u32, ApiError> {
        require_non_empty("name", &department.name)?;
        if department.parentid.is_none() {
            return Err(ApiError::invalid_input("parentid is required"));
        }

        let id: u32 = self.client.post("department/create", department).await?.field("id")?;
        debug!(id, "department created");
        Ok(id)
    }

    /// # Errors
    ///
    /// Returns error when `id` is missing or the request fails
    #[instrument(skip(self, department), fields(id = ?department.id))]
    pub async fn update(&self, department: &Department) -> Result<(), ApiError> {
        if department.id.is_none() {
            return Err(ApiError::invalid_input("id is required"));
        }
        self.client.post("department/update", department).await?;
        Ok(())
    }

    /// Delete an empty department (no members, no children)
    ///
    /// # Errors
    ///
    /// Returns error if the request fails
    #[instrument(skip(self))]
    pub async fn delete(&self, id: u32) -> Result<(), ApiError> {
        self.client.get("department/delete", &[("id", id.to_string())]).await?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns error if the department does not exist or the request fails
    #[instrument(skip(self))]
    pub async fn get(&self, id: u32) -> Result<Department, ApiError> {
        self.client.get("department/get", &[("id", id.to_string())]).await?.field("department")
    }

    /// Department `id` and all its descendants, or the whole tree when `id`
    /// is `None`.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails
    #[instrument(skip(self))]
    pub async fn list(&self, id: Option<u32>) -> Result<Vec<Department>, ApiError> {
        let body = self.client.get("department/list", &subtree_query(id)).await?;
        Ok(body.optional("department")?.unwrap_or_default())
    }

    /// Ids only, same scope as [`Self::list`].
    ///
    /// # Errors
    ///
    /// Returns error if the request fails
    #[instrument(skip(self))]
    pub async fn simple_list(&self, id: Option<u32>) -> Result<Vec<DepartmentId>, ApiError> {
        let body = self.client.get("department/simplelist", &subtree_query(id)).await?;
        Ok(body.optional("department_id")?.unwrap_or_default())
    }
}

fn subtree_query(id: Option<u32>) -> Vec<(&'static str, String)> {
    id.map(|id| vec![("id", id.to_string())]).unwrap_or_default()
}
