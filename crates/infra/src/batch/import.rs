//! Bulk import jobs (`batch/*`)
//!
//! The CSV file is uploaded beforehand through the media API; these calls
//! only start jobs from its `media_id` and poll their results.

use std::sync::Arc;

use tracing::{info, instrument};
use wecom_domain::{ImportRequest, ImportResult};

use crate::api::{ApiClient, ApiError};
use crate::contact::require_non_empty;

/// Import job commands
#[derive(Debug, Clone)]
pub struct ImportCommands {
    client: Arc<ApiClient>,
}

impl ImportCommands {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// Incrementally update members. Returns the job id.
    ///
    /// # Errors
    ///
    /// Returns error on an empty `media_id` or if the request fails
    #[instrument(skip(self, request), fields(media_id = %request.media_id))]
    pub async fn sync_user(&self, request: &ImportRequest) -> Result<String, ApiError> {
        self.start("batch/syncuser", request).await
    }

    /// Replace all members with the file contents. Returns the job id.
    ///
    /// # Errors
    ///
    /// Returns error on an empty `media_id` or if the request fails
    #[instrument(skip(self, request), fields(media_id = %request.media_id))]
    pub async fn replace_user(&self, request: &ImportRequest) -> Result<String, ApiError> {
        self.start("batch/replaceuser", request).await
    }

    /// Replace the department tree. Invitations never apply to departments,
    /// so `to_invite` is always sent as `false`.
    ///
    /// # Errors
    ///
    /// Returns error on an empty `media_id` or if the request fails
    #[instrument(skip(self, request), fields(media_id = %request.media_id))]
    pub async fn replace_party(&self, request: &ImportRequest) -> Result<String, ApiError> {
        let request = ImportRequest { to_invite: Some(false), ..request.clone() };
        self.start("batch/replaceparty", &request).await
    }

    /// Poll a job. `result` is filled once the job completes.
    ///
    /// # Errors
    ///
    /// Returns error on an empty job id or if the request fails
    #[instrument(skip(self))]
    pub async fn result(&self, jobid: &str) -> Result<ImportResult, ApiError> {
        require_non_empty("jobid", jobid)?;
        self.client.get("batch/getresult", &[("jobid", jobid.to_string())]).await?.into_typed()
    }

    async fn start(&self, path: &str, request: &ImportRequest) -> Result<String, ApiError> {
        require_non_empty("media_id", &request.media_id)?;
        let jobid = self.client.post(path, request).await?.string("jobid")?;
        info!(%jobid, path, "import job started");
        Ok(jobid)
    }
}
