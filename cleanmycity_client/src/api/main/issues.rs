use reqwest::multipart::{Form, Part};

use crate::api::types::{
    Issue, IssueList, IssueQueue, IssueStatus, IssueSubmission, NewIssue, StatusUpdate,
};
use crate::client::{ApiError, SessionClient};

impl SessionClient {
    /// Issues reported by the signed-in citizen.
    pub async fn my_issues(&self) -> Result<Vec<Issue>, ApiError> {
        let list: IssueList = self.get("/issues/my-issues").await?;
        Ok(list.issues)
    }

    /// Every issue on the platform. Admin only.
    pub async fn all_issues(&self) -> Result<Vec<Issue>, ApiError> {
        let list: IssueList = self.get("/issues/all").await?;
        Ok(list.issues)
    }

    /// The signed-in organization's work queue.
    pub async fn issue_queue(&self) -> Result<IssueQueue, ApiError> {
        self.get("/issues/queue").await
    }

    /// Submit a new issue report, with the photo attached when given.
    ///
    /// The backend folds near-identical open reports into the existing issue
    /// instead of rejecting them; the returned submission says whether that
    /// happened.
    pub async fn report_issue(&self, issue: NewIssue) -> Result<IssueSubmission, ApiError> {
        let form = issue_form(issue)?;
        self.post_multipart_full("/issues", form).await
    }

    /// Move an issue through its lifecycle. Authority only.
    pub async fn update_issue_status(
        &self,
        issue_id: i64,
        status: IssueStatus,
    ) -> Result<(), ApiError> {
        let _: serde_json::Value = self
            .put(
                &format!("/issues/{issue_id}/status"),
                &StatusUpdate { status },
            )
            .await?;
        Ok(())
    }

    /// Raw bytes of the photo attached to an issue.
    pub async fn issue_image(&self, issue_id: i64) -> Result<Vec<u8>, ApiError> {
        self.get_bytes(&format!("/issues/{issue_id}/image"), &[]).await
    }
}

/// Lay an issue report out as the multipart form the backend expects.
/// Coordinates travel as text fields and only when set.
fn issue_form(issue: NewIssue) -> Result<Form, ApiError> {
    let mut form = Form::new()
        .text("title", issue.title)
        .text("description", issue.description)
        .text("organization_id", issue.organization_id.to_string());

    if let Some(latitude) = issue.latitude {
        form = form.text("latitude", latitude.to_string());
    }
    if let Some(longitude) = issue.longitude {
        form = form.text("longitude", longitude.to_string());
    }
    if let Some(image) = issue.image {
        let part = Part::bytes(image.bytes)
            .file_name(image.file_name)
            .mime_str(&image.content_type)
            .map_err(|e| ApiError::InvalidRequest(e.to_string()))?;
        form = form.part("image", part);
    }

    Ok(form)
}
