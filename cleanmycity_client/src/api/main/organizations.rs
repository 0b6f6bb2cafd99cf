use crate::api::types::{
    ExportFormat, Organization, OrganizationDraft, OrganizationList, OrganizationPayload,
};
use crate::client::{ApiError, SessionClient};

impl SessionClient {
    /// Every organization on the platform. Admin only.
    pub async fn organizations(&self) -> Result<Vec<Organization>, ApiError> {
        let list: OrganizationList = self.get("/organizations").await?;
        Ok(list.organizations)
    }

    /// Organizations accepting reports, for the issue submission form.
    /// Works without a session.
    pub async fn public_organizations(&self) -> Result<Vec<Organization>, ApiError> {
        let list: OrganizationList = self.get("/organizations/public").await?;
        Ok(list.organizations)
    }

    /// The signed-in authority's own organization record.
    pub async fn my_organization(&self) -> Result<Organization, ApiError> {
        let payload: OrganizationPayload = self.get("/organizations/me").await?;
        Ok(payload.organization)
    }

    /// Register a new organization. Admin only.
    pub async fn create_organization(&self, draft: &OrganizationDraft) -> Result<(), ApiError> {
        let _: serde_json::Value = self.post("/organizations", draft).await?;
        Ok(())
    }

    /// Update an organization's contact details. Admin only.
    pub async fn update_organization(
        &self,
        organization_id: i64,
        draft: &OrganizationDraft,
    ) -> Result<(), ApiError> {
        let _: serde_json::Value = self
            .put(&format!("/organizations/{organization_id}"), draft)
            .await?;
        Ok(())
    }

    /// Remove an organization from the platform. Admin only.
    pub async fn delete_organization(&self, organization_id: i64) -> Result<(), ApiError> {
        let _: serde_json::Value = self
            .delete(&format!("/organizations/{organization_id}"))
            .await?;
        Ok(())
    }

    /// Activate or deactivate an organization account. Admin only.
    /// The route carries the whole intent; no body travels.
    pub async fn set_organization_active(
        &self,
        organization_id: i64,
        active: bool,
    ) -> Result<(), ApiError> {
        let action = if active { "activate" } else { "deactivate" };
        let _: serde_json::Value = self
            .put_empty(&format!("/organizations/{organization_id}/{action}"))
            .await?;
        Ok(())
    }

    /// Download an organization's issue report in the given format.
    /// Returns the raw file bytes for the caller to save or stream.
    pub async fn export_organization_report(
        &self,
        organization_id: i64,
        format: ExportFormat,
    ) -> Result<Vec<u8>, ApiError> {
        self.get_bytes(
            &format!("/organizations/{organization_id}/export"),
            &[("format", format.as_str())],
        )
        .await
    }
}
