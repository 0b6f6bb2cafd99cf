use crate::api::types::{ActiveUpdate, PasswordChange, ProfileUpdate, UserList, UserPayload};
use crate::client::{ApiError, SessionClient};
use crate::session::User;

impl SessionClient {
    /// Every registered user. Admin only.
    pub async fn users(&self) -> Result<Vec<User>, ApiError> {
        let list: UserList = self.get("/users").await?;
        Ok(list.users)
    }

    /// The signed-in user's profile as the backend holds it.
    pub async fn profile(&self) -> Result<User, ApiError> {
        let payload: UserPayload = self.get("/users/profile").await?;
        Ok(payload.user)
    }

    /// Update the signed-in user's profile and return the saved record.
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<User, ApiError> {
        let payload: UserPayload = self.put("/users/profile", update).await?;
        Ok(payload.user)
    }

    /// Change the signed-in user's password.
    pub async fn change_password(&self, change: &PasswordChange) -> Result<(), ApiError> {
        let _: serde_json::Value = self.put("/users/password", change).await?;
        Ok(())
    }

    /// Activate or deactivate an account. Admin only.
    pub async fn set_user_active(&self, user_id: i64, is_active: bool) -> Result<(), ApiError> {
        let _: serde_json::Value = self
            .put(
                &format!("/users/{user_id}/toggle-active"),
                &ActiveUpdate { is_active },
            )
            .await?;
        Ok(())
    }

    /// Remove an account from the platform. Admin only.
    pub async fn delete_user(&self, user_id: i64) -> Result<(), ApiError> {
        let _: serde_json::Value = self.delete(&format!("/users/{user_id}")).await?;
        Ok(())
    }
}
