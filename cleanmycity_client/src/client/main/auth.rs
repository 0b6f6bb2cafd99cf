use crate::client::errors::ApiError;
use crate::client::types::{LoginData, LoginRequest, Registration};
use crate::session::User;

use super::core::SessionClient;

impl SessionClient {
    /// Authenticate against the backend and establish the local session.
    ///
    /// On success the token and the user profile are persisted together and
    /// the signed-in user is returned.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, ApiError> {
        let data: LoginData = self
            .post("/auth/login", &LoginRequest { email, password })
            .await?;
        self.session()
            .establish(data.token, data.user.clone())
            .await?;
        tracing::info!(user_id = data.user.id, "Session established");
        Ok(data.user)
    }

    /// Create an account. No session is established; callers sign in next.
    pub async fn register(&self, registration: &Registration) -> Result<(), ApiError> {
        let _: serde_json::Value = self.post("/auth/register", registration).await?;
        tracing::info!("Account registered for {}", registration.email);
        Ok(())
    }

    /// Sign out. The backend call is best effort; local credentials are
    /// always cleared, even when the backend is unreachable.
    pub async fn logout(&self) -> Result<(), ApiError> {
        if let Err(e) = self.post_empty::<serde_json::Value>("/auth/logout").await {
            tracing::debug!("Logout request failed, clearing the session anyway: {}", e);
        }
        self.session().clear().await?;
        Ok(())
    }
}
