use serde::{Deserialize, Serialize};

use crate::session::{Role, User};

/// Payload for `POST /auth/login`.
#[derive(Serialize, Debug)]
pub(crate) struct LoginRequest<'a> {
    pub(crate) email: &'a str,
    pub(crate) password: &'a str,
}

/// Payload of a successful login, found under the response envelope.
#[derive(Deserialize, Debug)]
pub(crate) struct LoginData {
    pub(crate) token: String,
    pub(crate) user: User,
}

/// Payload for `POST /auth/register`.
#[derive(Serialize, Debug, Clone)]
pub struct Registration {
    pub full_name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub password: String,
    pub role: Role,
}

impl Registration {
    /// Registration for a citizen account, the only self-service role.
    pub fn citizen(
        full_name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
        phone: Option<String>,
    ) -> Self {
        Self {
            full_name: full_name.into(),
            email: email.into(),
            phone,
            password: password.into(),
            role: Role::Citizen,
        }
    }
}

/// Error body shape shared by all backend endpoints.
#[derive(Deserialize, Debug)]
pub(crate) struct ErrorEnvelope {
    pub(crate) message: Option<String>,
}
