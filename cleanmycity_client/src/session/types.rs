use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Account role as issued by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Citizen,
    Authority,
    Admin,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Citizen => write!(f, "CITIZEN"),
            Role::Authority => write!(f, "AUTHORITY"),
            Role::Admin => write!(f, "ADMIN"),
        }
    }
}

/// Account profile as returned by the backend and persisted alongside the
/// bearer token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: Role,
    pub is_active: Option<bool>,
    pub created_at: Option<DateTime<Utc>>,
}

/// Notification emitted by the session layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// The backend rejected the session; local credentials were cleared.
    Unauthenticated,
}
