use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::session::User;

/// Lifecycle of a reported issue, as the backend spells it on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueStatus {
    Pending,
    InProgress,
    Resolved,
}

impl std::fmt::Display for IssueStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "PENDING"),
            Self::InProgress => write!(f, "IN_PROGRESS"),
            Self::Resolved => write!(f, "RESOLVED"),
        }
    }
}

/// A reported civic issue.
///
/// The reporter and organization fields are filled in depending on who asks:
/// organizations see reporter contact details, citizens see the organization
/// handling their report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub status: IssueStatus,
    pub organization_id: Option<i64>,
    pub organization_name: Option<String>,
    pub citizen_name: Option<String>,
    pub reporter_name: Option<String>,
    pub reporter_email: Option<String>,
    pub reporter_phone: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub has_image: Option<bool>,
    pub created_at: Option<DateTime<Utc>>,
}

/// Outcome of submitting an issue report.
///
/// The backend files near-identical open reports as duplicates instead of
/// rejecting them; the flag travels beside the response envelope, not
/// inside it.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IssueSubmission {
    pub is_duplicate: bool,
}

/// Issue report to submit, optionally with a photo attachment.
#[derive(Debug, Clone)]
pub struct NewIssue {
    pub title: String,
    pub description: String,
    pub organization_id: i64,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub image: Option<ImageAttachment>,
}

/// Photo riding along with an issue report.
#[derive(Debug, Clone)]
pub struct ImageAttachment {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// An organization's work queue: its open issues plus its own id, which the
/// export endpoints need.
#[derive(Debug, Clone, Deserialize)]
pub struct IssueQueue {
    pub issues: Vec<Issue>,
    pub organization_id: Option<i64>,
}

/// A municipal organization that handles reported issues.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Organization {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub category: Option<String>,
    pub is_active: Option<bool>,
    pub created_at: Option<DateTime<Utc>>,
}

/// Fields for creating or updating an organization.
#[derive(Debug, Clone, Serialize)]
pub struct OrganizationDraft {
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub category: String,
}

/// File format for an organization's issue report export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Pdf,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Pdf => "pdf",
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Editable profile fields for the signed-in user.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileUpdate {
    pub full_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Payload for `PUT /users/password`.
#[derive(Debug, Clone, Serialize)]
pub struct PasswordChange {
    pub current_password: String,
    pub new_password: String,
}

/// Analytics series for the admin and authority dashboards. Every series
/// defaults to empty, matching backends that omit quiet ones.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalyticsReport {
    pub timeseries: Vec<TimeseriesPoint>,
    pub resolution_by_category: Vec<CategoryResolution>,
    pub sla_buckets: Vec<SlaBucket>,
    pub backlog_scatter: Vec<BacklogPoint>,
}

/// Issues opened and resolved on one day.
#[derive(Debug, Clone, Deserialize)]
pub struct TimeseriesPoint {
    pub day: String,
    pub total: i64,
    pub resolved: i64,
}

/// Resolution count for one issue category.
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryResolution {
    pub category: String,
    pub resolved: i64,
}

/// Share of issues falling into one service-level bucket.
#[derive(Debug, Clone, Deserialize)]
pub struct SlaBucket {
    pub name: String,
    pub value: i64,
}

/// One open issue plotted by age and priority weight.
#[derive(Debug, Clone, Deserialize)]
pub struct BacklogPoint {
    pub x: f64,
    pub y: f64,
}

/// `data` payload of the issue listing endpoints.
#[derive(Debug, Deserialize)]
pub(crate) struct IssueList {
    pub(crate) issues: Vec<Issue>,
}

/// `data` payload of the organization listing endpoints.
#[derive(Debug, Deserialize)]
pub(crate) struct OrganizationList {
    pub(crate) organizations: Vec<Organization>,
}

/// `data` payload of `GET /organizations/me`.
#[derive(Debug, Deserialize)]
pub(crate) struct OrganizationPayload {
    pub(crate) organization: Organization,
}

/// `data` payload of `GET /users`.
#[derive(Debug, Deserialize)]
pub(crate) struct UserList {
    pub(crate) users: Vec<User>,
}

/// `data` payload of the profile endpoints.
#[derive(Debug, Deserialize)]
pub(crate) struct UserPayload {
    pub(crate) user: User,
}

/// Payload for `PUT /issues/{id}/status`.
#[derive(Debug, Serialize)]
pub(crate) struct StatusUpdate {
    pub(crate) status: IssueStatus,
}

/// Payload for `PUT /users/{id}/toggle-active`.
#[derive(Debug, Serialize)]
pub(crate) struct ActiveUpdate {
    pub(crate) is_active: bool,
}
