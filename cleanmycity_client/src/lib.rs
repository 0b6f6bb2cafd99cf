//! cleanmycity-client - Session-aware API client for the CleanMyCity platform
//!
//! This crate owns the HTTP transport, the CSRF token cache, and the bearer
//! session state that every call to the CleanMyCity REST backend must carry.
//! Front ends construct a [`SessionClient`] once and route all API traffic
//! through it.

mod api;
mod client;
mod csrf;
mod session;
mod storage;


// Re-export the client surface
pub use client::{ApiError, ClientConfig, DEFAULT_ERROR_MESSAGE, Registration, SessionClient};

pub use csrf::CsrfError;

pub use session::{Role, SESSION_TOKEN_KEY, SESSION_USER_KEY, SessionError, SessionEvent, User};

pub use storage::{
    FileSessionStore, InMemorySessionStore, SessionStore, StorageError, session_store_from_env,
};

pub use api::{
    AnalyticsReport, BacklogPoint, CategoryResolution, ExportFormat, ImageAttachment, Issue,
    IssueQueue, IssueStatus, IssueSubmission, NewIssue, Organization, OrganizationDraft,
    PasswordChange, ProfileUpdate, SlaBucket, TimeseriesPoint,
};
