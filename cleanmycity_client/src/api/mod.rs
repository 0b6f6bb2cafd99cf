mod main;
mod types;

pub use types::{
    AnalyticsReport, BacklogPoint, CategoryResolution, ExportFormat, ImageAttachment, Issue,
    IssueQueue, IssueStatus, IssueSubmission, NewIssue, Organization, OrganizationDraft,
    PasswordChange, ProfileUpdate, SlaBucket, TimeseriesPoint,
};
