use thiserror::Error;

// Clone is required: a single fetch outcome is handed to every caller that
// joined the in-flight request.
#[derive(Debug, Error, Clone)]
pub enum CsrfError {
    #[error("Token fetch error: {0}")]
    Fetch(String),

    #[error("Token decode error: {0}")]
    Decode(String),
}
