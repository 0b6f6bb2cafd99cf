use thiserror::Error;

use crate::csrf::CsrfError;
use crate::session::SessionError;

/// Message surfaced when the backend gives no usable error message.
pub const DEFAULT_ERROR_MESSAGE: &str = "Request failed";

/// Error from a request issued through the client.
///
/// `Status` keeps the backend's own message, so callers can surface it
/// verbatim. All other variants describe failures on this side of the wire.
#[derive(Error, Debug, Clone)]
pub enum ApiError {
    /// The request never produced a response.
    #[error("Network error: {0}")]
    Network(String),

    /// The timeout budget ran out before a response arrived.
    #[error("Request timed out")]
    Timeout,

    /// The backend answered with a non-success status.
    #[error("{message}")]
    Status { status: u16, message: String },

    /// The response body did not decode into the expected shape.
    #[error("Decode error: {0}")]
    Decode(String),

    /// The request could not be built.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The client settings are unusable.
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("CSRF error: {0}")]
    Csrf(#[from] CsrfError),
}

impl ApiError {
    /// HTTP status of a backend rejection, when one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}
