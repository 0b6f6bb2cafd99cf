mod config;
mod errors;
mod main;
mod types;

pub use config::{SESSION_TOKEN_KEY, SESSION_USER_KEY};
pub use errors::SessionError;
pub use types::{Role, SessionEvent, User};

pub(crate) use main::SessionManager;
