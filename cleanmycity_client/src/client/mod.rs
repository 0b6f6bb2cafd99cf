mod config;
mod errors;
mod main;
mod types;

pub use config::ClientConfig;
pub use errors::{ApiError, DEFAULT_ERROR_MESSAGE};
pub use main::SessionClient;
pub use types::Registration;
