mod config;
mod file;
mod memory;
mod types;

pub use config::session_store_from_env;
pub use types::{FileSessionStore, InMemorySessionStore, SessionStore};
