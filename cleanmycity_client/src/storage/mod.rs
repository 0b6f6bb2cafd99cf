mod errors;
mod session_store;

pub use errors::StorageError;
pub use session_store::{
    FileSessionStore, InMemorySessionStore, SessionStore, session_store_from_env,
};
