use std::env;
use std::sync::LazyLock;

use super::types::{FileSessionStore, InMemorySessionStore, SessionStore};

pub static SESSION_STORE_TYPE: LazyLock<String> = LazyLock::new(|| {
    env::var("CMC_SESSION_STORE_TYPE")
        .ok()
        .unwrap_or("memory".to_string())
});

pub static SESSION_STORE_PATH: LazyLock<String> = LazyLock::new(|| {
    env::var("CMC_SESSION_STORE_PATH")
        .ok()
        .unwrap_or(".cmc_session.json".to_string())
});

/// Build the session store selected by `CMC_SESSION_STORE_TYPE`.
pub fn session_store_from_env() -> Box<dyn SessionStore> {
    let store_type = SESSION_STORE_TYPE.as_str();

    tracing::info!("Initializing session store with type: {}", store_type);

    match store_type {
        "memory" => Box::new(InMemorySessionStore::new()),
        "file" => Box::new(FileSessionStore::new(SESSION_STORE_PATH.as_str())),
        t => panic!("Unsupported session store type: {t}. Supported types are 'memory' and 'file'"),
    }
}
