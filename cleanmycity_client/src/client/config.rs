use std::sync::LazyLock;
use std::time::Duration;

/// Base URL of the backend API, including the `/api` prefix.
pub static API_BASE_URL: LazyLock<String> = LazyLock::new(|| {
    std::env::var("CMC_API_BASE_URL")
        .ok()
        .unwrap_or("http://localhost:3000/api".to_string())
});

/// Per-request timeout budget in seconds.
pub static REQUEST_TIMEOUT_SECS: LazyLock<u64> = LazyLock::new(|| {
    std::env::var("CMC_REQUEST_TIMEOUT_SECS")
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(15)
});

/// Path of the backend endpoint issuing anti-CSRF tokens.
pub(crate) const CSRF_TOKEN_PATH: &str = "/csrf-token";

/// Transport settings for a [`SessionClient`](crate::SessionClient).
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL every request path is joined onto.
    pub base_url: String,
    /// Budget covering the whole request, connect time included.
    pub timeout: Duration,
}

impl ClientConfig {
    /// Settings for a given backend, with the default timeout budget.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Duration::from_secs(*REQUEST_TIMEOUT_SECS),
        }
    }

    /// Settings from `CMC_*` environment variables, with built-in defaults.
    pub fn from_env() -> Self {
        Self::new(API_BASE_URL.clone())
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::from_env()
    }
}
