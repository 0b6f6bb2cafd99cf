use futures_util::FutureExt;
use futures_util::future::{BoxFuture, Shared};
use serde::Deserialize;
use std::sync::{Arc, Mutex};

use crate::csrf::errors::CsrfError;

/// Body of the backend's `GET /csrf-token` endpoint.
#[derive(Debug, Deserialize)]
struct CsrfTokenResponse {
    #[serde(rename = "csrfToken")]
    csrf_token: String,
}

type InFlightFetch = Shared<BoxFuture<'static, Result<String, CsrfError>>>;

#[derive(Default)]
struct CacheSlot {
    token: Option<String>,
    in_flight: Option<InFlightFetch>,
}

/// In-memory CSRF token cache with a single-flight fetch.
///
/// At most one request to the token endpoint is in flight at a time; every
/// concurrent caller joins it and observes the same outcome, success or
/// failure. The token never touches durable storage.
#[derive(Clone)]
pub(crate) struct CsrfCache {
    slot: Arc<Mutex<CacheSlot>>,
    http: reqwest::Client,
    endpoint: String,
}

impl CsrfCache {
    pub(crate) fn new(http: reqwest::Client, endpoint: String) -> Self {
        Self {
            slot: Arc::new(Mutex::new(CacheSlot::default())),
            http,
            endpoint,
        }
    }

    /// Return the cached token, joining or starting a fetch when none is held.
    ///
    /// A failed fetch is reported to every joined caller and is not retried
    /// here; the next call starts a fresh fetch.
    pub(crate) async fn ensure(&self) -> Result<String, CsrfError> {
        let fetch = {
            let mut slot = self.slot.lock().unwrap();
            if let Some(token) = &slot.token {
                return Ok(token.clone());
            }
            match &slot.in_flight {
                Some(fetch) => fetch.clone(),
                None => {
                    let fetch = self.start_fetch();
                    slot.in_flight = Some(fetch.clone());
                    fetch
                }
            }
        };
        fetch.await
    }

    /// Forget the cached token. An in-flight fetch is left to finish so that
    /// callers already joined to it still get its result.
    pub(crate) fn invalidate(&self) {
        let mut slot = self.slot.lock().unwrap();
        slot.token = None;
    }

    /// Peek at the cached token without fetching.
    pub(crate) fn token(&self) -> Option<String> {
        self.slot.lock().unwrap().token.clone()
    }

    fn start_fetch(&self) -> InFlightFetch {
        let http = self.http.clone();
        let endpoint = self.endpoint.clone();
        let slot = Arc::clone(&self.slot);
        async move {
            let result = fetch_token(&http, &endpoint).await;
            // Clear the in-flight marker before publishing the outcome, so a
            // new caller after a failure starts a fresh fetch instead of
            // joining the dead one.
            let mut slot = slot.lock().unwrap();
            slot.in_flight = None;
            if let Ok(token) = &result {
                slot.token = Some(token.clone());
            }
            result
        }
        .boxed()
        .shared()
    }
}

async fn fetch_token(http: &reqwest::Client, endpoint: &str) -> Result<String, CsrfError> {
    tracing::debug!("Fetching CSRF token from {}", endpoint);

    let response = http
        .get(endpoint)
        .send()
        .await
        .map_err(|e| CsrfError::Fetch(e.to_string()))?
        .error_for_status()
        .map_err(|e| CsrfError::Fetch(e.to_string()))?;

    let body = response
        .text()
        .await
        .map_err(|e| CsrfError::Fetch(e.to_string()))?;
    let token: CsrfTokenResponse =
        serde_json::from_str(&body).map_err(|e| CsrfError::Decode(e.to_string()))?;

    tracing::debug!("CSRF token cached");
    Ok(token.csrf_token)
}
