use std::sync::Arc;

use http::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::broadcast;
use url::Url;

use crate::client::config::{CSRF_TOKEN_PATH, ClientConfig};
use crate::client::errors::{ApiError, DEFAULT_ERROR_MESSAGE};
use crate::client::types::ErrorEnvelope;
use crate::csrf::CsrfCache;
use crate::session::{SessionEvent, SessionManager, User};
use crate::storage::SessionStore;

use super::utils::join_url;

/// Header carrying the anti-CSRF token on mutating requests.
pub(crate) const CSRF_HEADER: &str = "X-CSRF-Token";

/// Body attached to an outgoing request.
pub(super) enum Payload {
    Empty,
    Json(serde_json::Value),
    Multipart(reqwest::multipart::Form),
}

/// HTTP client enforcing the platform's session and anti-CSRF contract.
///
/// Every request runs through the same stages: build, attach credentials,
/// send, recover on auth failures, decode. Cloning is cheap; clones share
/// the session, the CSRF cache and the notification hub, so one client can
/// serve a whole application.
#[derive(Clone)]
pub struct SessionClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http: reqwest::Client,
    base_url: String,
    session: SessionManager,
    csrf: CsrfCache,
}

impl SessionClient {
    /// Create a client over the given transport settings and session store.
    pub fn new(config: ClientConfig, store: Box<dyn SessionStore>) -> Result<Self, ApiError> {
        Url::parse(&config.base_url).map_err(|e| {
            ApiError::Config(format!("Invalid base URL '{}': {e}", config.base_url))
        })?;
        let base_url = config.base_url.trim_end_matches('/').to_string();

        // Cookies ride along on every request so the backend can pair the
        // CSRF cookie with the header token.
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .cookie_store(true)
            .build()
            .map_err(|e| ApiError::Config(e.to_string()))?;

        let csrf = CsrfCache::new(http.clone(), join_url(&base_url, CSRF_TOKEN_PATH));

        tracing::debug!("Session client created for {}", base_url);

        Ok(Self {
            inner: Arc::new(ClientInner {
                http,
                base_url,
                session: SessionManager::new(store),
                csrf,
            }),
        })
    }

    /// One-time startup: prepare the store, warm the CSRF cache and restore
    /// any persisted session.
    ///
    /// A failing token warm-up is logged and swallowed; it must never block
    /// startup. Returns the restored user when a whole session was persisted.
    pub async fn bootstrap(&self) -> Result<Option<User>, ApiError> {
        self.inner.session.init_store().await?;

        if let Err(e) = self.inner.csrf.ensure().await {
            tracing::warn!("CSRF warm-up failed, continuing without a token: {}", e);
        }

        Ok(self.inner.session.restore().await?)
    }

    /// Currently signed-in user, if any.
    pub fn current_user(&self) -> Option<User> {
        self.inner.session.user()
    }

    /// Whether a session token and user are currently held.
    pub fn is_authenticated(&self) -> bool {
        self.inner.session.is_authenticated()
    }

    /// Subscribe to session notifications, such as forced sign-outs.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.inner.session.subscribe()
    }

    /// Peek at the cached CSRF token without fetching. Diagnostics only.
    pub fn cached_csrf_token(&self) -> Option<String> {
        self.inner.csrf.token()
    }

    pub(super) fn session(&self) -> &SessionManager {
        &self.inner.session
    }

    /// `GET` returning the decoded `data` payload.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.execute(Method::GET, path, &[], Payload::Empty).await?;
        decode_response(response).await
    }

    /// `GET` with query parameters.
    pub async fn get_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let response = self.execute(Method::GET, path, query, Payload::Empty).await?;
        decode_response(response).await
    }

    /// `GET` returning the raw body bytes, for file downloads.
    pub async fn get_bytes(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<Vec<u8>, ApiError> {
        let response = self.execute(Method::GET, path, query, Payload::Empty).await?;
        let bytes = response.bytes().await.map_err(ApiError::from)?;
        Ok(bytes.to_vec())
    }

    pub async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self
            .execute(Method::POST, path, &[], json_payload(body)?)
            .await?;
        decode_response(response).await
    }

    /// `POST` without a body.
    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.execute(Method::POST, path, &[], Payload::Empty).await?;
        decode_response(response).await
    }

    /// `POST` a multipart form, for uploads with file parts.
    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> Result<T, ApiError> {
        let response = self
            .execute(Method::POST, path, &[], Payload::Multipart(form))
            .await?;
        decode_response(response).await
    }

    /// `POST` a multipart form and decode the whole response body rather
    /// than the `data` payload, for endpoints that reply with flags beside
    /// the envelope.
    pub(crate) async fn post_multipart_full<T: DeserializeOwned>(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> Result<T, ApiError> {
        let response = self
            .execute(Method::POST, path, &[], Payload::Multipart(form))
            .await?;
        let body = response.text().await.map_err(ApiError::from)?;
        let value = match parse_body(&body)? {
            serde_json::Value::Null => serde_json::Value::Object(serde_json::Map::new()),
            value => value,
        };
        serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))
    }

    pub async fn put<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self
            .execute(Method::PUT, path, &[], json_payload(body)?)
            .await?;
        decode_response(response).await
    }

    /// `PUT` without a body, for bare lifecycle toggles.
    pub async fn put_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.execute(Method::PUT, path, &[], Payload::Empty).await?;
        decode_response(response).await
    }

    pub async fn patch<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self
            .execute(Method::PATCH, path, &[], json_payload(body)?)
            .await?;
        decode_response(response).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self
            .execute(Method::DELETE, path, &[], Payload::Empty)
            .await?;
        decode_response(response).await
    }

    /// Run one request through the credential and recovery stages.
    async fn execute(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        payload: Payload,
    ) -> Result<reqwest::Response, ApiError> {
        let url = join_url(&self.inner.base_url, path);
        tracing::debug!(%method, %url, "Dispatching API request");

        let mut request = self.inner.http.request(method.clone(), &url);
        if !query.is_empty() {
            request = request.query(query);
        }
        request = match payload {
            Payload::Empty => request,
            Payload::Json(value) => request.json(&value),
            Payload::Multipart(form) => request.multipart(form),
        };

        // Mutating verbs carry the anti-CSRF token. A failed fetch is not
        // fatal here; the backend stays the authority and the recovery stage
        // handles its verdict.
        if is_mutating(&method) {
            match self.inner.csrf.ensure().await {
                Ok(token) => request = request.header(CSRF_HEADER, token),
                Err(e) => tracing::warn!("Proceeding without a CSRF token: {}", e),
            }
        }

        // Every verb carries the bearer token while a session is held.
        if let Some(token) = self.inner.session.token() {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(ApiError::from)?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = error_message(response).await;
        self.recover(status, &message).await;
        Err(ApiError::Status {
            status: status.as_u16(),
            message,
        })
    }

    /// React to an auth failure: session teardown on 401, CSRF self-healing
    /// on a token-mismatch 403. The original error still reaches the caller;
    /// nothing is retried automatically.
    async fn recover(&self, status: StatusCode, message: &str) {
        if status == StatusCode::UNAUTHORIZED {
            tracing::debug!("Backend rejected the session, clearing credentials");
            self.inner.session.reject().await;
        } else if status == StatusCode::FORBIDDEN && is_csrf_rejection(message) {
            tracing::debug!("Stale CSRF token rejected, scheduling a refetch");
            self.inner.csrf.invalidate();
            let csrf = self.inner.csrf.clone();
            tokio::spawn(async move {
                if let Err(e) = csrf.ensure().await {
                    tracing::warn!("Background CSRF refetch failed: {}", e);
                }
            });
        }
    }
}

/// Verbs that change state on the backend and so need the CSRF token.
pub(super) fn is_mutating(method: &Method) -> bool {
    matches!(
        *method,
        Method::POST | Method::PUT | Method::DELETE | Method::PATCH
    )
}

/// A 403 caused by a stale or missing CSRF token, as opposed to a plain
/// authorization refusal. The backend names the token in its message.
pub(super) fn is_csrf_rejection(message: &str) -> bool {
    message.to_ascii_lowercase().contains("csrf")
}

pub(super) fn json_payload<B: Serialize>(body: &B) -> Result<Payload, ApiError> {
    let value =
        serde_json::to_value(body).map_err(|e| ApiError::InvalidRequest(e.to_string()))?;
    Ok(Payload::Json(value))
}

async fn decode_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
    let body = response.text().await.map_err(ApiError::from)?;
    decode_data(&body)
}

/// Parse a body as JSON, reading an empty body as null.
fn parse_body(body: &str) -> Result<serde_json::Value, ApiError> {
    if body.trim().is_empty() {
        Ok(serde_json::Value::Null)
    } else {
        serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

/// Decode a success body, unwrapping the `{ "data": ... }` envelope when one
/// is present. A few endpoints reply without the envelope; those bodies
/// decode directly. An empty body decodes as JSON null.
pub(super) fn decode_data<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    let value = parse_body(body)?;
    let payload = match value {
        serde_json::Value::Object(mut map) => match map.remove("data") {
            Some(data) => data,
            None => serde_json::Value::Object(map),
        },
        other => other,
    };
    serde_json::from_value(payload).map_err(|e| ApiError::Decode(e.to_string()))
}

/// Read the `message` field of an error body, falling back to the fixed
/// default when the body is missing, unreadable or empty.
async fn error_message(response: reqwest::Response) -> String {
    match response.text().await {
        Ok(body) => extract_error_message(&body),
        Err(_) => DEFAULT_ERROR_MESSAGE.to_string(),
    }
}

pub(super) fn extract_error_message(body: &str) -> String {
    serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .and_then(|envelope| envelope.message)
        .filter(|message| !message.is_empty())
        .unwrap_or_else(|| DEFAULT_ERROR_MESSAGE.to_string())
}
