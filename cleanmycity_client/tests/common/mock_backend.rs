//! Mock CleanMyCity backend for integration flows.
//!
//! Each test spawns its own instance on an ephemeral port, so tests run in
//! parallel without sharing counters. The mock enforces the same contract as
//! the real backend: bearer tokens on protected routes, a rotating CSRF token
//! on mutating routes, and `{ "message": ... }` error bodies.

use axum::{
    Router,
    body::Bytes,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Json, Response},
    routing::{get, post, put},
};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

pub const VALID_EMAIL: &str = "abebe@example.com";
pub const VALID_PASSWORD: &str = "s3cret-pass";
pub const BEARER_TOKEN: &str = "bearer-valid";

/// One request as the backend saw it.
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub method: String,
    pub path: String,
    pub csrf_header: Option<String>,
    pub bearer: Option<String>,
    pub content_type: Option<String>,
}

#[derive(Default)]
struct BackendInner {
    csrf_hits: usize,
    csrf_unavailable: bool,
    forced_failure: Option<(u16, Option<String>)>,
    issue_duplicate: bool,
    captured: Vec<CapturedRequest>,
}

/// Handle on a running mock backend. Cloning shares the instance.
#[derive(Clone, Default)]
pub struct MockBackend {
    inner: Arc<Mutex<BackendInner>>,
}

impl MockBackend {
    /// Start a fresh backend and return its handle plus the `/api` base URL.
    pub async fn spawn() -> (Self, String) {
        let backend = Self::default();
        let app = router(backend.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock backend");
        let addr = listener.local_addr().expect("mock backend local addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("serve mock backend");
        });

        (backend, format!("http://{addr}/api"))
    }

    /// How many times `/csrf-token` has been hit.
    pub fn csrf_hits(&self) -> usize {
        self.inner.lock().unwrap().csrf_hits
    }

    /// The token the backend currently accepts, if any was issued.
    pub fn current_csrf_token(&self) -> Option<String> {
        let inner = self.inner.lock().unwrap();
        (inner.csrf_hits > 0).then(|| format!("csrf-{}", inner.csrf_hits))
    }

    /// Make `/csrf-token` answer 503 until turned off again.
    pub fn set_csrf_unavailable(&self, unavailable: bool) {
        self.inner.lock().unwrap().csrf_unavailable = unavailable;
    }

    /// Make the next API request fail with the given status and message.
    /// `None` produces an empty `{}` error body.
    pub fn fail_next(&self, status: u16, message: Option<&str>) {
        self.inner.lock().unwrap().forced_failure = Some((status, message.map(str::to_string)));
    }

    /// Make the next issue report come back flagged as a duplicate.
    pub fn flag_next_issue_duplicate(&self) {
        self.inner.lock().unwrap().issue_duplicate = true;
    }

    /// Every request captured so far, oldest first.
    pub fn captured(&self) -> Vec<CapturedRequest> {
        self.inner.lock().unwrap().captured.clone()
    }

    /// The captured requests hitting the given path.
    pub fn captured_for(&self, path: &str) -> Vec<CapturedRequest> {
        self.captured()
            .into_iter()
            .filter(|r| r.path == path)
            .collect()
    }

    fn capture(&self, method: &str, path: String, headers: &HeaderMap) {
        self.inner.lock().unwrap().captured.push(CapturedRequest {
            method: method.to_string(),
            path,
            csrf_header: header_value(headers, "x-csrf-token"),
            bearer: header_value(headers, "authorization")
                .and_then(|v| v.strip_prefix("Bearer ").map(str::to_string)),
            content_type: header_value(headers, "content-type"),
        });
    }

    fn take_forced(&self) -> Option<(StatusCode, Option<String>)> {
        self.inner.lock().unwrap().forced_failure.take().map(|(code, message)| {
            (
                StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
                message,
            )
        })
    }

    fn check_bearer(&self, headers: &HeaderMap) -> bool {
        let expected = format!("Bearer {BEARER_TOKEN}");
        header_value(headers, "authorization").as_deref() == Some(expected.as_str())
    }

    /// Only the most recently issued token is accepted, like a backend that
    /// rotates its token per session refresh.
    fn check_csrf(&self, headers: &HeaderMap) -> bool {
        let inner = self.inner.lock().unwrap();
        let expected = format!("csrf-{}", inner.csrf_hits);
        inner.csrf_hits > 0
            && header_value(headers, "x-csrf-token").as_deref() == Some(expected.as_str())
    }
}

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

fn error_body(status: StatusCode, message: Option<&str>) -> Response {
    let body = match message {
        Some(message) => json!({ "message": message }),
        None => json!({}),
    };
    (status, Json(body)).into_response()
}

fn forced_or_unauthorized(backend: &MockBackend, headers: &HeaderMap) -> Option<Response> {
    if let Some((status, message)) = backend.take_forced() {
        return Some(error_body(status, message.as_deref()));
    }
    if !backend.check_bearer(headers) {
        return Some(error_body(
            StatusCode::UNAUTHORIZED,
            Some("Authentication required"),
        ));
    }
    None
}

fn csrf_guard(backend: &MockBackend, headers: &HeaderMap) -> Option<Response> {
    if !backend.check_csrf(headers) {
        return Some(error_body(StatusCode::FORBIDDEN, Some("Invalid CSRF token")));
    }
    None
}

fn session_user() -> Value {
    json!({
        "id": 42,
        "full_name": "Abebe Girma",
        "email": VALID_EMAIL,
        "phone": "+251911000000",
        "role": "CITIZEN",
        "is_active": true
    })
}

fn router(backend: MockBackend) -> Router {
    Router::new()
        .route("/api/csrf-token", get(csrf_token))
        .route("/api/auth/login", post(login))
        .route("/api/auth/logout", post(logout))
        .route("/api/users/profile", get(profile).put(update_profile))
        .route("/api/issues/my-issues", get(my_issues))
        .route("/api/issues", post(create_issue))
        .route("/api/issues/{id}/status", put(update_status))
        .route("/api/issues/analytics/global", get(global_analytics))
        .route("/api/organizations/public", get(public_organizations))
        .route(
            "/api/organizations/{id}/activate",
            put(activate_organization),
        )
        .route(
            "/api/organizations/{id}/deactivate",
            put(deactivate_organization),
        )
        .route("/api/organizations/{id}/export", get(export_report))
        .with_state(backend)
}

async fn csrf_token(State(backend): State<MockBackend>) -> Response {
    let mut inner = backend.inner.lock().unwrap();
    if inner.csrf_unavailable {
        return error_body(
            StatusCode::SERVICE_UNAVAILABLE,
            Some("Service unavailable"),
        );
    }
    inner.csrf_hits += 1;
    let token = format!("csrf-{}", inner.csrf_hits);
    Json(json!({ "csrfToken": token })).into_response()
}

async fn login(
    State(backend): State<MockBackend>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    backend.capture("POST", "/api/auth/login".to_string(), &headers);
    if let Some((status, message)) = backend.take_forced() {
        return error_body(status, message.as_deref());
    }
    if let Some(response) = csrf_guard(&backend, &headers) {
        return response;
    }
    if body["email"] == VALID_EMAIL && body["password"] == VALID_PASSWORD {
        Json(json!({ "data": { "token": BEARER_TOKEN, "user": session_user() } })).into_response()
    } else {
        error_body(StatusCode::UNAUTHORIZED, Some("Invalid credentials"))
    }
}

async fn logout(State(backend): State<MockBackend>, headers: HeaderMap) -> Response {
    backend.capture("POST", "/api/auth/logout".to_string(), &headers);
    if let Some((status, message)) = backend.take_forced() {
        return error_body(status, message.as_deref());
    }
    Json(json!({})).into_response()
}

async fn profile(State(backend): State<MockBackend>, headers: HeaderMap) -> Response {
    backend.capture("GET", "/api/users/profile".to_string(), &headers);
    if let Some(response) = forced_or_unauthorized(&backend, &headers) {
        return response;
    }
    Json(json!({ "data": { "user": session_user() } })).into_response()
}

async fn update_profile(
    State(backend): State<MockBackend>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    backend.capture("PUT", "/api/users/profile".to_string(), &headers);
    if let Some(response) = forced_or_unauthorized(&backend, &headers) {
        return response;
    }
    if let Some(response) = csrf_guard(&backend, &headers) {
        return response;
    }
    let mut user = session_user();
    if let Some(full_name) = body.get("full_name") {
        user["full_name"] = full_name.clone();
    }
    if let Some(phone) = body.get("phone") {
        user["phone"] = phone.clone();
    }
    Json(json!({ "data": { "user": user } })).into_response()
}

async fn my_issues(State(backend): State<MockBackend>, headers: HeaderMap) -> Response {
    backend.capture("GET", "/api/issues/my-issues".to_string(), &headers);
    if let Some(response) = forced_or_unauthorized(&backend, &headers) {
        return response;
    }
    Json(json!({
        "data": {
            "issues": [
                {
                    "id": 1,
                    "title": "Pothole on Bole road",
                    "description": "Deep pothole near the bridge",
                    "status": "PENDING",
                    "organization_name": "Roads Authority",
                    "has_image": true
                },
                {
                    "id": 2,
                    "title": "Streetlight out",
                    "description": "Dark corner by the school",
                    "status": "RESOLVED",
                    "organization_name": "Electric Utility",
                    "has_image": false
                }
            ]
        }
    }))
    .into_response()
}

async fn create_issue(
    State(backend): State<MockBackend>,
    headers: HeaderMap,
    _body: Bytes,
) -> Response {
    backend.capture("POST", "/api/issues".to_string(), &headers);
    if let Some(response) = forced_or_unauthorized(&backend, &headers) {
        return response;
    }
    if let Some(response) = csrf_guard(&backend, &headers) {
        return response;
    }
    let duplicate = std::mem::take(&mut backend.inner.lock().unwrap().issue_duplicate);
    Json(json!({ "isDuplicate": duplicate, "data": { "issue": { "id": 99 } } })).into_response()
}

async fn update_status(
    State(backend): State<MockBackend>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    backend.capture("PUT", format!("/api/issues/{id}/status"), &headers);
    if let Some(response) = forced_or_unauthorized(&backend, &headers) {
        return response;
    }
    if let Some(response) = csrf_guard(&backend, &headers) {
        return response;
    }
    if body.get("status").and_then(Value::as_str).is_none() {
        return error_body(StatusCode::UNPROCESSABLE_ENTITY, Some("Status is required"));
    }
    Json(json!({})).into_response()
}

async fn global_analytics(
    State(backend): State<MockBackend>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    let range = params.get("range").cloned().unwrap_or_default();
    backend.capture(
        "GET",
        format!("/api/issues/analytics/global?range={range}"),
        &headers,
    );
    if let Some(response) = forced_or_unauthorized(&backend, &headers) {
        return response;
    }
    Json(json!({
        "data": {
            "timeseries": [
                { "day": "2025-06-01", "total": 4, "resolved": 1 },
                { "day": "2025-06-02", "total": 2, "resolved": 2 }
            ],
            "resolutionByCategory": [ { "category": "ROADS", "resolved": 3 } ],
            "slaBuckets": [ { "name": "Within SLA", "value": 5 } ],
            "backlogScatter": [ { "x": 4.0, "y": 1.5 } ]
        }
    }))
    .into_response()
}

async fn public_organizations(State(backend): State<MockBackend>, headers: HeaderMap) -> Response {
    backend.capture("GET", "/api/organizations/public".to_string(), &headers);
    if let Some((status, message)) = backend.take_forced() {
        return error_body(status, message.as_deref());
    }
    Json(json!({
        "data": {
            "organizations": [
                { "id": 3, "name": "Roads Authority", "email": "roads@example.com", "category": "ROADS", "is_active": true },
                { "id": 4, "name": "Water & Sewerage", "email": "water@example.com", "category": "WATER" }
            ]
        }
    }))
    .into_response()
}

async fn activate_organization(
    State(backend): State<MockBackend>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Response {
    backend.capture("PUT", format!("/api/organizations/{id}/activate"), &headers);
    if let Some(response) = forced_or_unauthorized(&backend, &headers) {
        return response;
    }
    if let Some(response) = csrf_guard(&backend, &headers) {
        return response;
    }
    Json(json!({})).into_response()
}

async fn deactivate_organization(
    State(backend): State<MockBackend>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Response {
    backend.capture("PUT", format!("/api/organizations/{id}/deactivate"), &headers);
    if let Some(response) = forced_or_unauthorized(&backend, &headers) {
        return response;
    }
    if let Some(response) = csrf_guard(&backend, &headers) {
        return response;
    }
    Json(json!({})).into_response()
}

async fn export_report(
    State(backend): State<MockBackend>,
    Path(id): Path<i64>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    let format = params.get("format").cloned().unwrap_or_default();
    backend.capture(
        "GET",
        format!("/api/organizations/{id}/export?format={format}"),
        &headers,
    );
    if let Some(response) = forced_or_unauthorized(&backend, &headers) {
        return response;
    }
    match format.as_str() {
        "csv" => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/csv")],
            Bytes::from_static(b"id,title,status\n1,Pothole on Bole road,PENDING\n"),
        )
            .into_response(),
        "pdf" => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/pdf")],
            Bytes::from_static(b"%PDF-1.4 mock report"),
        )
            .into_response(),
        _ => error_body(StatusCode::BAD_REQUEST, Some("Unsupported export format")),
    }
}
