//! Integration tests for the Verified Plate portal.
//!
//! Each test starts two servers on ephemeral ports: a stub of the backend API
//! and the portal router pointed at it. No external services are needed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p verified-plate-integration-tests
//! ```
//!
//! # Stub Accounts
//!
//! - [`EMAIL`] / [`PASSWORD`] log in and receive [`ACCESS_TOKEN`]
//! - [`VALID_TOKEN`] is accepted by the reset and confirmation endpoints
//! - [`BLOG_SLUG`] is the only blog post; other slugs return 404

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::net::{Ipv4Addr, SocketAddr};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use reqwest::{Client, redirect::Policy};
use serde_json::{Value, json};
use tokio::net::TcpListener;

use verified_plate_portal::config::{ApiConfig, PortalConfig, normalize_base_url};
use verified_plate_portal::state::AppState;

pub const EMAIL: &str = "ana@example.com";
pub const PASSWORD: &str = "Str0ng!pass";
pub const ACCESS_TOKEN: &str = "access-123";
pub const VALID_TOKEN: &str = "valid-token";
pub const BLOG_SLUG: &str = "choosing-a-used-car";

// =============================================================================
// Backend Stub
// =============================================================================

/// A request received by the backend stub.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: &'static str,
    pub path: String,
    pub authorization: Option<String>,
    pub body: Value,
}

/// Shared record of backend calls.
#[derive(Clone, Default)]
pub struct Backend {
    calls: Arc<Mutex<Vec<Recorded>>>,
}

impl Backend {
    fn record(&self, method: &'static str, path: &str, headers: &HeaderMap, body: Value) {
        let authorization = headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        self.calls.lock().unwrap().push(Recorded {
            method,
            path: path.to_string(),
            authorization,
            body,
        });
    }

    /// All calls to `path`, oldest first.
    #[must_use]
    pub fn calls_to(&self, method: &str, path: &str) -> Vec<Recorded> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.method == method && c.path == path)
            .cloned()
            .collect()
    }
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {ACCESS_TOKEN}"))
}

fn unauthorized() -> Response {
    (StatusCode::UNAUTHORIZED, Json(json!({"message": "Unauthorized"}))).into_response()
}

async fn login(State(backend): State<Backend>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    backend.record("POST", "/auth/login", &headers, body.clone());
    if body["email"] == EMAIL && body["password"] == PASSWORD {
        Json(json!({"accessToken": ACCESS_TOKEN, "refreshToken": "refresh-456"})).into_response()
    } else {
        (StatusCode::UNAUTHORIZED, Json(json!({"message": "Invalid credentials"}))).into_response()
    }
}

async fn reset_password(
    State(backend): State<Backend>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> StatusCode {
    backend.record("POST", "/auth/reset-password", &headers, body.clone());
    if body["token"] == VALID_TOKEN {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::BAD_REQUEST
    }
}

async fn confirm_email(
    State(backend): State<Backend>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> StatusCode {
    backend.record("POST", "/auth/confirm-email", &headers, body.clone());
    if body["token"] == VALID_TOKEN {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::GONE
    }
}

async fn me(State(backend): State<Backend>, headers: HeaderMap) -> Response {
    backend.record("GET", "/me", &headers, Value::Null);
    if !authorized(&headers) {
        return unauthorized();
    }
    Json(json!({
        "fullName": "Ana Souza",
        "email": EMAIL,
        "telephone": "(11) 98765-4321",
        "dateOfBirth": "1990-04-01",
        "zipCode": "01310-100",
        "balance": {"amount": "123.52", "currency": "BRL"}
    }))
    .into_response()
}

async fn delete_me(State(backend): State<Backend>, headers: HeaderMap) -> Response {
    backend.record("DELETE", "/me", &headers, Value::Null);
    if !authorized(&headers) {
        return unauthorized();
    }
    StatusCode::NO_CONTENT.into_response()
}

async fn consultations(State(backend): State<Backend>, headers: HeaderMap) -> Response {
    backend.record("GET", "/consultations", &headers, Value::Null);
    if !authorized(&headers) {
        return unauthorized();
    }
    Json(json!([{
        "id": "c1",
        "plate": "ABC1D23",
        "status": "completed",
        "createdAt": "2024-03-05T12:00:00Z",
        "summary": "No restrictions found"
    }]))
    .into_response()
}

async fn create_consultation(
    State(backend): State<Backend>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    backend.record("POST", "/consultations", &headers, body);
    if !authorized(&headers) {
        return unauthorized();
    }
    StatusCode::CREATED.into_response()
}

async fn recommendations(State(backend): State<Backend>, headers: HeaderMap) -> Response {
    backend.record("GET", "/recommendations", &headers, Value::Null);
    StatusCode::INTERNAL_SERVER_ERROR.into_response()
}

async fn packages(State(backend): State<Backend>, headers: HeaderMap) -> Response {
    backend.record("GET", "/packages", &headers, Value::Null);
    Json(json!([
        {"id": "p10", "title": "10 consultations", "consultations": 10, "price": {"amount": "29.90"}},
        {"id": "p50", "title": "50 consultations", "consultations": 50, "price": {"amount": "119.90"}}
    ]))
    .into_response()
}

async fn purchases(State(backend): State<Backend>, headers: HeaderMap) -> Response {
    backend.record("GET", "/purchases", &headers, Value::Null);
    Json(json!([])).into_response()
}

async fn create_purchase(
    State(backend): State<Backend>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    backend.record("POST", "/purchases", &headers, body);
    if !authorized(&headers) {
        return unauthorized();
    }
    StatusCode::CREATED.into_response()
}

async fn blogs(State(backend): State<Backend>, headers: HeaderMap) -> Response {
    backend.record("GET", "/blogs", &headers, Value::Null);
    Json(json!([{
        "slug": BLOG_SLUG,
        "title": "Choosing a used car",
        "excerpt": "What to check before you buy.",
        "publishedAt": "2024-02-01T09:00:00Z"
    }]))
    .into_response()
}

async fn blog_post(
    State(backend): State<Backend>,
    headers: HeaderMap,
    Path(slug): Path<String>,
) -> Response {
    backend.record("GET", &format!("/blogs/{slug}"), &headers, Value::Null);
    if slug != BLOG_SLUG {
        return (StatusCode::NOT_FOUND, Json(json!({"message": "Not found"}))).into_response();
    }
    Json(json!({
        "slug": BLOG_SLUG,
        "title": "Choosing a used car",
        "excerpt": "What to check before you buy.",
        "body": "Run a plate consultation first.\n\nThen book an inspection.",
        "publishedAt": "2024-02-01T09:00:00Z"
    }))
    .into_response()
}

async fn contact(
    State(backend): State<Backend>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> StatusCode {
    backend.record("POST", "/contact", &headers, body);
    StatusCode::NO_CONTENT
}

fn backend_router(backend: Backend) -> Router {
    Router::new()
        .route("/v1/auth/login", post(login))
        .route("/v1/auth/reset-password", post(reset_password))
        .route("/v1/auth/confirm-email", post(confirm_email))
        .route("/v1/me", get(me).delete(delete_me))
        .route(
            "/v1/consultations",
            get(consultations).post(create_consultation),
        )
        .route("/v1/recommendations", get(recommendations))
        .route("/v1/packages", get(packages))
        .route("/v1/purchases", get(purchases).post(create_purchase))
        .route("/v1/blogs", get(blogs))
        .route("/v1/blogs/{slug}", get(blog_post))
        .route("/v1/contact", post(contact))
        .with_state(backend)
}

// =============================================================================
// Test Context
// =============================================================================

/// A running portal wired to a backend stub.
pub struct TestContext {
    /// Cookie-keeping client that does not follow redirects.
    pub client: Client,
    pub portal_url: String,
    pub backend: Backend,
}

async fn bind() -> (TcpListener, SocketAddr) {
    let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).await.unwrap();
    let addr = listener.local_addr().unwrap();
    (listener, addr)
}

impl TestContext {
    /// Start the backend stub and the portal.
    pub async fn new() -> Self {
        let backend = Backend::default();
        let (backend_listener, backend_addr) = bind().await;
        let router = backend_router(backend.clone());
        tokio::spawn(async move { axum::serve(backend_listener, router).await.unwrap() });

        let (portal_listener, portal_addr) = bind().await;
        let portal_url = format!("http://{portal_addr}");
        let config = PortalConfig {
            host: portal_addr.ip(),
            port: portal_addr.port(),
            base_url: portal_url.clone(),
            static_dir: concat!(env!("CARGO_MANIFEST_DIR"), "/../portal/static").to_string(),
            api: ApiConfig {
                base_url: normalize_base_url(&format!("http://{backend_addr}/v1")).unwrap(),
                timeout: Duration::from_secs(5),
            },
            trust_proxy_headers: false,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        };
        let app = verified_plate_portal::app(AppState::new(config).unwrap());
        tokio::spawn(async move {
            axum::serve(
                portal_listener,
                app.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .await
            .unwrap();
        });

        let client = Client::builder()
            .cookie_store(true)
            .redirect(Policy::none())
            .build()
            .unwrap();

        Self {
            client,
            portal_url,
            backend,
        }
    }

    /// Absolute portal URL for `path`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.portal_url)
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client.get(self.url(path)).send().await.unwrap()
    }

    pub async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .form(form)
            .send()
            .await
            .unwrap()
    }

    /// Log in with the stub account; the session cookie stays in the client.
    pub async fn login(&self) {
        let response = self
            .post_form("/login", &[("email", EMAIL), ("password", PASSWORD)])
            .await;
        assert_eq!(location(&response), "/");
    }
}

/// `Location` header of a redirect response.
#[must_use]
pub fn location(response: &reqwest::Response) -> String {
    assert!(
        response.status().is_redirection(),
        "expected redirect, got {}",
        response.status()
    );
    response
        .headers()
        .get(reqwest::header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}
