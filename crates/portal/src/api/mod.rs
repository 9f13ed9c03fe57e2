//! Backend API client.
//!
//! A thin wrapper over `reqwest` that resolves paths against the configured
//! base URL, sends JSON, and attaches the visitor's bearer token.
//!
//! # Credentials
//!
//! Every call takes the raw token blob stored in the visitor session
//! (`Option<&str>`). The blob is parsed right before the request is built; if
//! it holds an access token the request carries `Authorization: Bearer …`.
//! A blob that fails to parse is logged as a warning and the request goes out
//! unauthenticated. There is no retry, backoff or refresh.
//!
//! # Example
//!
//! ```rust,ignore
//! use verified_plate_portal::api::{ApiClient, types::Account};
//!
//! let client = ApiClient::new(&config.api)?;
//! let account: Account = client.get("me", session_token.as_deref()).await?;
//! ```

pub mod types;

use std::sync::Arc;

use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;
use tracing::{debug, instrument};
use url::Url;

use verified_plate_core::AuthTokens;

use crate::config::ApiConfig;

/// Longest error body kept in [`ApiError::Status`].
const MAX_ERROR_BODY: usize = 512;

/// Errors that can occur when calling the backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed (connect, timeout, body decode).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend answered with a non-success status.
    #[error("API error: {status} - {message}")]
    Status { status: u16, message: String },

    /// Path could not be resolved against the base URL.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Response body was not the expected JSON.
    #[error("Parse error: {0}")]
    Parse(String),
}

impl ApiError {
    /// Returns `true` for a 404 from the backend.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::Status { status: 404, .. })
    }
}

/// Extract the access token from a stored token blob.
///
/// Returns `None` when the blob has no access token. A blob that is not valid
/// JSON is reported with a warning and treated the same way.
#[must_use]
pub fn bearer_token(blob: &str) -> Option<String> {
    match AuthTokens::from_blob(blob) {
        Ok(tokens) => tokens.access_token().map(str::to_owned),
        Err(e) => {
            tracing::warn!(error = %e, "Invalid auth token format in session");
            None
        }
    }
}

/// Client for the Verified Plate backend API.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    /// Create a new API client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                base_url: config.base_url.clone(),
            }),
        })
    }

    /// Base URL requests are resolved against.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Resolve an API path (leading slashes are ignored).
    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.inner.base_url.join(path.trim_start_matches('/'))?)
    }

    /// Build a request with the bearer credential attached when available.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Url` if the path cannot be resolved.
    pub fn request(
        &self,
        method: Method,
        path: &str,
        credentials: Option<&str>,
    ) -> Result<RequestBuilder, ApiError> {
        let url = self.endpoint(path)?;
        let builder = self.inner.client.request(method, url);

        Ok(match credentials.and_then(bearer_token) {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        })
    }

    /// `GET` a JSON resource.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the backend answers non-2xx, or
    /// the body is not the expected JSON.
    #[instrument(skip(self, credentials))]
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        credentials: Option<&str>,
    ) -> Result<T, ApiError> {
        let response = send(self.request(Method::GET, path, credentials)?).await?;
        parse_json(response).await
    }

    /// `POST` a JSON body and decode a JSON response.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::get`].
    #[instrument(skip(self, body, credentials))]
    pub async fn post<B, T>(
        &self,
        path: &str,
        body: &B,
        credentials: Option<&str>,
    ) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let builder = self.request(Method::POST, path, credentials)?.json(body);
        let response = send(builder).await?;
        parse_json(response).await
    }

    /// `POST` a JSON body, ignoring any response body.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend answers non-2xx.
    #[instrument(skip(self, body, credentials))]
    pub async fn post_no_content<B>(
        &self,
        path: &str,
        body: &B,
        credentials: Option<&str>,
    ) -> Result<(), ApiError>
    where
        B: Serialize + ?Sized,
    {
        let builder = self.request(Method::POST, path, credentials)?.json(body);
        send(builder).await?;
        Ok(())
    }

    /// `DELETE` a resource.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend answers non-2xx.
    #[instrument(skip(self, credentials))]
    pub async fn delete(&self, path: &str, credentials: Option<&str>) -> Result<(), ApiError> {
        send(self.request(Method::DELETE, path, credentials)?).await?;
        Ok(())
    }
}

/// Send a request and turn non-success statuses into errors.
async fn send(builder: RequestBuilder) -> Result<Response, ApiError> {
    let response = builder.send().await?;
    let status = response.status();
    debug!(status = status.as_u16(), url = %response.url(), "API response");

    if status.is_success() {
        return Ok(response);
    }

    let mut message = response.text().await.unwrap_or_default();
    if message.len() > MAX_ERROR_BODY {
        let cut = (0..=MAX_ERROR_BODY)
            .rev()
            .find(|&i| message.is_char_boundary(i))
            .unwrap_or(0);
        message.truncate(cut);
    }
    if message.is_empty() {
        message = status
            .canonical_reason()
            .unwrap_or("no response body")
            .to_string();
    }

    Err(ApiError::Status {
        status: status.as_u16(),
        message,
    })
}

/// Decode a JSON body, keeping the raw text for diagnostics on failure.
async fn parse_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let status = response.status();
    let body = response.text().await?;

    if status == StatusCode::NO_CONTENT || body.is_empty() {
        return serde_json::from_str("null").map_err(|e| ApiError::Parse(e.to_string()));
    }

    serde_json::from_str(&body).map_err(|e| {
        tracing::warn!(error = %e, "Unexpected API response shape");
        ApiError::Parse(e.to_string())
    })
}
