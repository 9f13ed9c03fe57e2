//! Route guard for private pages.
//!
//! Provides an extractor that requires a stored session token in route handlers.

use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use crate::services::auth;

/// Where unauthenticated visitors are sent.
pub const LOGIN_PATH: &str = "/login";

/// Raw token blob read from the session.
///
/// Only its presence is checked here. The API client parses it when a
/// request is sent.
#[derive(Clone)]
pub struct SessionToken(String);

impl SessionToken {
    /// Credentials argument for `ApiClient` calls.
    #[must_use]
    pub fn credentials(&self) -> Option<&str> {
        Some(&self.0)
    }
}

impl std::fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SessionToken(..)")
    }
}

/// Extractor that requires a stored session token.
///
/// If no token is stored, the request is redirected (303) to `/login`.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireSession(token): RequireSession,
/// ) -> impl IntoResponse {
///     state.api().get::<Account>("me", token.credentials()).await
/// }
/// ```
pub struct RequireSession(pub SessionToken);

/// Rejection sending the visitor to the login page.
pub struct RedirectToLogin;

impl IntoResponse for RedirectToLogin {
    fn into_response(self) -> Response {
        Redirect::to(LOGIN_PATH).into_response()
    }
}

impl<S> FromRequestParts<S> for RequireSession
where
    S: Send + Sync,
{
    type Rejection = RedirectToLogin;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Get the session from extensions (set by SessionManagerLayer)
        let Some(session) = parts.extensions.get::<Session>() else {
            tracing::warn!("Session layer missing; treating request as signed out");
            return Err(RedirectToLogin);
        };

        match auth::stored_blob(session).await {
            Ok(Some(blob)) => Ok(Self(SessionToken(blob))),
            Ok(None) => Err(RedirectToLogin),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read session");
                Err(RedirectToLogin)
            }
        }
    }
}
