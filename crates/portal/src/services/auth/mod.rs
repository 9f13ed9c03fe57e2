//! Authentication service.
//!
//! Wraps the backend's credential endpoints and owns the session token blob.
//! A visitor counts as authenticated when a blob is stored under
//! [`session_keys::AUTH_TOKENS`]; the blob is not parsed for that check.

mod error;

pub use error::AuthError;

use tower_sessions::Session;
use tracing::instrument;

use verified_plate_core::AuthTokens;

use crate::api::ApiClient;
use crate::api::types::{ConfirmEmailRequest, LoginRequest, LoginResponse, ResetPasswordRequest};
use crate::models::session_keys;

/// Authentication service.
pub struct AuthService<'a> {
    api: &'a ApiClient,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(api: &'a ApiClient) -> Self {
        Self { api }
    }

    // =========================================================================
    // Backend Operations
    // =========================================================================

    /// Exchange an email and password for a token pair.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the backend rejects the pair,
    /// `AuthError::MissingAccessToken` if it answers without a token, and
    /// `AuthError::Api` for transport or server failures.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthTokens, AuthError> {
        let response: LoginResponse = self
            .api
            .post("auth/login", &LoginRequest { email, password }, None)
            .await
            .map_err(|e| AuthError::from_api(e, AuthError::InvalidCredentials))?;

        let tokens = AuthTokens {
            access_token: response.access_token,
            refresh_token: response.refresh_token,
        };
        if tokens.access_token().is_none() {
            return Err(AuthError::MissingAccessToken);
        }

        tracing::info!("Login succeeded");
        Ok(tokens)
    }

    /// Set a new password using an emailed reset token.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidToken` if the backend rejects the token and
    /// `AuthError::Api` for other failures.
    #[instrument(skip_all)]
    pub async fn reset_password(&self, token: &str, password: &str) -> Result<(), AuthError> {
        self.api
            .post_no_content(
                "auth/reset-password",
                &ResetPasswordRequest { token, password },
                None,
            )
            .await
            .map_err(|e| AuthError::from_api(e, AuthError::InvalidToken))
    }

    /// Confirm an email address using an emailed token.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidToken` if the backend rejects the token and
    /// `AuthError::Api` for other failures.
    #[instrument(skip_all)]
    pub async fn confirm_email(&self, token: &str) -> Result<(), AuthError> {
        self.api
            .post_no_content("auth/confirm-email", &ConfirmEmailRequest { token }, None)
            .await
            .map_err(|e| AuthError::from_api(e, AuthError::InvalidToken))
    }
}

// =============================================================================
// Session Helpers
// =============================================================================

/// Store a token pair in the session.
///
/// The session id is cycled first so a pre-login id cannot be reused.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn store_tokens(session: &Session, tokens: &AuthTokens) -> Result<(), AuthError> {
    session.cycle_id().await?;
    session
        .insert(session_keys::AUTH_TOKENS, tokens.to_blob())
        .await?;
    Ok(())
}

/// Raw token blob stored in the session, if any.
///
/// # Errors
///
/// Returns an error if the session cannot be read.
pub async fn stored_blob(session: &Session) -> Result<Option<String>, AuthError> {
    Ok(session.get::<String>(session_keys::AUTH_TOKENS).await?)
}

/// Sign out: drop the token blob and everything else in the session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn logout(session: &Session) -> Result<(), AuthError> {
    session.remove::<String>(session_keys::AUTH_TOKENS).await?;
    session.flush().await?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use tower_sessions::MemoryStore;

    use super::*;
    use crate::api::ApiError;

    fn session() -> Session {
        Session::new(None, Arc::new(MemoryStore::default()), None)
    }

    #[tokio::test]
    async fn test_store_and_logout() {
        let session = session();
        assert!(stored_blob(&session).await.unwrap().is_none());

        let tokens = AuthTokens {
            access_token: Some("abc".to_string()),
            refresh_token: None,
        };
        store_tokens(&session, &tokens).await.unwrap();
        assert_eq!(
            stored_blob(&session).await.unwrap().as_deref(),
            Some(r#"{"accessToken":"abc"}"#)
        );

        logout(&session).await.unwrap();
        assert!(stored_blob(&session).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_presence_does_not_parse_blob() {
        let session = session();
        session
            .insert(session_keys::AUTH_TOKENS, "not json at all")
            .await
            .unwrap();
        assert_eq!(
            stored_blob(&session).await.unwrap().as_deref(),
            Some("not json at all")
        );
    }

    #[test]
    fn test_error_classification() {
        let rejected = AuthError::from_api(
            ApiError::Status {
                status: 401,
                message: "bad password".to_string(),
            },
            AuthError::InvalidCredentials,
        );
        assert!(matches!(rejected, AuthError::InvalidCredentials));
        assert!(rejected.is_rejection());

        let server = AuthError::from_api(
            ApiError::Status {
                status: 503,
                message: String::new(),
            },
            AuthError::InvalidCredentials,
        );
        assert!(matches!(server, AuthError::Api(_)));
        assert!(!server.is_rejection());
    }
}
