//! Authentication error types.

use thiserror::Error;

use crate::api::ApiError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Backend rejected the email/password pair.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Login succeeded but the response carried no access token.
    #[error("login response did not include an access token")]
    MissingAccessToken,

    /// Reset or confirmation token was rejected.
    #[error("invalid or expired token")]
    InvalidToken,

    /// Backend call failed.
    #[error("api error: {0}")]
    Api(#[from] ApiError),

    /// Session could not be read or written.
    #[error("session error: {0}")]
    Session(#[from] tower_sessions::session::Error),
}

impl AuthError {
    /// Classify a backend error from a credential or token endpoint.
    pub(super) fn from_api(err: ApiError, rejected: Self) -> Self {
        match err {
            ApiError::Status {
                status: 400 | 401 | 403 | 404 | 410 | 422,
                ..
            } => rejected,
            other => Self::Api(other),
        }
    }

    /// Whether the failure came from the visitor's input rather than the system.
    #[must_use]
    pub const fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::InvalidCredentials | Self::MissingAccessToken | Self::InvalidToken
        )
    }
}
