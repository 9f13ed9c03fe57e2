//! Stored authentication tokens.
//!
//! After login the backend's token pair is kept in the visitor session as a
//! JSON blob (`{"accessToken": "...", "refreshToken": "..."}`). The blob is
//! stored verbatim so that presence checks never need to parse it; only the
//! HTTP client parses it, right before attaching a bearer credential.

use core::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from reading a stored token blob.
#[derive(Debug, Error)]
pub enum TokenError {
    /// The blob is not valid JSON of the expected shape.
    #[error("invalid token blob: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Token pair issued by the backend on login.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthTokens {
    /// Short-lived bearer credential.
    #[serde(default)]
    pub access_token: Option<String>,
    /// Refresh credential. Kept for the backend; the portal never refreshes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

impl AuthTokens {
    /// Parse a stored blob.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Malformed` if the blob is not a JSON object with
    /// optional string `accessToken` / `refreshToken` fields.
    pub fn from_blob(blob: &str) -> Result<Self, TokenError> {
        Ok(serde_json::from_str(blob)?)
    }

    /// Serialize to the stored blob form.
    #[must_use]
    pub fn to_blob(&self) -> String {
        // Serializing a struct of optional strings cannot fail.
        serde_json::to_string(self).unwrap_or_default()
    }

    /// The access token, if present and non-empty.
    #[must_use]
    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref().filter(|t| !t.is_empty())
    }
}

impl fmt::Debug for AuthTokens {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthTokens")
            .field("access_token", &self.access_token.as_ref().map(|_| "[REDACTED]"))
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}
