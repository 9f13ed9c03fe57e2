//! Authentication route handlers.
//!
//! Handles login, logout, password reset from an emailed link and email
//! confirmation via the backend's auth endpoints.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;

use verified_plate_core::schemas;
use verified_plate_core::validation::password::{self, ChecklistStyle, Requirement};
use verified_plate_core::validation::{FieldErrors, check};

use crate::filters;
use crate::routes::{FormInput, MessageQuery, form_for};
use crate::services::{AuthService, auth as session_auth};
use crate::state::AppState;

pub const LOGIN_FAILED_MESSAGE: &str = "Login failed. Check your credentials.";
pub const RESET_FAILED_MESSAGE: &str = "Password reset failed. Please try again.";
pub const EMAIL_CONFIRMED_MESSAGE: &str = "Your email has been confirmed. You can now log in.";
pub const EMAIL_CONFIRM_FAILED_MESSAGE: &str = "This confirmation link is invalid or has expired.";

// =============================================================================
// Query Types
// =============================================================================

/// Query carrying an emailed token.
#[derive(Debug, Deserialize)]
pub struct TokenQuery {
    pub token: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    /// Entered email; the password is never echoed back.
    pub email: String,
    pub errors: FieldErrors,
    pub error: Option<&'static str>,
    pub success: Option<&'static str>,
}

/// Reset password page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/reset_password.html")]
pub struct ResetPasswordTemplate {
    pub token: String,
    pub errors: FieldErrors,
    pub error: Option<&'static str>,
    pub checklist: Vec<Requirement>,
}

/// Email confirmation page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/confirm_email.html")]
pub struct ConfirmEmailTemplate {
    /// `false` when the page was opened without a token.
    pub has_token: bool,
    pub confirmed: bool,
    pub message: &'static str,
}

// =============================================================================
// Login Routes
// =============================================================================

/// Display the login page.
pub async fn login_page(Query(query): Query<MessageQuery>) -> impl IntoResponse {
    LoginTemplate {
        email: String::new(),
        errors: FieldErrors::new(),
        error: query.error_message(),
        success: query.success_message(),
    }
}

/// Handle login form submission.
///
/// Validates the form, exchanges the credentials for a token pair and stores
/// it in the session.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(input): Form<FormInput>,
) -> Response {
    let form = form_for(&schemas::LOGIN, &input);
    let errors = check(&schemas::LOGIN, &form);
    let email = form.value("email").trim().to_string();

    if !errors.is_empty() {
        return LoginTemplate {
            email,
            errors,
            error: None,
            success: None,
        }
        .into_response();
    }

    let failed = |email: String| {
        LoginTemplate {
            email,
            errors: FieldErrors::new(),
            error: Some(LOGIN_FAILED_MESSAGE),
            success: None,
        }
        .into_response()
    };

    let result = AuthService::new(state.api())
        .login(&email, form.value("password"))
        .await;

    match result {
        Ok(tokens) => {
            if let Err(e) = session_auth::store_tokens(&session, &tokens).await {
                tracing::error!("Failed to set session: {}", e);
                return failed(email);
            }
            Redirect::to("/").into_response()
        }
        Err(e) => {
            tracing::warn!("Login failed: {}", e);
            failed(email)
        }
    }
}

// =============================================================================
// Logout Route
// =============================================================================

/// Handle logout.
///
/// Clears the token and the rest of the session.
pub async fn logout(session: Session) -> Response {
    if let Err(e) = session_auth::logout(&session).await {
        tracing::error!("Failed to clear session: {}", e);
    }

    Redirect::to("/login").into_response()
}

// =============================================================================
// Password Reset Routes
// =============================================================================

/// Redirect for links without a token.
fn invalid_reset_link() -> Response {
    Redirect::to("/forgot-password?error=invalid_reset_link").into_response()
}

/// Display the reset password page.
///
/// Called when the visitor follows the link in the reset email. The token is
/// checked by the backend on submission.
pub async fn reset_password_page(Query(query): Query<TokenQuery>) -> Response {
    match query.token.filter(|t| !t.trim().is_empty()) {
        Some(token) => ResetPasswordTemplate {
            token,
            errors: FieldErrors::new(),
            error: None,
            checklist: password::checklist("", ChecklistStyle::Descriptive),
        }
        .into_response(),
        None => invalid_reset_link(),
    }
}

/// Handle reset password form submission.
pub async fn reset_password(
    State(state): State<AppState>,
    Form(input): Form<FormInput>,
) -> Response {
    let Some(token) = input
        .get("token")
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
    else {
        return invalid_reset_link();
    };

    let form = form_for(&schemas::RESET_PASSWORD, &input);
    let errors = check(&schemas::RESET_PASSWORD, &form);
    let new_password = form.value("password");

    let render = |errors: FieldErrors, error: Option<&'static str>| {
        ResetPasswordTemplate {
            token: token.clone(),
            errors,
            error,
            checklist: password::checklist(new_password, ChecklistStyle::Descriptive),
        }
        .into_response()
    };

    if !errors.is_empty() {
        return render(errors, None);
    }

    let result = AuthService::new(state.api())
        .reset_password(&token, new_password)
        .await;

    match result {
        Ok(()) => Redirect::to("/login?success=password_reset").into_response(),
        Err(e) => {
            tracing::warn!("Password reset failed: {}", e);
            render(FieldErrors::new(), Some(RESET_FAILED_MESSAGE))
        }
    }
}

// =============================================================================
// Email Confirmation Route
// =============================================================================

/// Confirm an email address from the link in the welcome email.
pub async fn confirm_email(
    State(state): State<AppState>,
    Query(query): Query<TokenQuery>,
) -> impl IntoResponse {
    let Some(token) = query.token.filter(|t| !t.trim().is_empty()) else {
        return ConfirmEmailTemplate {
            has_token: false,
            confirmed: false,
            message: "",
        };
    };

    match AuthService::new(state.api()).confirm_email(&token).await {
        Ok(()) => ConfirmEmailTemplate {
            has_token: true,
            confirmed: true,
            message: EMAIL_CONFIRMED_MESSAGE,
        },
        Err(e) => {
            tracing::warn!("Email confirmation failed: {}", e);
            ConfirmEmailTemplate {
                has_token: true,
                confirmed: false,
                message: EMAIL_CONFIRM_FAILED_MESSAGE,
            }
        }
    }
}
