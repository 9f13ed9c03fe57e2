//! HTTP route handlers for the portal.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Health check
//!
//! # Public (auth screens)
//! GET  /login                  - Login page
//! POST /login                  - Login action (rate limited)
//! GET  /signup                 - Signup wizard, step 1 (restarts the wizard)
//! POST /signup                 - Signup wizard step (action=next|back)
//! GET  /forgot-password        - Forgot-password wizard, step 1
//! POST /forgot-password        - Forgot-password wizard step (action=next|back)
//! GET  /reset-password?token=  - New password form
//! POST /reset-password         - Reset action (rate limited)
//! GET  /confirm-email?token=   - Email confirmation
//!
//! # Private (session token required, rendered in the shell)
//! GET  /                       - Dashboard
//! GET  /new-consultation       - Plate consultation form
//! POST /new-consultation       - Request consultation
//! GET  /history                - Past consultations
//! GET  /my-recommendations     - Recommendations
//! GET  /profile                - Account data
//! GET  /purchases              - Purchase history
//! GET  /always-connected       - Monitoring plan
//! GET  /delete-account         - Deletion confirmation
//! POST /delete-account         - Delete account
//! GET  /blogs                  - Blog index
//! GET  /blogs/{slug}           - Blog post
//! GET  /contact                - Contact form
//! POST /contact                - Send message
//! POST /logout                 - Log out
//!
//! # Cart (overlay is opened with ?cart=open on any private page)
//! POST /cart/add               - Add a package
//! POST /cart/remove            - Remove a package
//! POST /cart/checkout          - Purchase the cart
//! ```

pub mod account;
pub mod auth;
pub mod blog;
pub mod cart;
pub mod consultations;
pub mod contact;
pub mod forgot_password;
pub mod home;
pub mod signup;

use std::collections::HashMap;

use axum::{
    Router,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use verified_plate_core::{FormState, Schema, Transition, Wizard};

use crate::error::NotFoundTemplate;
use crate::middleware::auth_rate_limiter;
use crate::shell::{LOAD_FAILED_MESSAGE, Shell};
use crate::state::AppState;

// =============================================================================
// Shared Helpers
// =============================================================================

/// Raw submitted form fields.
pub type FormInput = HashMap<String, String>;

/// Query parameters for error/success display.
#[derive(Debug, Default, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
    pub success: Option<String>,
}

impl MessageQuery {
    /// Visitor-facing text for the `error` code.
    #[must_use]
    pub fn error_message(&self) -> Option<&'static str> {
        self.error.as_deref().and_then(message_for)
    }

    /// Visitor-facing text for the `success` code.
    #[must_use]
    pub fn success_message(&self) -> Option<&'static str> {
        self.success.as_deref().and_then(message_for)
    }
}

/// Messages carried across redirects as short codes.
fn message_for(code: &str) -> Option<&'static str> {
    Some(match code {
        "password_reset" => "Password reset successfully!",
        "account_deleted" => "Your account has been deleted.",
        "invalid_reset_link" => "Invalid reset link. Please request a new password reset.",
        "consultation_requested" => "Consultation requested. The result will appear here soon.",
        "purchase_completed" => "Purchase completed. Your consultations are available.",
        "message_sent" => "Thanks! We'll get back to you soon.",
        _ => return None,
    })
}

/// Form state for `schema` populated from a submission.
#[must_use]
pub fn form_for(schema: &Schema, input: &FormInput) -> FormState {
    let names: Vec<&str> = schema.field_names().collect();
    let mut form = FormState::with_fields(&names);
    form.merge(input);
    form
}

/// Merge a wizard step submission and perform the requested navigation
/// (`action=back`, anything else advances).
///
/// Only the current step's fields are taken from the submission. Values for
/// other steps were validated when their step was left and stay as stored.
pub fn apply_step(wizard: &mut Wizard, input: &FormInput) -> Transition {
    if wizard.is_completed() {
        return Transition::Stayed;
    }
    if let Some(schema) = wizard.kind().schema(wizard.step()) {
        let form = wizard.form_mut();
        for name in schema.field_names() {
            if let Some(value) = input.get(name) {
                form.set(name, value.clone());
            }
        }
    }

    match input.get("action").map(String::as_str) {
        Some("back") => wizard.back(),
        _ => wizard.next(),
    }
}

/// Fetch a list for a private page.
///
/// Failures degrade to an empty list plus the load-failure notice.
pub async fn load_list<T: DeserializeOwned>(
    state: &AppState,
    shell: &Shell,
    path: &str,
) -> (Vec<T>, Option<&'static str>) {
    match state.api().get::<Vec<T>>(path, shell.credentials()).await {
        Ok(items) => (items, None),
        Err(e) => {
            tracing::warn!(error = %e, path, "Failed to load list");
            (Vec::new(), Some(LOAD_FAILED_MESSAGE))
        }
    }
}

// =============================================================================
// Routers
// =============================================================================

/// Create the public auth routes router.
///
/// `trust_proxy_headers` is passed to the credential rate limiter.
pub fn auth_routes(trust_proxy_headers: bool) -> Router<AppState> {
    Router::new()
        .route(
            "/login",
            get(auth::login_page).merge(post(auth::login).layer(auth_rate_limiter(trust_proxy_headers))),
        )
        .route("/signup", get(signup::page).post(signup::submit))
        .route(
            "/forgot-password",
            get(forgot_password::page).post(forgot_password::submit),
        )
        .route(
            "/reset-password",
            get(auth::reset_password_page)
                .merge(post(auth::reset_password).layer(auth_rate_limiter(trust_proxy_headers))),
        )
        .route("/confirm-email", get(auth::confirm_email))
        .route("/logout", post(auth::logout))
}

/// Create the private page routes router.
pub fn private_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::dashboard))
        .route(
            "/new-consultation",
            get(consultations::new_page).post(consultations::create),
        )
        .route("/history", get(consultations::history))
        .route("/my-recommendations", get(consultations::recommendations))
        .route("/profile", get(account::profile))
        .route("/purchases", get(account::purchases))
        .route("/always-connected", get(account::always_connected))
        .route(
            "/delete-account",
            get(account::delete_page).post(account::delete),
        )
        .route("/blogs", get(blog::index))
        .route("/blogs/{slug}", get(blog::show))
        .route("/contact", get(contact::page).post(contact::submit))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/add", post(cart::add))
        .route("/remove", post(cart::remove))
        .route("/checkout", post(cart::checkout))
}

/// Create all routes for the portal.
pub fn routes(trust_proxy_headers: bool) -> Router<AppState> {
    Router::new()
        .merge(auth_routes(trust_proxy_headers))
        .merge(private_routes())
        .nest("/cart", cart_routes())
        .fallback(not_found)
}

/// Catch-all for unknown paths.
pub async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, NotFoundTemplate)
}

#[cfg(test)]
mod tests {
    use verified_plate_core::{WizardKind, schemas};

    use super::*;

    fn input(pairs: &[(&str, &str)]) -> FormInput {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_apply_step_next_and_back() {
        let mut wizard = Wizard::new(WizardKind::Signup);
        let step1 = input(&[
            ("id", "12345-67"),
            ("fullName", "Ana Souza"),
            ("dateOfBirth", "1990-04-01"),
            ("email", "ana@example.com"),
            ("telephone", "(11) 98765-4321"),
            ("action", "next"),
        ]);
        assert_eq!(apply_step(&mut wizard, &step1), Transition::Moved(2));

        // Going back submits the step-2 inputs without wiping step 1.
        let back = input(&[("zipCode", "01310"), ("action", "back")]);
        assert_eq!(apply_step(&mut wizard, &back), Transition::Moved(1));
        assert_eq!(wizard.form().value("fullName"), "Ana Souza");
        assert_eq!(wizard.form().value("zipCode"), "01310");
        assert!(!wizard.form().contains("action"));
    }

    #[test]
    fn test_apply_step_keeps_other_steps_values() {
        let mut wizard = Wizard::new(WizardKind::Signup);
        let step1 = input(&[
            ("id", "12345-67"),
            ("fullName", "Ana Souza"),
            ("dateOfBirth", "1990-04-01"),
            ("email", "ana@example.com"),
            ("telephone", "(11) 98765-4321"),
        ]);
        assert_eq!(apply_step(&mut wizard, &step1), Transition::Moved(2));

        // Step-1 fields sent along with step 2 are not taken.
        let step2 = input(&[
            ("zipCode", "01310-100"),
            ("houseNumber", "42"),
            ("password", "Str0ng!pass"),
            ("confirmPassword", "Str0ng!pass"),
            ("email", "not-an-email"),
            ("fullName", ""),
        ]);
        assert_eq!(apply_step(&mut wizard, &step2), Transition::Completed);
        assert_eq!(wizard.form().value("email"), "ana@example.com");
        assert_eq!(wizard.form().value("fullName"), "Ana Souza");
        assert!(schemas::SIGNUP_IDENTITY.validate(wizard.form()).is_ok());
    }

    #[test]
    fn test_apply_step_back_ignores_earlier_fields() {
        let mut wizard = Wizard::new(WizardKind::ForgotPassword);
        let email = input(&[("email", "ana@example.com")]);
        assert_eq!(apply_step(&mut wizard, &email), Transition::Moved(2));

        let back = input(&[("otp", "123456"), ("email", "x"), ("action", "back")]);
        assert_eq!(apply_step(&mut wizard, &back), Transition::Moved(1));
        assert_eq!(wizard.form().value("email"), "ana@example.com");
        assert_eq!(wizard.form().value("otp"), "123456");
    }

    #[test]
    fn test_apply_step_without_action_advances() {
        let mut wizard = Wizard::new(WizardKind::ForgotPassword);
        assert_eq!(apply_step(&mut wizard, &input(&[])), Transition::Rejected);
        assert_eq!(wizard.errors().message("email"), "Invalid email address");
    }

    #[test]
    fn test_form_for_ignores_unknown_fields() {
        let form = form_for(
            &schemas::LOGIN,
            &input(&[("email", "a@b.co"), ("admin", "true")]),
        );
        assert_eq!(form.value("email"), "a@b.co");
        assert_eq!(form.value("password"), "");
        assert!(!form.contains("admin"));
    }

    #[test]
    fn test_message_codes() {
        let query = MessageQuery {
            error: Some("invalid_reset_link".to_string()),
            success: Some("<script>".to_string()),
        };
        assert_eq!(
            query.error_message(),
            Some("Invalid reset link. Please request a new password reset.")
        );
        assert_eq!(query.success_message(), None);
    }
}
