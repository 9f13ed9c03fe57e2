//! Account route handlers ("My data").
//!
//! Profile, purchase history, the monitoring plan and account deletion.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use verified_plate_core::schemas;
use verified_plate_core::validation::{FieldErrors, check};

use crate::api::types::Purchase;
use crate::filters;
use crate::routes::{FormInput, MessageQuery, form_for, load_list};
use crate::services::auth as session_auth;
use crate::shell::{LOAD_FAILED_MESSAGE, Shell};
use crate::state::AppState;

pub const DELETE_FAILED_MESSAGE: &str = "We couldn't delete your account. Please try again.";

// =============================================================================
// Templates
// =============================================================================

/// Profile page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/profile.html")]
pub struct ProfileTemplate {
    pub shell: Shell,
    pub notice: Option<&'static str>,
}

/// Purchase history page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/purchases.html")]
pub struct PurchasesTemplate {
    pub shell: Shell,
    pub purchases: Vec<Purchase>,
    pub notice: Option<&'static str>,
    pub success: Option<&'static str>,
}

/// Always Connected page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/always_connected.html")]
pub struct AlwaysConnectedTemplate {
    pub shell: Shell,
}

/// Delete account page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/delete_account.html")]
pub struct DeleteAccountTemplate {
    pub shell: Shell,
    pub errors: FieldErrors,
    pub error: Option<&'static str>,
}

// =============================================================================
// Routes
// =============================================================================

/// Display the account data.
///
/// The shell already fetched `GET /me` for the top bar.
pub async fn profile(shell: Shell) -> impl IntoResponse {
    let notice = shell.account.is_none().then_some(LOAD_FAILED_MESSAGE);
    ProfileTemplate { shell, notice }
}

/// Display purchase history.
pub async fn purchases(
    State(state): State<AppState>,
    Query(query): Query<MessageQuery>,
    shell: Shell,
) -> impl IntoResponse {
    let (purchases, notice) = load_list(&state, &shell, "purchases").await;
    PurchasesTemplate {
        shell,
        purchases,
        notice,
        success: query.success_message(),
    }
}

/// Display the Always Connected plan.
pub async fn always_connected(shell: Shell) -> impl IntoResponse {
    AlwaysConnectedTemplate { shell }
}

/// Display the deletion confirmation form.
pub async fn delete_page(shell: Shell) -> impl IntoResponse {
    DeleteAccountTemplate {
        shell,
        errors: FieldErrors::new(),
        error: None,
    }
}

/// Delete the account after the visitor typed `DELETE`.
pub async fn delete(
    State(state): State<AppState>,
    session: Session,
    shell: Shell,
    Form(input): Form<FormInput>,
) -> Response {
    let form = form_for(&schemas::DELETE_ACCOUNT, &input);
    let errors = check(&schemas::DELETE_ACCOUNT, &form);
    if !errors.is_empty() {
        return DeleteAccountTemplate {
            shell,
            errors,
            error: None,
        }
        .into_response();
    }

    if let Err(e) = state.api().delete("me", shell.credentials()).await {
        tracing::warn!(error = %e, "Account deletion failed");
        return DeleteAccountTemplate {
            shell,
            errors: FieldErrors::new(),
            error: Some(DELETE_FAILED_MESSAGE),
        }
        .into_response();
    }

    tracing::info!("Account deleted");
    if let Err(e) = session_auth::logout(&session).await {
        tracing::error!("Failed to clear session after deletion: {}", e);
    }

    Redirect::to("/login?success=account_deleted").into_response()
}
