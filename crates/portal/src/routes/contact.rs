//! Contact form route handlers.
//!
//! Messages are forwarded to the backend's support inbox.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use tracing::instrument;

use verified_plate_core::validation::{FieldErrors, check};
use verified_plate_core::{FormState, schemas};

use crate::api::types::ContactMessage;
use crate::filters;
use crate::routes::{FormInput, MessageQuery, form_for};
use crate::shell::Shell;
use crate::state::AppState;

pub const SEND_FAILED_MESSAGE: &str = "Something went wrong. Please try again.";

/// Contact page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/contact.html")]
pub struct ContactTemplate {
    pub shell: Shell,
    pub form: FormState,
    pub errors: FieldErrors,
    pub error: Option<&'static str>,
    pub success: Option<&'static str>,
}

/// Display the contact form, prefilled from the account when available.
pub async fn page(Query(query): Query<MessageQuery>, shell: Shell) -> impl IntoResponse {
    let mut form = form_for(&schemas::CONTACT, &FormInput::new());
    if let Some(account) = &shell.account {
        form.set("name", account.full_name.clone());
        form.set("email", account.email.clone());
    }

    ContactTemplate {
        shell,
        form,
        errors: FieldErrors::new(),
        error: None,
        success: query.success_message(),
    }
}

/// Submit a contact message.
#[instrument(skip_all)]
pub async fn submit(
    State(state): State<AppState>,
    shell: Shell,
    Form(input): Form<FormInput>,
) -> Response {
    let form = form_for(&schemas::CONTACT, &input);
    let errors = check(&schemas::CONTACT, &form);
    if !errors.is_empty() {
        return ContactTemplate {
            shell,
            form,
            errors,
            error: None,
            success: None,
        }
        .into_response();
    }

    let message = ContactMessage {
        name: form.value("name").trim(),
        email: form.value("email").trim(),
        message: form.value("message").trim(),
    };

    let sent = state
        .api()
        .post_no_content("contact", &message, shell.credentials())
        .await;

    match sent {
        Ok(()) => {
            tracing::info!("Contact message sent");
            Redirect::to("/contact?success=message_sent").into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to send contact message");
            ContactTemplate {
                shell,
                form,
                errors: FieldErrors::new(),
                error: Some(SEND_FAILED_MESSAGE),
                success: None,
            }
            .into_response()
        }
    }
}
