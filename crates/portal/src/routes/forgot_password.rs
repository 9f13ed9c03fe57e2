//! Forgot-password wizard.
//!
//! Email, then the one-time code, then the new password. On completion the
//! visitor lands on the login page with a success notice.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::Query,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use verified_plate_core::validation::FieldErrors;
use verified_plate_core::validation::password::{self, ChecklistStyle, Requirement};
use verified_plate_core::{FormState, Transition, Wizard, WizardKind};

use crate::error::AppError;
use crate::filters;
use crate::models::session_keys;
use crate::routes::{FormInput, MessageQuery, apply_step};

/// Forgot-password page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/forgot_password.html")]
pub struct ForgotPasswordTemplate {
    pub step: u8,
    pub total_steps: u8,
    pub form: FormState,
    pub errors: FieldErrors,
    pub checklist: Vec<Requirement>,
    pub error: Option<&'static str>,
}

impl ForgotPasswordTemplate {
    fn from_wizard(wizard: &Wizard, error: Option<&'static str>) -> Self {
        Self {
            step: wizard.step(),
            total_steps: wizard.kind().total_steps(),
            form: wizard.form().clone(),
            errors: wizard.errors().clone(),
            checklist: password::checklist(
                wizard.form().value("password"),
                ChecklistStyle::Descriptive,
            ),
            error,
        }
    }
}

/// Start the forgot-password wizard.
pub async fn page(
    session: Session,
    Query(query): Query<MessageQuery>,
) -> Result<impl IntoResponse, AppError> {
    let wizard = Wizard::new(WizardKind::ForgotPassword);
    session.insert(session_keys::RECOVERY_WIZARD, &wizard).await?;
    Ok(ForgotPasswordTemplate::from_wizard(
        &wizard,
        query.error_message(),
    ))
}

/// Apply a step submission (`action=next` or `action=back`).
pub async fn submit(session: Session, Form(input): Form<FormInput>) -> Result<Response, AppError> {
    let mut wizard = session
        .get::<Wizard>(session_keys::RECOVERY_WIZARD)
        .await?
        .filter(|w| w.kind() == WizardKind::ForgotPassword)
        .unwrap_or_else(|| Wizard::new(WizardKind::ForgotPassword));

    if apply_step(&mut wizard, &input) == Transition::Completed {
        submit_recovery(wizard.form());
        session
            .remove::<Wizard>(session_keys::RECOVERY_WIZARD)
            .await?;
        return Ok(Redirect::to("/login?success=password_reset").into_response());
    }

    session.insert(session_keys::RECOVERY_WIZARD, &wizard).await?;
    Ok(ForgotPasswordTemplate::from_wizard(&wizard, None).into_response())
}

/// Recovery hand-off.
///
/// The recovery endpoints are not wired to the backend yet; completion is
/// only logged, without the code or password.
fn submit_recovery(form: &FormState) {
    let has_code = !form.value("otp").is_empty();
    tracing::info!(has_code, "Password recovery submitted");
}
