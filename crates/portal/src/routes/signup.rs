//! Signup wizard.
//!
//! Two input steps (identity, then address and password) followed by a
//! confirmation step telling the visitor to check their inbox. Progress is
//! kept in the session; a `GET` always starts over.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    response::{IntoResponse, Response},
};
use tower_sessions::Session;

use verified_plate_core::validation::FieldErrors;
use verified_plate_core::validation::password::{self, ChecklistStyle, Requirement};
use verified_plate_core::{FormState, Transition, Wizard, WizardKind};

use crate::error::AppError;
use crate::filters;
use crate::models::session_keys;
use crate::routes::{FormInput, apply_step};

/// Signup page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/signup.html")]
pub struct SignupTemplate {
    pub step: u8,
    pub total_steps: u8,
    pub form: FormState,
    pub errors: FieldErrors,
    pub checklist: Vec<Requirement>,
}

impl SignupTemplate {
    fn from_wizard(wizard: &Wizard) -> Self {
        Self {
            step: wizard.step(),
            total_steps: wizard.kind().total_steps(),
            form: wizard.form().clone(),
            errors: wizard.errors().clone(),
            checklist: password::checklist(
                wizard.form().value("password"),
                ChecklistStyle::Imperative,
            ),
        }
    }
}

/// Start the signup wizard.
pub async fn page(session: Session) -> Result<impl IntoResponse, AppError> {
    let wizard = Wizard::new(WizardKind::Signup);
    session.insert(session_keys::SIGNUP_WIZARD, &wizard).await?;
    Ok(SignupTemplate::from_wizard(&wizard))
}

/// Apply a step submission (`action=next` or `action=back`).
pub async fn submit(session: Session, Form(input): Form<FormInput>) -> Result<Response, AppError> {
    let mut wizard = session
        .get::<Wizard>(session_keys::SIGNUP_WIZARD)
        .await?
        .filter(|w| w.kind() == WizardKind::Signup)
        .unwrap_or_else(|| Wizard::new(WizardKind::Signup));

    let transition = apply_step(&mut wizard, &input);
    if transition == Transition::Completed {
        submit_registration(wizard.form());
    }

    session.insert(session_keys::SIGNUP_WIZARD, &wizard).await?;
    Ok(SignupTemplate::from_wizard(&wizard).into_response())
}

/// Registration hand-off.
///
/// Registration is not wired to the backend yet; the completed form is only
/// logged, without personal data or secrets.
fn submit_registration(form: &FormState) {
    let filled = form.iter().filter(|(_, v)| !v.is_empty()).count();
    tracing::info!(fields = filled, "Signup form submitted");
}
