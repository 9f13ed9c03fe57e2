//! Consultation route handlers.
//!
//! Requesting a plate consultation, the consultation history and the
//! recommendations derived from it.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};

use verified_plate_core::schemas;
use verified_plate_core::validation::{FieldErrors, check};

use crate::api::types::{Consultation, NewConsultation, Recommendation};
use crate::filters;
use crate::routes::{FormInput, MessageQuery, form_for, load_list};
use crate::shell::Shell;
use crate::state::AppState;

pub const REQUEST_FAILED_MESSAGE: &str =
    "We couldn't request the consultation. Please try again.";

// =============================================================================
// Templates
// =============================================================================

/// New consultation page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/new_consultation.html")]
pub struct NewConsultationTemplate {
    pub shell: Shell,
    pub plate: String,
    pub errors: FieldErrors,
    pub error: Option<&'static str>,
}

/// Consultation history page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/history.html")]
pub struct HistoryTemplate {
    pub shell: Shell,
    pub consultations: Vec<Consultation>,
    pub notice: Option<&'static str>,
    pub success: Option<&'static str>,
}

/// Recommendations page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/recommendations.html")]
pub struct RecommendationsTemplate {
    pub shell: Shell,
    pub recommendations: Vec<Recommendation>,
    pub notice: Option<&'static str>,
}

// =============================================================================
// New Consultation
// =============================================================================

/// Display the consultation form.
pub async fn new_page(shell: Shell) -> impl IntoResponse {
    NewConsultationTemplate {
        shell,
        plate: String::new(),
        errors: FieldErrors::new(),
        error: None,
    }
}

/// Request a consultation for a plate.
pub async fn create(
    State(state): State<AppState>,
    shell: Shell,
    Form(input): Form<FormInput>,
) -> Response {
    let form = form_for(&schemas::NEW_CONSULTATION, &input);
    let errors = check(&schemas::NEW_CONSULTATION, &form);
    let plate = normalize_plate(form.value("plate"));

    if !errors.is_empty() {
        return NewConsultationTemplate {
            shell,
            plate: form.value("plate").to_string(),
            errors,
            error: None,
        }
        .into_response();
    }

    let requested = state
        .api()
        .post_no_content(
            "consultations",
            &NewConsultation { plate: &plate },
            shell.credentials(),
        )
        .await;

    match requested {
        Ok(()) => {
            tracing::info!(plate = %plate, "Consultation requested");
            Redirect::to("/history?success=consultation_requested").into_response()
        }
        Err(e) => {
            tracing::warn!(error = %e, "Failed to request consultation");
            NewConsultationTemplate {
                shell,
                plate,
                errors: FieldErrors::new(),
                error: Some(REQUEST_FAILED_MESSAGE),
            }
            .into_response()
        }
    }
}

/// Uppercase and drop the optional dash: `abc-1234` becomes `ABC1234`.
fn normalize_plate(raw: &str) -> String {
    raw.trim()
        .chars()
        .filter(|c| *c != '-')
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

// =============================================================================
// History & Recommendations
// =============================================================================

/// Display past consultations.
pub async fn history(
    State(state): State<AppState>,
    Query(query): Query<MessageQuery>,
    shell: Shell,
) -> impl IntoResponse {
    let (consultations, notice) = load_list(&state, &shell, "consultations").await;
    HistoryTemplate {
        shell,
        consultations,
        notice,
        success: query.success_message(),
    }
}

/// Display recommendations.
pub async fn recommendations(State(state): State<AppState>, shell: Shell) -> impl IntoResponse {
    let (recommendations, notice) = load_list(&state, &shell, "recommendations").await;
    RecommendationsTemplate {
        shell,
        recommendations,
        notice,
    }
}
