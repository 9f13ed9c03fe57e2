//! Linear multi-step form wizard.
//!
//! A wizard keeps one flat [`FormState`] covering every step. Advancing
//! validates only the current step's schema; going back never discards values.
//!
//! ```text
//! signup:           [1 identity] -> [2 credentials] -> (3 check your email)
//! forgot-password:  [1 email] -> [2 otp] -> [3 new password] -> done
//! ```
//!
//! Steps are numbered from 1. Once the last input step passes validation the
//! wizard is complete and rejects further transitions until it is restarted.

use serde::{Deserialize, Serialize};

use crate::form::FormState;
use crate::schemas;
use crate::validation::{FieldErrors, Schema};

/// Which flow a wizard runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardKind {
    /// Account registration.
    Signup,
    /// Password recovery by email and one-time code.
    ForgotPassword,
}

impl WizardKind {
    /// Every field across all steps.
    #[must_use]
    pub const fn fields(self) -> &'static [&'static str] {
        match self {
            Self::Signup => &[
                "id",
                "fullName",
                "dateOfBirth",
                "email",
                "telephone",
                "zipCode",
                "houseNumber",
                "password",
                "confirmPassword",
            ],
            Self::ForgotPassword => &["email", "otp", "password", "confirmPassword"],
        }
    }

    /// Number of steps that collect input.
    #[must_use]
    pub const fn input_steps(self) -> u8 {
        match self {
            Self::Signup => 2,
            Self::ForgotPassword => 3,
        }
    }

    /// Total number of steps, including a trailing confirmation step.
    #[must_use]
    pub const fn total_steps(self) -> u8 {
        3
    }

    /// Schema for an input step; `None` outside `1..=input_steps()`.
    #[must_use]
    pub fn schema(self, step: u8) -> Option<&'static Schema> {
        let schema: &'static Schema = match (self, step) {
            (Self::Signup, 1) => &schemas::SIGNUP_IDENTITY,
            (Self::Signup, 2) => &schemas::SIGNUP_CREDENTIALS,
            (Self::ForgotPassword, 1) => &schemas::RECOVERY_EMAIL,
            (Self::ForgotPassword, 2) => &schemas::RECOVERY_OTP,
            (Self::ForgotPassword, 3) => &schemas::RECOVERY_PASSWORD,
            _ => return None,
        };
        Some(schema)
    }
}

/// Result of a navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Moved to the given step.
    Moved(u8),
    /// The current step failed validation; errors are populated.
    Rejected,
    /// The last input step passed validation. Submit the form now.
    Completed,
    /// Nothing to do (back on step 1, or the wizard already completed).
    Stayed,
}

/// Wizard position, values and current errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wizard {
    kind: WizardKind,
    step: u8,
    form: FormState,
    #[serde(default)]
    errors: FieldErrors,
    #[serde(default)]
    completed: bool,
}

impl Wizard {
    /// Start a flow on step 1 with every field empty.
    #[must_use]
    pub fn new(kind: WizardKind) -> Self {
        Self {
            kind,
            step: 1,
            form: FormState::with_fields(kind.fields()),
            errors: FieldErrors::new(),
            completed: false,
        }
    }

    #[must_use]
    pub const fn kind(&self) -> WizardKind {
        self.kind
    }

    /// Current step, starting at 1.
    #[must_use]
    pub const fn step(&self) -> u8 {
        self.step
    }

    #[must_use]
    pub const fn form(&self) -> &FormState {
        &self.form
    }

    /// Mutable values, for applying a submission.
    pub const fn form_mut(&mut self) -> &mut FormState {
        &mut self.form
    }

    #[must_use]
    pub const fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    #[must_use]
    pub const fn is_completed(&self) -> bool {
        self.completed
    }

    /// Returns `true` when the current step is the last one collecting input.
    #[must_use]
    pub const fn on_last_input_step(&self) -> bool {
        self.step == self.kind.input_steps()
    }

    /// Validate the current step and advance if it passes.
    pub fn next(&mut self) -> Transition {
        if self.completed {
            return Transition::Stayed;
        }
        let Some(schema) = self.kind.schema(self.step) else {
            return Transition::Stayed;
        };

        if let Err(issues) = schema.validate(&self.form) {
            self.errors = FieldErrors::from_issues(&issues);
            return Transition::Rejected;
        }

        self.errors.clear();
        if self.on_last_input_step() {
            self.completed = true;
            if self.step < self.kind.total_steps() {
                self.step += 1;
            }
            Transition::Completed
        } else {
            self.step += 1;
            Transition::Moved(self.step)
        }
    }

    /// Go back one step, clearing errors and keeping values.
    pub fn back(&mut self) -> Transition {
        if self.completed {
            return Transition::Stayed;
        }
        self.errors.clear();
        if self.step > 1 {
            self.step -= 1;
            Transition::Moved(self.step)
        } else {
            Transition::Stayed
        }
    }
}
