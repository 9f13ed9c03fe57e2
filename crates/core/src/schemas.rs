//! Schemas for each form screen.
//!
//! Messages here are what visitors see beneath the fields, so they are part of
//! the screens' behavior and covered by tests.

use std::sync::LazyLock;

use regex::Regex;

use crate::validation::{Rule, Schema, password};

pub const EMAIL_MESSAGE: &str = "Invalid email address";
pub const CONFIRM_REQUIRED_MESSAGE: &str = "Please confirm your password";
pub const MISMATCH_MESSAGE: &str = "Passwords don't match";

/// Brazilian plates: legacy `ABC-1234` / `ABC1234` or Mercosul `ABC1D23`.
static PLATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?i)[A-Z]{3}-?[0-9][A-Z0-9][0-9]{2}$").expect("Invalid regex")
});

/// Login screen.
pub static LOGIN: LazyLock<Schema> = LazyLock::new(|| {
    Schema::new()
        .field(
            "email",
            [
                Rule::required("Email is required"),
                Rule::email(EMAIL_MESSAGE),
            ],
        )
        .field(
            "password",
            [
                Rule::required("Password is required"),
                Rule::min_length(6, "Password must be at least 6 characters"),
            ],
        )
});

/// Signup step 1: identity and contact details.
pub static SIGNUP_IDENTITY: LazyLock<Schema> = LazyLock::new(|| {
    Schema::new()
        .field("id", [Rule::required("ID is required")])
        .field(
            "fullName",
            [Rule::min_length(2, "Full name must be at least 2 characters")],
        )
        .field("dateOfBirth", [Rule::required("Date of birth is required")])
        .field("email", [Rule::email(EMAIL_MESSAGE)])
        .field(
            "telephone",
            [Rule::min_length(10, "Telephone must be at least 10 characters")],
        )
});

/// Signup step 2: address and password.
pub static SIGNUP_CREDENTIALS: LazyLock<Schema> = LazyLock::new(|| {
    Schema::new()
        .field(
            "zipCode",
            [Rule::min_length(5, "ZIP code must be at least 5 characters")],
        )
        .field("houseNumber", [Rule::required("House number is required")])
        .field("password", password::rules())
        .field("confirmPassword", [Rule::required(CONFIRM_REQUIRED_MESSAGE)])
        .matching("password", "confirmPassword", MISMATCH_MESSAGE)
});

/// Forgot-password step 1: account email.
pub static RECOVERY_EMAIL: LazyLock<Schema> =
    LazyLock::new(|| Schema::new().field("email", [Rule::email(EMAIL_MESSAGE)]));

/// Forgot-password step 2: one-time code.
pub static RECOVERY_OTP: LazyLock<Schema> = LazyLock::new(|| {
    Schema::new().field("otp", [Rule::min_length(4, "OTP must be at least 4 digits")])
});

/// Forgot-password step 3: new password.
pub static RECOVERY_PASSWORD: LazyLock<Schema> = LazyLock::new(|| {
    Schema::new()
        .field("password", password::rules())
        .field("confirmPassword", [Rule::required(CONFIRM_REQUIRED_MESSAGE)])
        .matching("password", "confirmPassword", MISMATCH_MESSAGE)
});

/// Reset-password screen reached from an emailed link.
pub static RESET_PASSWORD: LazyLock<Schema> = LazyLock::new(|| {
    let mut rules = vec![Rule::required("Password is required")];
    rules.extend(password::rules());
    Schema::new()
        .field("password", rules)
        .field("confirmPassword", [Rule::required(CONFIRM_REQUIRED_MESSAGE)])
        .matching("password", "confirmPassword", MISMATCH_MESSAGE)
});

/// Contact form.
pub static CONTACT: LazyLock<Schema> = LazyLock::new(|| {
    Schema::new()
        .field(
            "name",
            [Rule::min_length(2, "Name must be at least 2 characters")],
        )
        .field("email", [Rule::email(EMAIL_MESSAGE)])
        .field(
            "message",
            [Rule::min_length(10, "Message must be at least 10 characters")],
        )
});

/// New consultation form.
pub static NEW_CONSULTATION: LazyLock<Schema> = LazyLock::new(|| {
    Schema::new().field(
        "plate",
        [Rule::pattern(&PLATE_RE, "Enter a valid plate, e.g. ABC1D23")],
    )
});

/// Account deletion confirmation.
pub static DELETE_ACCOUNT: LazyLock<Schema> = LazyLock::new(|| {
    Schema::new().field(
        "confirmation",
        [Rule::literal("DELETE", "Type DELETE to confirm")],
    )
});

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::FormState;
    use crate::validation::{FieldErrors, check};

    fn filled(schema: &Schema, values: &[(&str, &str)]) -> FormState {
        let names: Vec<&str> = schema.field_names().collect();
        let mut form = FormState::with_fields(&names);
        for (k, v) in values {
            form.set(k, *v);
        }
        form
    }

    #[test]
    fn test_login_empty_fields_report_required_first() {
        let errors = check(&LOGIN, &filled(&LOGIN, &[]));
        assert_eq!(errors.message("email"), "Email is required");
        assert_eq!(errors.message("password"), "Password is required");
    }

    #[test]
    fn test_login_short_password() {
        let form = filled(&LOGIN, &[("email", "a@b.co"), ("password", "12345")]);
        let errors = check(&LOGIN, &form);
        assert!(!errors.has("email"));
        assert_eq!(
            errors.message("password"),
            "Password must be at least 6 characters"
        );
    }

    #[test]
    fn test_signup_identity_every_empty_field_has_error() {
        let errors = check(&SIGNUP_IDENTITY, &filled(&SIGNUP_IDENTITY, &[]));
        for field in SIGNUP_IDENTITY.field_names() {
            assert!(!errors.message(field).is_empty(), "{field} should error");
        }
    }

    #[test]
    fn test_signup_credentials_weak_password_reports_all_missing_classes() {
        let form = filled(
            &SIGNUP_CREDENTIALS,
            &[
                ("zipCode", "01310-100"),
                ("houseNumber", "42"),
                ("password", "abc"),
                ("confirmPassword", "abc"),
            ],
        );
        let issues = SIGNUP_CREDENTIALS.validate(&form).unwrap_err();
        let password_messages: Vec<_> = issues
            .iter()
            .filter(|i| i.field == "password")
            .map(|i| i.message)
            .collect();
        assert_eq!(
            password_messages,
            [
                password::LENGTH_MESSAGE,
                password::DIGIT_MESSAGE,
                password::UPPER_MESSAGE,
                password::SPECIAL_MESSAGE,
            ]
        );
        assert_eq!(
            FieldErrors::from_issues(&issues).message("password"),
            password::LENGTH_MESSAGE
        );
    }

    #[test]
    fn test_mismatched_confirmation() {
        let form = filled(
            &RECOVERY_PASSWORD,
            &[("password", "Str0ng!pass"), ("confirmPassword", "Str0ng!pas")],
        );
        let errors = check(&RECOVERY_PASSWORD, &form);
        assert_eq!(errors.message("confirmPassword"), MISMATCH_MESSAGE);
        assert!(!errors.has("password"));
    }

    #[test]
    fn test_empty_confirmation_reports_required_before_mismatch() {
        let form = filled(&RECOVERY_PASSWORD, &[("password", "Str0ng!pass")]);
        let errors = check(&RECOVERY_PASSWORD, &form);
        assert_eq!(errors.message("confirmPassword"), CONFIRM_REQUIRED_MESSAGE);
    }

    #[test]
    fn test_reset_password_requires_value() {
        let errors = check(&RESET_PASSWORD, &filled(&RESET_PASSWORD, &[]));
        assert_eq!(errors.message("password"), "Password is required");
    }

    #[test]
    fn test_plate_formats() {
        for plate in ["ABC1D23", "abc1d23", "ABC-1234", "ABC1234"] {
            let form = filled(&NEW_CONSULTATION, &[("plate", plate)]);
            assert!(check(&NEW_CONSULTATION, &form).is_empty(), "{plate}");
        }
        for plate in ["", "AB1234", "ABCD123", "ABC-1D2"] {
            let form = filled(&NEW_CONSULTATION, &[("plate", plate)]);
            assert!(check(&NEW_CONSULTATION, &form).has("plate"), "{plate}");
        }
    }

    #[test]
    fn test_contact_valid() {
        let form = filled(
            &CONTACT,
            &[
                ("name", "Ana"),
                ("email", "ana@example.com"),
                ("message", "My plate report looks wrong."),
            ],
        );
        assert!(check(&CONTACT, &form).is_empty());
    }

    #[test]
    fn test_delete_confirmation() {
        let form = filled(&DELETE_ACCOUNT, &[("confirmation", "delete")]);
        assert_eq!(
            check(&DELETE_ACCOUNT, &form).message("confirmation"),
            "Type DELETE to confirm"
        );
    }
}
