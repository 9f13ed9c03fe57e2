//! Password policy.
//!
//! A new password needs all five classes: length, digit, lowercase, uppercase
//! and special character. Every rule is checked, so a weak password yields one
//! issue per missing class.

use std::sync::LazyLock;

use regex::Regex;

use super::Rule;

/// Minimum password length for new passwords.
pub const MIN_LENGTH: usize = 8;

static DIGIT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new("[0-9]").expect("Invalid regex"));
static LOWER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new("[a-z]").expect("Invalid regex"));
static UPPER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new("[A-Z]").expect("Invalid regex"));
static SPECIAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[!@#$%^&*(),.?":{}|<>]"#).expect("Invalid regex"));

pub const LENGTH_MESSAGE: &str = "Must be at least 8 characters long";
pub const DIGIT_MESSAGE: &str = "Must have at least one number";
pub const LOWER_MESSAGE: &str = "Must have at least one lowercase letter";
pub const UPPER_MESSAGE: &str = "Must have at least one capital letter";
pub const SPECIAL_MESSAGE: &str = "Must have at least one special character";

/// Wording used for the live requirement checklist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChecklistStyle {
    /// "Must have at least one number" (signup).
    Imperative,
    /// "Contains at least one number" (password recovery).
    Descriptive,
}

/// One line of the requirement checklist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Requirement {
    /// Whether the current password satisfies the requirement.
    pub met: bool,
    /// Text shown next to the check mark.
    pub text: &'static str,
}

/// The five policy rules, in display order.
#[must_use]
pub fn rules() -> [Rule; 5] {
    [
        Rule::min_length(MIN_LENGTH, LENGTH_MESSAGE),
        Rule::pattern(&DIGIT_RE, DIGIT_MESSAGE),
        Rule::pattern(&LOWER_RE, LOWER_MESSAGE),
        Rule::pattern(&UPPER_RE, UPPER_MESSAGE),
        Rule::pattern(&SPECIAL_RE, SPECIAL_MESSAGE),
    ]
}

/// Evaluate the checklist for the password typed so far.
#[must_use]
pub fn checklist(password: &str, style: ChecklistStyle) -> Vec<Requirement> {
    let descriptive = [
        "At least 8 characters long",
        "Contains at least one number",
        "Contains at least one lowercase letter",
        "Contains at least one capital letter",
        "Contains at least one special character",
    ];

    rules()
        .iter()
        .zip(descriptive)
        .map(|(rule, description)| Requirement {
            met: rule.check(password),
            text: match style {
                ChecklistStyle::Imperative => rule.message(),
                ChecklistStyle::Descriptive => description,
            },
        })
        .collect()
}

/// Messages for every requirement the password misses.
#[must_use]
pub fn missing(password: &str) -> Vec<&'static str> {
    rules()
        .iter()
        .filter(|rule| !rule.check(password))
        .map(Rule::message)
        .collect()
}
