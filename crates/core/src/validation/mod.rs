//! Declarative form validation.
//!
//! A [`Schema`] lists, per field, the rules the field's value must satisfy,
//! plus cross-field refinements (password confirmation). Validation is
//! exhaustive: every failing rule of every field yields an [`Issue`], in
//! declaration order, followed by failing refinements. Screens collapse the
//! issues into a [`FieldErrors`] map that keeps the first message per field.
//!
//! ```
//! use verified_plate_core::validation::{Rule, Schema, FieldErrors};
//! use verified_plate_core::FormState;
//!
//! let schema = Schema::new()
//!     .field("email", [Rule::required("Email is required"), Rule::email("Invalid email address")]);
//!
//! let form = FormState::with_fields(&["email"]);
//! let issues = schema.validate(&form).unwrap_err();
//! assert_eq!(issues.len(), 2);
//!
//! let errors = FieldErrors::from_issues(&issues);
//! assert_eq!(errors.message("email"), "Email is required");
//! ```

pub mod password;

use std::collections::BTreeMap;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::form::FormState;
use crate::types::email;

/// A single failed rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Issue {
    /// Field the message is attached to.
    pub field: &'static str,
    /// Human-readable message shown beneath the field.
    pub message: &'static str,
}

/// One validation rule for a string value.
#[derive(Debug, Clone)]
pub enum Rule {
    /// Value must have at least `min` characters.
    MinLength {
        /// Minimum number of characters.
        min: usize,
        /// Message when violated.
        message: &'static str,
    },
    /// Value must be shaped like an email address.
    Email {
        /// Message when violated.
        message: &'static str,
    },
    /// Value must match the regex somewhere.
    Pattern {
        /// Pattern searched for.
        regex: &'static Regex,
        /// Message when violated.
        message: &'static str,
    },
    /// Value must equal the given literal.
    Literal {
        /// Expected value.
        expected: &'static str,
        /// Message when violated.
        message: &'static str,
    },
}

impl Rule {
    /// Non-empty value.
    #[must_use]
    pub const fn required(message: &'static str) -> Self {
        Self::MinLength { min: 1, message }
    }

    /// At least `min` characters.
    #[must_use]
    pub const fn min_length(min: usize, message: &'static str) -> Self {
        Self::MinLength { min, message }
    }

    /// Email address shape.
    #[must_use]
    pub const fn email(message: &'static str) -> Self {
        Self::Email { message }
    }

    /// Regex match.
    #[must_use]
    pub const fn pattern(regex: &'static Regex, message: &'static str) -> Self {
        Self::Pattern { regex, message }
    }

    /// Exact value.
    #[must_use]
    pub const fn literal(expected: &'static str, message: &'static str) -> Self {
        Self::Literal { expected, message }
    }

    /// Message reported when the rule fails.
    #[must_use]
    pub const fn message(&self) -> &'static str {
        match self {
            Self::MinLength { message, .. }
            | Self::Email { message }
            | Self::Pattern { message, .. }
            | Self::Literal { message, .. } => message,
        }
    }

    /// Returns `true` if `value` satisfies the rule.
    #[must_use]
    pub fn check(&self, value: &str) -> bool {
        match self {
            Self::MinLength { min, .. } => value.chars().count() >= *min,
            Self::Email { .. } => email::is_well_formed(value),
            Self::Pattern { regex, .. } => regex.is_match(value),
            Self::Literal { expected, .. } => value == *expected,
        }
    }
}

/// Cross-field check: `field` must equal `other`, reported on `other`.
#[derive(Debug, Clone)]
struct Matching {
    field: &'static str,
    other: &'static str,
    message: &'static str,
}

/// Rules for a set of fields.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    fields: Vec<(&'static str, Vec<Rule>)>,
    matching: Vec<Matching>,
}

impl Schema {
    /// Create an empty schema.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            fields: Vec::new(),
            matching: Vec::new(),
        }
    }

    /// Add a field with its rules, checked in the given order.
    #[must_use]
    pub fn field(mut self, name: &'static str, rules: impl IntoIterator<Item = Rule>) -> Self {
        self.fields.push((name, rules.into_iter().collect()));
        self
    }

    /// Require `other` to equal `field`; the message is attached to `other`.
    #[must_use]
    pub fn matching(
        mut self,
        field: &'static str,
        other: &'static str,
        message: &'static str,
    ) -> Self {
        self.matching.push(Matching {
            field,
            other,
            message,
        });
        self
    }

    /// Names of the fields this schema covers, in declaration order.
    pub fn field_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|(name, _)| *name)
    }

    /// Validate the schema's fields of `form`.
    ///
    /// Fields outside the schema are not looked at.
    ///
    /// # Errors
    ///
    /// Returns every failing rule, in declaration order, followed by failing
    /// refinements.
    pub fn validate(&self, form: &FormState) -> Result<(), Vec<Issue>> {
        let mut issues: Vec<Issue> = self
            .fields
            .iter()
            .flat_map(|(field, rules)| {
                let field: &'static str = *field;
                let value = form.value(field);
                rules
                    .iter()
                    .filter(move |rule| !rule.check(value))
                    .map(move |rule| Issue {
                        field,
                        message: rule.message(),
                    })
            })
            .collect();

        issues.extend(
            self.matching
                .iter()
                .filter(|m| form.value(m.field) != form.value(m.other))
                .map(|m| Issue {
                    field: m.other,
                    message: m.message,
                }),
        );

        if issues.is_empty() {
            Ok(())
        } else {
            Err(issues)
        }
    }
}

/// Field name to the message displayed beneath it.
///
/// Built wholesale from a validation pass; only the first issue of each field
/// is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    /// An empty map.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Collapse issues, keeping the first message per field.
    #[must_use]
    pub fn from_issues(issues: &[Issue]) -> Self {
        let mut map = BTreeMap::new();
        for issue in issues {
            map.entry(issue.field.to_string())
                .or_insert_with(|| issue.message.to_string());
        }
        Self(map)
    }

    /// Attach a message to a field, replacing any existing one.
    pub fn insert(&mut self, field: &str, message: impl Into<String>) {
        self.0.insert(field.to_string(), message.into());
    }

    /// Message for a field, if any.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    /// Message for a field, or an empty string. Convenient in templates.
    #[must_use]
    pub fn message(&self, field: &str) -> &str {
        self.get(field).unwrap_or("")
    }

    /// Returns `true` if the field has a message.
    #[must_use]
    pub fn has(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Returns `true` if no field has a message.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Drop every message.
    pub fn clear(&mut self) {
        self.0.clear();
    }
}

impl From<Vec<Issue>> for FieldErrors {
    fn from(issues: Vec<Issue>) -> Self {
        Self::from_issues(&issues)
    }
}

/// Validate `form` against `schema` and collapse the result into an error map.
///
/// An empty map means the form is valid.
#[must_use]
pub fn check(schema: &Schema, form: &FormState) -> FieldErrors {
    schema
        .validate(form)
        .map_or_else(FieldErrors::from, |()| FieldErrors::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(pairs: &[(&str, &str)]) -> FormState {
        let names: Vec<&str> = pairs.iter().map(|(k, _)| *k).collect();
        let mut form = FormState::with_fields(&names);
        for (k, v) in pairs {
            form.set(k, *v);
        }
        form
    }

    #[test]
    fn test_all_failing_rules_are_reported_in_order() {
        let schema = Schema::new().field(
            "email",
            [
                Rule::required("Email is required"),
                Rule::email("Invalid email address"),
            ],
        );
        let issues = schema.validate(&form(&[("email", "")])).unwrap_err();
        let messages: Vec<_> = issues.iter().map(|i| i.message).collect();
        assert_eq!(messages, ["Email is required", "Invalid email address"]);
    }

    #[test]
    fn test_field_errors_keep_first_issue() {
        let issues = [
            Issue {
                field: "email",
                message: "first",
            },
            Issue {
                field: "email",
                message: "second",
            },
        ];
        let errors = FieldErrors::from_issues(&issues);
        assert_eq!(errors.message("email"), "first");
    }

    #[test]
    fn test_min_length_counts_characters() {
        let rule = Rule::min_length(2, "too short");
        assert!(rule.check("ãé"));
        assert!(!rule.check("ã"));
    }

    #[test]
    fn test_matching_reports_on_other_field() {
        let schema = Schema::new().matching("password", "confirmPassword", "Passwords don't match");
        let issues = schema
            .validate(&form(&[("password", "a"), ("confirmPassword", "b")]))
            .unwrap_err();
        assert_eq!(
            issues,
            [Issue {
                field: "confirmPassword",
                message: "Passwords don't match"
            }]
        );
    }

    #[test]
    fn test_fields_outside_schema_are_ignored() {
        let schema = Schema::new().field("otp", [Rule::min_length(4, "short")]);
        let f = form(&[("otp", "1234"), ("email", "")]);
        assert!(schema.validate(&f).is_ok());
    }

    #[test]
    fn test_check_returns_empty_map_when_valid() {
        let schema = Schema::new().field("name", [Rule::required("required")]);
        assert!(check(&schema, &form(&[("name", "x")])).is_empty());
        assert!(check(&schema, &form(&[("name", "")])).has("name"));
    }

    #[test]
    fn test_literal_rule() {
        let rule = Rule::literal("DELETE", "Type DELETE to confirm");
        assert!(rule.check("DELETE"));
        assert!(!rule.check("delete"));
    }
}
