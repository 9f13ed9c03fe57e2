//! Flat form state.
//!
//! Every form screen keeps a single record of field name to current value.
//! Multi-step wizards keep all of their steps' fields in one record so that
//! moving back and forth never loses what the visitor typed.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Field name to current string value.
///
/// Only fields declared when the state is created are tracked; submitted
/// values for unknown names are ignored by [`FormState::merge`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormState(BTreeMap<String, String>);

impl FormState {
    /// Create a state with every field present and empty.
    #[must_use]
    pub fn with_fields(fields: &[&str]) -> Self {
        Self(
            fields
                .iter()
                .map(|name| ((*name).to_string(), String::new()))
                .collect(),
        )
    }

    /// Current value of a field; empty for unknown fields.
    #[must_use]
    pub fn value(&self, field: &str) -> &str {
        self.0.get(field).map_or("", String::as_str)
    }

    /// Set a declared field. Returns `false` if the field is unknown.
    pub fn set(&mut self, field: &str, value: impl Into<String>) -> bool {
        match self.0.get_mut(field) {
            Some(slot) => {
                *slot = value.into();
                true
            }
            None => false,
        }
    }

    /// Apply submitted values to the declared fields.
    ///
    /// Fields missing from `submitted` keep their previous value, which is how
    /// one wizard step's submission leaves the other steps' values alone.
    pub fn merge<'a, I>(&mut self, submitted: I)
    where
        I: IntoIterator<Item = (&'a String, &'a String)>,
    {
        for (name, value) in submitted {
            self.set(name, value.clone());
        }
    }

    /// Reset a field to empty.
    pub fn clear(&mut self, field: &str) {
        self.set(field, String::new());
    }

    /// Returns `true` if the field is declared.
    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Iterate over `(field, value)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_fields_starts_empty() {
        let form = FormState::with_fields(&["email", "password"]);
        assert_eq!(form.value("email"), "");
        assert!(form.contains("password"));
        assert!(!form.contains("otp"));
    }

    #[test]
    fn test_merge_ignores_unknown_and_keeps_missing() {
        let mut form = FormState::with_fields(&["email", "otp"]);
        form.set("otp", "1234");

        let submitted: BTreeMap<String, String> = [
            ("email".to_string(), "a@b.co".to_string()),
            ("admin".to_string(), "true".to_string()),
        ]
        .into_iter()
        .collect();
        form.merge(&submitted);

        assert_eq!(form.value("email"), "a@b.co");
        assert_eq!(form.value("otp"), "1234");
        assert!(!form.contains("admin"));
    }

    #[test]
    fn test_set_unknown_field_is_rejected() {
        let mut form = FormState::with_fields(&["email"]);
        assert!(!form.set("nope", "x"));
        assert_eq!(form.value("nope"), "");
    }
}
