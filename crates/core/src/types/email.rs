//! Email address shape check.

use std::sync::LazyLock;

use regex::Regex;

/// Shape accepted for addresses: a local part without leading or doubled dots,
/// an `@`, and a dotted domain ending in an alphabetic TLD of 2+ characters.
static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_'+\-.]*[A-Za-z0-9_+\-]@([A-Za-z0-9][A-Za-z0-9\-]*\.)+[A-Za-z]{2,}$")
        .expect("Invalid regex")
});

/// Maximum length of an email address (RFC 5321).
pub const MAX_LENGTH: usize = 254;

/// Returns `true` if `s` has the shape of an email address.
///
/// This is the check behind the "Invalid email address" form rule.
///
/// ```
/// use verified_plate_core::types::email::is_well_formed;
///
/// assert!(is_well_formed("user.name+tag@domain.co.uk"));
/// assert!(!is_well_formed("user@localhost"));
/// ```
#[must_use]
pub fn is_well_formed(s: &str) -> bool {
    if s.len() > MAX_LENGTH || s.starts_with('.') || s.contains("..") {
        return false;
    }
    EMAIL_RE.is_match(s)
}
