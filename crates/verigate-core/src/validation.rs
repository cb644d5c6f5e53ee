//! Identity field validation
//!
//! The same format checks run on both sides of the gating protocol: the
//! client gate uses them for eligibility, the admission gate re-runs them
//! authoritatively. The email shape is intentionally simple; the backend
//! does not send mail to the submitter.

use regex::Regex;
use std::sync::LazyLock;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex compiles")
});

/// Simple `local@domain.tld` shape check on the trimmed input.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email.trim())
}

/// User IDs must be non-empty and all-digit.
pub fn is_valid_user_id(user_id: &str) -> bool {
    let trimmed = user_id.trim();
    !trimmed.is_empty() && trimmed.chars().all(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_addresses() {
        assert!(is_valid_email("ada@example.com"));
        assert!(is_valid_email("  ada.lovelace@dept.example.co  "));
    }

    #[test]
    fn rejects_malformed_addresses() {
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("ada"));
        assert!(!is_valid_email("ada@example"));
        assert!(!is_valid_email("ada @example.com"));
        assert!(!is_valid_email("@example.com"));
    }

    #[test]
    fn user_id_must_be_all_digits() {
        assert!(is_valid_user_id("0042"));
        assert!(is_valid_user_id(" 123 "));
        assert!(!is_valid_user_id(""));
        assert!(!is_valid_user_id("12a4"));
        assert!(!is_valid_user_id("12 34"));
        assert!(!is_valid_user_id("-12"));
    }
}
