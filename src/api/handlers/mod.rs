//! API handlers and shared validation helpers.
//!
//! Route handlers for the auth and image surfaces live here, together with
//! the input validation used before anything touches the database.

pub mod auth;
pub mod health;
pub mod images;
pub mod root;

use regex::Regex;

/// Lightweight email sanity check used by auth handlers before persisting data.
#[must_use]
pub fn valid_email(email: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").is_ok_and(|re| re.is_match(email))
}

/// Password policy: 8 to 32 chars with at least one uppercase letter, one
/// lowercase letter, one digit, and one non-alphanumeric character.
#[must_use]
pub fn valid_password(password: &str) -> bool {
    let length = password.chars().count();
    if !(8..=32).contains(&length) {
        return false;
    }
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_special = password.chars().any(|c| !c.is_alphanumeric());
    has_upper && has_lower && has_digit && has_special
}

/// Emails are compared and stored lowercased and trimmed.
#[must_use]
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_email_accepts_simple() {
        assert!(valid_email("user@example.com"));
    }

    #[test]
    fn valid_email_rejects_missing_at() {
        assert!(!valid_email("user.example.com"));
    }

    #[test]
    fn valid_email_rejects_whitespace() {
        assert!(!valid_email("user name@example.com"));
    }

    #[test]
    fn valid_password_accepts_mixed() {
        assert!(valid_password("Sup3r-secret"));
    }

    #[test]
    fn valid_password_rejects_short() {
        assert!(!valid_password("S3c-r!"));
    }

    #[test]
    fn valid_password_rejects_too_long() {
        let password = format!("Aa1!{}", "x".repeat(32));
        assert!(!valid_password(&password));
    }

    #[test]
    fn valid_password_requires_each_class() {
        assert!(!valid_password("alllowercase1!"));
        assert!(!valid_password("ALLUPPERCASE1!"));
        assert!(!valid_password("NoDigitsHere!"));
        assert!(!valid_password("NoSpecials123"));
    }

    #[test]
    fn normalize_email_lowercases_and_trims() {
        assert_eq!(normalize_email("  User@Example.COM "), "user@example.com");
    }
}
