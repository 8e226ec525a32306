//! Shape checks for contact details.

use once_cell::sync::Lazy;
use regex::Regex;

#[allow(clippy::expect_used, reason = "pattern is a compile-time constant")]
static EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

#[allow(clippy::expect_used, reason = "pattern is a compile-time constant")]
static PHONE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[1-9]\d{0,15}$").expect("phone pattern compiles"));

/// `local@domain.tld`: no whitespace, exactly one `@`, and a dot in the domain.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL.is_match(email)
}

/// Optional leading `+`, then 1 to 16 digits not starting with zero.
/// Whitespace anywhere in the input is ignored.
pub fn is_valid_phone(phone: &str) -> bool {
    let compact: String = phone.chars().filter(|ch| !ch.is_whitespace()).collect();
    PHONE.is_match(&compact)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_shapes() {
        for good in ["ana@example.com", "a.b+c@sub.domain.es", "x@y.z"] {
            assert!(is_valid_email(good), "{good} should pass");
        }
        for bad in [
            "",
            "ana",
            "ana@example",
            "@example.com",
            "ana@.com",
            "ana @example.com",
            "ana@exa@mple.com",
            "ana@example.",
        ] {
            assert!(!is_valid_email(bad), "{bad} should fail");
        }
    }

    #[test]
    fn phone_shapes() {
        assert!(is_valid_phone("+34 600 123 456"));
        assert!(is_valid_phone("5"));
        assert!(is_valid_phone("1234567890123456"));
        assert!(!is_valid_phone("12345678901234567"));
        assert!(!is_valid_phone("0123"));
        assert!(!is_valid_phone("+"));
        assert!(!is_valid_phone("600-123-456"));
        assert!(!is_valid_phone(""));
    }
}
