//! Pure predicates backing entity validation.
//!
//! The entity constructors in [`crate::model`] call these, but they are
//! public so that input forms can check values before building anything.

use std::sync::OnceLock;

use regex::Regex;

use crate::constants::{
    MIN_USERNAME_EXCLUSIVE, PASSWORD_HASH_LENGTH, SALT_LENGTH, SUPPORTED_PHOTO_FORMATS,
};

pub use crate::identifiers::is_id;

pub fn is_username(text: &str) -> bool {
    text.chars().count() > MIN_USERNAME_EXCLUSIVE
}

/// Permissive address check: dotted/dashed local part, `@`, a domain label
/// and at least one alphabetic top-level suffix.
pub fn is_email(text: &str) -> bool {
    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^([A-Za-z0-9]+[._-])*[A-Za-z0-9]+@[A-Za-z0-9-]+(\.[A-Za-z]{2,})+$")
            .expect("Failed to compile email regex")
    });

    regex.is_match(text)
}

/// `<name>.<ext>`, both parts non-empty.
pub fn is_filename(text: &str) -> bool {
    static FILENAME_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = FILENAME_REGEX
        .get_or_init(|| Regex::new(r"^.+\..+$").expect("Failed to compile filename regex"));

    regex.is_match(text)
}

fn is_lower_hex_digit(c: char) -> bool {
    matches!(c, '0'..='9' | 'a'..='f')
}

/// Every character is a lowercase hex digit. The empty string passes.
pub fn is_hex(text: &str) -> bool {
    text.chars().all(is_lower_hex_digit)
}

/// A hex-encoded SHA-256 digest.
pub fn is_hash(text: &str) -> bool {
    text.len() == PASSWORD_HASH_LENGTH && is_hex(text)
}

pub fn is_salt(text: &str) -> bool {
    text.len() == SALT_LENGTH && text.chars().all(|c| c.is_ascii_alphabetic())
}

pub fn is_supported_format(format: &str) -> bool {
    SUPPORTED_PHOTO_FORMATS.contains(&format)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_length() {
        assert!(is_username("user 1"));
        assert!(is_username("abcd"));
        assert!(!is_username("abc"));
        assert!(!is_username(""));
        // four characters, more than four bytes
        assert!(is_username("żółw"));
        assert!(!is_username("żół"));
    }

    #[test]
    fn test_email_accepts() {
        for email in [
            "email@example.com",
            "a@example.com",
            "first.last@mail.example.org",
            "first-last_99@my-domain.co.uk",
        ] {
            assert!(is_email(email), "{email} should be accepted");
        }
    }

    #[test]
    fn test_email_rejects() {
        for email in [
            "",
            "example.com",
            "@example.com",
            "user@",
            "user@example",
            "user@example.c",
            "user@@example.com",
            ".user@example.com",
            "user.@example.com",
            "us er@example.com",
        ] {
            assert!(!is_email(email), "{email} should be rejected");
        }
    }

    #[test]
    fn test_filename() {
        assert!(is_filename("photo.jpg"));
        assert!(is_filename("my.holiday.png"));
        assert!(!is_filename("photo"));
        assert!(!is_filename(".jpg"));
        assert!(!is_filename("photo."));
    }

    #[test]
    fn test_hex() {
        assert!(is_hex("0123456789abcdef"));
        assert!(is_hex(""));
        assert!(!is_hex("ABCDEF"));
        assert!(!is_hex("12g4"));
        assert!(!is_hex("de ad"));
    }

    #[test]
    fn test_hash() {
        assert!(is_hash(
            "fb99705459b651e7c37b0da74a53a23fe1920b91a0553eaacd9098a3fe4025cd"
        ));
        assert!(!is_hash(
            "DD130A849D7B29E5541B05D2F7F86A4ACD4F1EC598C1C9438783F56BC4F0FF80"
        ));
        assert!(!is_hash("fb99705459b651e7"));
        assert!(!is_hash(&"a".repeat(65)));
    }

    #[test]
    fn test_salt() {
        assert!(is_salt("aaaaaaaaaa"));
        assert!(is_salt("QWERTYuiop"));
        assert!(!is_salt("abc"));
        assert!(!is_salt("saltsaltsalt"));
        assert!(!is_salt("aaaaa11111"));
        assert!(!is_salt("ąaaaaaaaa"));
    }

    #[test]
    fn test_supported_format() {
        assert!(is_supported_format("jpg"));
        assert!(is_supported_format("png"));
        assert!(!is_supported_format("gif"));
        assert!(!is_supported_format("JPG"));
    }
}
