//! Generation and format checks for entity identifiers.

use std::sync::OnceLock;

use regex::Regex;
use uuid::Uuid;

/// Generate a new time-ordered identifier in canonical uuid form.
pub fn generate_id() -> String {
    Uuid::now_v7().hyphenated().to_string()
}

/// Whether `candidate` is an 8-4-4-4-12 group of lowercase hex digits.
pub fn is_id(candidate: &str) -> bool {
    static ID_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = ID_REGEX.get_or_init(|| {
        Regex::new(r"^[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}$")
            .expect("Failed to compile id regex")
    });

    regex.is_match(candidate)
}
