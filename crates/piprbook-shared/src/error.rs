use thiserror::Error;

/// A value rejected while constructing or mutating an entity.
///
/// Every variant names the rule that failed; identifier failures also name
/// the offending field so callers can point at the right input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("{field}: {value} is not a uuid")]
    IncorrectIdentifier { field: &'static str, value: String },

    #[error("Username must be longer than 3 characters, got {0:?}")]
    IncorrectUsername(String),

    #[error("{0} is not a valid email address")]
    IncorrectEmail(String),

    #[error("{0} is not a valid hash")]
    IncorrectPasswordHash(String),

    #[error("{0} is not a valid salt")]
    IncorrectSalt(String),

    #[error("Message text cannot be empty")]
    IncorrectMessageText,

    #[error("{0} is not a correct filename")]
    IncorrectFilename(String),

    #[error("{0} is not supported")]
    UnsupportedFileFormat(String),

    #[error("Hex representation must be a string consisting of digits 0-9 and letters a-f")]
    IncorrectHexRepresentation,

    #[error("to_user and from_user cannot be the same ({0})")]
    SelfReference(String),
}

impl ModelError {
    pub(crate) fn identifier(field: &'static str, value: &str) -> Self {
        Self::IncorrectIdentifier {
            field,
            value: value.to_string(),
        }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ModelError>;
