use thiserror::Error;

/// Raised when a caller breaks the input contract of a check-digit or generator function.
///
/// Malformed identifier data never produces this error; it is reported through the
/// per-identifier validation errors instead.
#[derive(Debug, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("Expected exactly {expected} digits, found {found} characters")]
    InvalidLength { expected: usize, found: usize },

    #[error("Only numeric digits [0-9] are allowed")]
    NonDigit,

    #[error("The first digit must be between {min} and {max}, found {found}")]
    LeadingDigitOutOfRange { min: u32, max: u32, found: u32 },

    #[error("Cannot generate an identifier of type '{0}'")]
    UnsupportedIdentifierType(&'static str),
}
