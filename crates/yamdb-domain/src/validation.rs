//! Machine-readable reasons attached to validation failures.

use std::fmt;

/// Why a single input field was rejected.
///
/// Every variant is user-correctable. The `code()` string is part of the
/// public error body and must stay stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationReason {
    /// Username is the reserved value `me`.
    ReservedUsername,
    /// Username contains characters outside `[\w.@+-]`.
    InvalidCharacters,
    /// Value is empty or longer than the field allows.
    Length,
    /// Username or email already belongs to a different account, or a slug is taken.
    Conflict,
    /// Confirmation code does not match the outstanding challenge.
    BadCode,
    /// Review score outside `1..=10`.
    ScoreRange,
    /// Required field missing or blank.
    Required,
    /// Email is not of the form `local@domain`.
    InvalidEmail,
    /// Slug contains characters outside `[-a-zA-Z0-9_]`.
    InvalidSlug,
    /// Referenced category or genre slug does not exist.
    UnknownSlug,
    /// Release year lies in the future.
    InvalidYear,
}

impl ValidationReason {
    pub fn code(self) -> &'static str {
        match self {
            Self::ReservedUsername => "reserved_username",
            Self::InvalidCharacters => "invalid_characters",
            Self::Length => "length",
            Self::Conflict => "conflict",
            Self::BadCode => "bad_code",
            Self::ScoreRange => "score_range",
            Self::Required => "required",
            Self::InvalidEmail => "invalid_email",
            Self::InvalidSlug => "invalid_slug",
            Self::UnknownSlug => "unknown_slug",
            Self::InvalidYear => "invalid_year",
        }
    }
}

impl fmt::Display for ValidationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A rejected field together with the reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid {field}: {reason}")]
pub struct FieldError {
    pub field: &'static str,
    pub reason: ValidationReason,
}

impl FieldError {
    pub fn new(field: &'static str, reason: ValidationReason) -> Self {
        Self { field, reason }
    }
}

/// Reject empty or whitespace-only values.
pub fn check_required(field: &'static str, value: &str) -> Result<(), FieldError> {
    if value.trim().is_empty() {
        return Err(FieldError::new(field, ValidationReason::Required));
    }
    Ok(())
}

/// Check that `value` is non-blank and at most `max` characters long.
pub fn check_text(field: &'static str, value: &str, max: usize) -> Result<(), FieldError> {
    check_required(field, value)?;
    if value.chars().count() > max {
        return Err(FieldError::new(field, ValidationReason::Length));
    }
    Ok(())
}
