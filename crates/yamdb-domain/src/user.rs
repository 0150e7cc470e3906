//! User domain types and identity validation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::validation::{FieldError, ValidationReason};

/// Maximum username length in characters.
pub const USERNAME_MAX_LEN: usize = 150;

/// Maximum email length in characters.
pub const EMAIL_MAX_LEN: usize = 254;

/// Maximum length of `first_name` / `last_name`.
pub const PERSONAL_NAME_MAX_LEN: usize = 150;

/// Username that collides with the `/users/me` route.
pub const RESERVED_USERNAME: &str = "me";

/// Stored trust level of an account.
///
/// Wire format: lowercase string (`"user"`, `"moderator"`, `"admin"`).
/// Anonymous callers have no role at all; see [`crate::policy::Subject`].
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Moderator,
    Admin,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Moderator => "moderator",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "moderator" => Ok(Self::Moderator),
            "admin" => Ok(Self::Admin),
            other => Err(UnknownRole(other.to_owned())),
        }
    }
}

/// Validate a username: non-empty, at most 150 chars, not `me`,
/// and only word characters plus `.`, `@`, `+`, `-`.
pub fn validate_username(username: &str) -> Result<(), FieldError> {
    let invalid = |reason| Err(FieldError::new("username", reason));
    if username == RESERVED_USERNAME {
        return invalid(ValidationReason::ReservedUsername);
    }
    if username.is_empty() {
        return invalid(ValidationReason::Required);
    }
    if username.chars().count() > USERNAME_MAX_LEN {
        return invalid(ValidationReason::Length);
    }
    let allowed = |c: char| c.is_alphanumeric() || matches!(c, '_' | '.' | '@' | '+' | '-');
    if !username.chars().all(allowed) {
        return invalid(ValidationReason::InvalidCharacters);
    }
    Ok(())
}

/// Validate an email address: at most 254 chars, exactly one `@` with a
/// non-empty local part and a dotted domain, no whitespace.
pub fn validate_email(email: &str) -> Result<(), FieldError> {
    let invalid = |reason| Err(FieldError::new("email", reason));
    if email.is_empty() {
        return invalid(ValidationReason::Required);
    }
    if email.chars().count() > EMAIL_MAX_LEN {
        return invalid(ValidationReason::Length);
    }
    if email.chars().any(char::is_whitespace) {
        return invalid(ValidationReason::InvalidEmail);
    }
    match email.split_once('@') {
        Some((local, domain))
            if !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.') =>
        {
            Ok(())
        }
        _ => invalid(ValidationReason::InvalidEmail),
    }
}
