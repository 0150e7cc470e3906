//! Catalog name/slug validation shared by categories and genres.

use crate::validation::{FieldError, ValidationReason, check_text};

/// Maximum slug length.
pub const SLUG_MAX_LEN: usize = 50;

/// Maximum catalog name length (categories, genres, titles).
pub const NAME_MAX_LEN: usize = 256;

/// Validate a slug: 1-50 chars from `[-a-zA-Z0-9_]`.
pub fn validate_slug(slug: &str) -> Result<(), FieldError> {
    if slug.is_empty() {
        return Err(FieldError::new("slug", ValidationReason::Required));
    }
    if slug.len() > SLUG_MAX_LEN {
        return Err(FieldError::new("slug", ValidationReason::Length));
    }
    if !slug
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(FieldError::new("slug", ValidationReason::InvalidSlug));
    }
    Ok(())
}

/// Validate a catalog display name.
pub fn validate_name(name: &str) -> Result<(), FieldError> {
    check_text("name", name, NAME_MAX_LEN)
}
