pub mod catalog;
pub mod comment;
pub mod review;
pub mod signup;
pub mod title;
pub mod token;
pub mod user;

use yamdb_domain::policy::{Action, Resource, Subject, allowed};

use crate::error::ApiError;

/// Gate an operation on the authorization engine. Anonymous callers get
/// `Unauthorized`, authenticated ones `Forbidden`.
pub fn authorize(subject: &Subject, action: Action, resource: &Resource) -> Result<(), ApiError> {
    if allowed(subject, action, resource) {
        Ok(())
    } else if subject.is_authenticated() {
        Err(ApiError::Forbidden)
    } else {
        Err(ApiError::Unauthorized)
    }
}

/// Mutations of existing content are never open to anonymous callers; reject
/// them before the lookup that the ownership check needs.
pub fn require_caller(subject: &Subject) -> Result<(), ApiError> {
    if subject.is_authenticated() {
        Ok(())
    } else {
        Err(ApiError::Unauthorized)
    }
}
