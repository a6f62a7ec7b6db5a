//! Error conversion glue between forms, domain types and services.
//!
//! Forms and the domain layer must not depend on service error types, so the
//! conversions live here and are only compiled with the `server` feature.

use crate::domain::types::TypeConstraintError;
use crate::forms::comments::CommentFormError;
use crate::forms::posts::PostFormError;
use crate::forms::users::UserFormError;
use crate::services::ServiceError;

impl From<TypeConstraintError> for ServiceError {
    fn from(val: TypeConstraintError) -> Self {
        ServiceError::TypeConstraint(val.to_string())
    }
}

impl From<PostFormError> for ServiceError {
    fn from(val: PostFormError) -> Self {
        ServiceError::Form(val.to_string())
    }
}

impl From<CommentFormError> for ServiceError {
    fn from(val: CommentFormError) -> Self {
        ServiceError::Form(val.to_string())
    }
}

impl From<UserFormError> for ServiceError {
    fn from(val: UserFormError) -> Self {
        ServiceError::Form(val.to_string())
    }
}
