use thiserror::Error;

use crate::repository::RepositoryError;

/// Generic error type used by service layer functions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ServiceError {
    /// The user is not authorized to perform the operation.
    #[error("unauthorized")]
    Unauthorized,
    /// Requested resource was not found.
    #[error("not found")]
    NotFound,
    /// Submitted form failed validation.
    #[error("{0}")]
    Form(String),
    /// A value could not be converted into a domain type.
    #[error("{0}")]
    TypeConstraint(String),
    /// A unique value is already taken.
    #[error("{0}")]
    Conflict(String),
    /// An unexpected internal error occurred.
    #[error("internal error")]
    Internal,
}

/// Convenient alias for results returned from service functions.
pub type ServiceResult<T> = Result<T, ServiceError>;

impl From<RepositoryError> for ServiceError {
    fn from(val: RepositoryError) -> Self {
        match val {
            RepositoryError::NotFound => ServiceError::NotFound,
            RepositoryError::Conflict(message) => ServiceError::Conflict(message),
            other => {
                log::error!("Repository failure: {other}");
                ServiceError::Internal
            }
        }
    }
}
