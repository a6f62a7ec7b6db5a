use diesel::r2d2::PoolError;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use thiserror::Error;

use crate::domain::types::TypeConstraintError;

/// Errors surfaced by repository implementations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// No connection could be checked out of the pool.
    #[error("connection pool error: {0}")]
    ConnectionError(#[from] PoolError),
    /// The database rejected or failed a statement.
    #[error("database error: {0}")]
    DatabaseError(DieselError),
    /// A unique constraint was violated.
    #[error("conflict: {0}")]
    Conflict(String),
    /// A stored row could not be converted into a domain value.
    #[error("validation error: {0}")]
    ValidationError(String),
    #[error("not found")]
    NotFound,
}

/// Convenient alias for results returned from repository functions.
pub type RepositoryResult<T> = Result<T, RepositoryError>;

impl From<DieselError> for RepositoryError {
    fn from(error: DieselError) -> Self {
        match error {
            DieselError::NotFound => Self::NotFound,
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
                Self::Conflict(info.message().to_string())
            }
            other => Self::DatabaseError(other),
        }
    }
}

impl From<TypeConstraintError> for RepositoryError {
    fn from(val: TypeConstraintError) -> Self {
        RepositoryError::ValidationError(val.to_string())
    }
}
