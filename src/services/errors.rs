use thiserror::Error;

use crate::repository::RepositoryError;

/// Result type returned by service functions.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Failures reported to the HTTP layer.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("resource not found")]
    NotFound,
    /// The submitted payload was rejected.
    #[error("invalid input: {0}")]
    Form(String),
    #[error(transparent)]
    Internal(RepositoryError),
}

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(_) => ServiceError::NotFound,
            other => ServiceError::Internal(other),
        }
    }
}
