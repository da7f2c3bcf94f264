use std::fmt;

use diesel::result::DatabaseErrorKind;
use thiserror::Error;

/// Result type returned by repository operations.
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Name of the repository operation that failed and the post it targeted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperationContext {
    pub operation: &'static str,
    pub post_id: Option<i32>,
}

impl OperationContext {
    pub fn new(operation: &'static str) -> Self {
        Self {
            operation,
            post_id: None,
        }
    }

    pub fn post(operation: &'static str, post_id: i32) -> Self {
        Self {
            operation,
            post_id: Some(post_id),
        }
    }
}

impl fmt::Display for OperationContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.post_id {
            Some(post_id) => write!(f, "{}(post {})", self.operation, post_id),
            None => f.write_str(self.operation),
        }
    }
}

/// Failures surfaced by the post repository.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// No post row matches the requested id.
    #[error("post {0} not found")]
    NotFound(i32),
    /// A uniqueness, foreign-key, not-null or check constraint rejected the write.
    #[error("{context}: constraint violation: {message}")]
    ConstraintViolation {
        context: OperationContext,
        message: String,
    },
    /// The store could not be reached or no pooled connection became available.
    #[error("{context}: database unavailable: {message}")]
    Unavailable {
        context: OperationContext,
        message: String,
    },
    /// Any other error reported by the store.
    #[error("{context}: database error: {message}")]
    Database {
        context: OperationContext,
        message: String,
    },
}

impl RepositoryError {
    /// Classify a diesel error raised while running `context`.
    pub fn from_diesel(context: OperationContext, err: diesel::result::Error) -> Self {
        use diesel::result::Error;

        match err {
            Error::NotFound => Self::NotFound(context.post_id.unwrap_or_default()),
            Error::DatabaseError(kind, info) => {
                let message = info.message().to_string();
                match kind {
                    DatabaseErrorKind::UniqueViolation
                    | DatabaseErrorKind::ForeignKeyViolation
                    | DatabaseErrorKind::NotNullViolation
                    | DatabaseErrorKind::CheckViolation => {
                        Self::ConstraintViolation { context, message }
                    }
                    DatabaseErrorKind::ClosedConnection => Self::Unavailable { context, message },
                    _ => Self::Database { context, message },
                }
            }
            other => Self::Database {
                context,
                message: other.to_string(),
            },
        }
    }

    /// Classify a failure to check a connection out of the pool.
    pub fn from_pool(context: OperationContext, err: diesel::r2d2::PoolError) -> Self {
        Self::Unavailable {
            context,
            message: err.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
