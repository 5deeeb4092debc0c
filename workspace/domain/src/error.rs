use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

/// Error types for the domain layer
#[derive(Error, Debug)]
pub enum DomainError {
    /// Malformed or conflicting input. The message is meant for the caller.
    #[error("{0}")]
    Validation(String),

    /// Bad or missing credentials. Messages never reveal whether an account exists.
    #[error("{0}")]
    Authorization(String),

    /// The requester may not act on the target record
    #[error("You do not have permission to perform this action.")]
    PermissionDenied,

    /// A referenced record does not exist
    #[error("{entity} with ID {id} not found")]
    NotFound { entity: &'static str, id: i32 },

    /// The password hasher rejected its input or parameters
    #[error("Password hashing failed: {0}")]
    PasswordHash(String),

    /// Error from the database operations
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl DomainError {
    pub fn validation(message: impl Into<String>) -> Self {
        DomainError::Validation(message.into())
    }

    pub fn not_found(entity: &'static str, id: i32) -> Self {
        DomainError::NotFound { entity, id }
    }
}

/// True when the database rejected a write because of a unique index.
pub(crate) fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

/// Type alias for Result with DomainError
pub type Result<T> = std::result::Result<T, DomainError>;
