//! Error types for jobly

use crate::changeset::ValidationErrors;
use thiserror::Error;
use tokio_postgres::error::SqlState;

/// Result type alias for model and builder operations
pub type ModelResult<T> = Result<T, ModelError>;

/// Error types for model operations.
///
/// `BadRequest` and `NotFound` are caused by the caller; everything else is an
/// infrastructure failure and is passed through as-is.
#[derive(Debug, Error)]
pub enum ModelError {
    /// Input rejected before any statement was issued
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The targeted row does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Query execution error, including constraint violations
    #[error("Query error: {0}")]
    Query(#[from] tokio_postgres::Error),

    /// Row decode/mapping error
    #[error("Decode error on column '{column}': {message}")]
    Decode { column: String, message: String },

    /// Builder misuse (bad identifier, placeholder/param mismatch)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Database configuration or connection error
    #[error("Connection error: {0}")]
    Connection(String),

    /// Pool error
    #[cfg(feature = "pool")]
    #[error("Pool error: {0}")]
    Pool(String),
}

impl ModelError {
    /// Create a bad request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Create a decode error for a specific column
    pub fn decode(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Check if this is a bad request error
    pub fn is_bad_request(&self) -> bool {
        matches!(self, Self::BadRequest(_))
    }

    /// Check if this is a not found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Check if the store rejected the statement with a foreign key violation
    pub fn is_foreign_key_violation(&self) -> bool {
        self.sql_state() == Some(&SqlState::FOREIGN_KEY_VIOLATION)
    }

    /// Check if the store rejected the statement with a unique violation
    pub fn is_unique_violation(&self) -> bool {
        self.sql_state() == Some(&SqlState::UNIQUE_VIOLATION)
    }

    /// Check if the store rejected the statement with a check constraint violation
    pub fn is_check_violation(&self) -> bool {
        self.sql_state() == Some(&SqlState::CHECK_VIOLATION)
    }

    /// The SQLSTATE reported by the server, if this is a database error.
    pub fn sql_state(&self) -> Option<&SqlState> {
        match self {
            Self::Query(err) => err.code(),
            _ => None,
        }
    }

    /// HTTP status class for the route layer.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::BadRequest(_) => 400,
            Self::NotFound(_) => 404,
            _ => 500,
        }
    }
}

impl From<ValidationErrors> for ModelError {
    fn from(errs: ValidationErrors) -> Self {
        let message = errs
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect::<Vec<_>>()
            .join("; ");
        Self::BadRequest(message)
    }
}

#[cfg(feature = "pool")]
impl From<deadpool_postgres::PoolError> for ModelError {
    fn from(err: deadpool_postgres::PoolError) -> Self {
        Self::Pool(err.to_string())
    }
}
