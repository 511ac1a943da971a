//! Error types for pgdsl-query

use thiserror::Error;

/// Result type alias for builder operations.
pub type DslResult<T> = Result<T, DslError>;

/// Errors raised while building or decoding statements.
///
/// Builders never fail eagerly: invalid input is remembered and surfaced by
/// [`SqlQb::validate`](crate::SqlQb::validate).
#[derive(Debug, Error)]
pub enum DslError {
    /// Statement shape is invalid (mismatched INSERT rows, assignment to an expression, ...)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Identifier could not be parsed
    #[error("Invalid identifier: {0}")]
    InvalidIdent(String),

    /// Row decode error when materialising a record set
    #[error("Decode error on column '{column}': {message}")]
    Decode { column: String, message: String },
}

impl DslError {
    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create an identifier error
    pub fn invalid_ident(message: impl Into<String>) -> Self {
        Self::InvalidIdent(message.into())
    }

    /// Create a decode error for a specific column
    pub fn decode(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}
