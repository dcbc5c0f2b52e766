//! Error types for the ORM.

use thiserror::Error;

/// ORM-specific errors.
#[derive(Debug, Error)]
pub enum OrmError {
    /// Database error from sqlx, passed through untouched.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A bulk write was attempted without any condition.
    #[error("missing where clause")]
    MissingWhereClause,

    /// A query parameter does not fit its operator or target.
    #[error("invalid query parameter: {0}")]
    InvalidParam(String),

    /// An operator tag outside the supported set.
    #[error("unsupported operator: {0}")]
    UnsupportedOperator(String),

    /// A preload name the model does not know how to load.
    #[error("unknown relation: {0}")]
    UnknownRelation(String),
}

impl OrmError {
    /// Returns whether this is the storage layer's "no rows" error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Database(sqlx::Error::RowNotFound))
    }
}

/// Result type alias for ORM operations.
pub type Result<T> = std::result::Result<T, OrmError>;
