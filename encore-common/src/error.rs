//! Common error types for Encore

use thiserror::Error;

/// Common result type for Encore operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the Encore crates
///
/// Persistence failures are classified here, at the storage boundary, so
/// callers branch on explicit variants: a unique-constraint violation on
/// `facebook_link` becomes [`Error::DuplicateLink`], a missing row becomes
/// [`Error::NotFound`], and everything else stays a generic
/// [`Error::Database`].
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (any sqlx failure not classified below)
    #[error("Database error: {0}")]
    Database(String),

    /// Unique constraint violation (duplicate facebook_link)
    #[error("Duplicate link: {0}")]
    DuplicateLink(String),

    /// Requested resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sqlx::Error> for Error {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::RowNotFound => Error::NotFound("row not found".to_string()),
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                Error::DuplicateLink(db.message().to_string())
            }
            other => Error::Database(other.to_string()),
        }
    }
}

impl Error {
    /// True when this error should surface as the specific
    /// "another record uses this facebook link" user message.
    pub fn is_duplicate_link(&self) -> bool {
        matches!(self, Error::DuplicateLink(_))
    }

    /// True when this error should surface as a 404-equivalent.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }
}
