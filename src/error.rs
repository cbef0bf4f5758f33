//! Error types for statement synthesis.

use thiserror::Error;

/// Result type alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// A referenced table or sequence does not exist.
    #[error("Table not found: {0}")]
    NotFound(String),

    /// The operation was requested on an entity that cannot support it.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A statement skeleton could not be parsed.
    #[error("Malformed template: {0}")]
    Template(String),

    /// The catalog collaborator failed.
    #[error("Catalog error: {0}")]
    Catalog(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Wrap an error raised by a [`crate::Catalog`] implementation.
    pub fn catalog<E>(error: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Self::Catalog(error.into())
    }
}
