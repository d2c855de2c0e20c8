//! Error types for crm-joins.
//!
//! Store failures are carried as the engine's own `sqlx::Error`, untouched.
//! Everything else is a message-bearing variant with a display category.

use thiserror::Error;

/// Main error type for crm-joins operations.
#[derive(Error, Debug)]
pub enum JoinsError {
    /// Errors raised by the relational store (bad SQL, unknown table, closed
    /// connection, read-only violation, missing file).
    #[error("Store error: {0}")]
    Store(#[from] sqlx::Error),

    /// Configuration errors (invalid config file, no store configured, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Lesson catalog errors (unknown step id).
    #[error("Lesson error: {0}")]
    Lesson(String),

    /// I/O errors outside the store (log file, output stream).
    #[error("I/O error: {0}")]
    Io(String),

    /// Internal application errors (unexpected states, bugs, etc.)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl JoinsError {
    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates a lesson error with the given message.
    pub fn lesson(msg: impl Into<String>) -> Self {
        Self::Lesson(msg.into())
    }

    /// Creates an I/O error with the given message.
    pub fn io(msg: impl Into<String>) -> Self {
        Self::Io(msg.into())
    }

    /// Creates an internal error with the given message.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Returns true if the error came from the relational store.
    pub fn is_store(&self) -> bool {
        matches!(self, Self::Store(_))
    }

    /// Returns the error category as a string for display purposes.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Store(_) => "Store Error",
            Self::Config(_) => "Configuration Error",
            Self::Lesson(_) => "Lesson Error",
            Self::Io(_) => "I/O Error",
            Self::Internal(_) => "Internal Error",
        }
    }
}

/// Result type alias using JoinsError.
pub type Result<T> = std::result::Result<T, JoinsError>;
