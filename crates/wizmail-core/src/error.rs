//! Error types for the core library.

use thiserror::Error;

/// Errors that can occur in core operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Email not found.
    #[error("Email not found: {0}")]
    EmailNotFound(String),

    /// Category not found.
    #[error("Category not found: {0}")]
    CategoryNotFound(String),

    /// Template not found.
    #[error("Template not found: {0}")]
    TemplateNotFound(String),

    /// Task not found.
    #[error("Task not found: {0}")]
    TaskNotFound(i64),

    /// A user-authored record failed validation.
    #[error("Validation failed: {0}")]
    Validation(String),
}

impl Error {
    /// Build a validation error from a list of field messages.
    pub(crate) fn validation<T: std::fmt::Display>(errors: &[T]) -> Self {
        let joined = errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        Self::Validation(joined)
    }
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
