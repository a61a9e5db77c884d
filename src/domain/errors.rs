//! Domain errors for the chatrag retrieval core.

use thiserror::Error;

/// Domain-level errors that can occur in the retrieval core.
#[derive(Debug, Error)]
pub enum DomainError {
    /// Embedding or LLM backend unreachable, rejected the call, or returned a
    /// payload that could not be interpreted. Never retried by the core.
    #[error("Provider error: {0}")]
    Provider(String),

    /// Caller passed arguments that violate an operation's contract.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// A stored record could not be decoded. Scans skip these; the variant
    /// exists so the reason can be carried to the log line.
    #[error("Malformed record {id}: {reason}")]
    MalformedRecord { id: String, reason: String },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

pub type DomainResult<T> = Result<T, DomainError>;

impl DomainError {
    /// Whether the error came from an embedding/LLM backend.
    pub fn is_provider(&self) -> bool {
        matches!(self, DomainError::Provider(_))
    }
}

impl From<sqlx::Error> for DomainError {
    fn from(err: sqlx::Error) -> Self {
        DomainError::Database(err.to_string())
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        DomainError::Serialization(err.to_string())
    }
}
