use crate::forms::ValidationErrors;
use crate::model::EntityId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BookfyError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: EntityId },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The stored collection exists but cannot be decoded. Writes refuse to
    /// replace it so the damaged data stays on disk for inspection.
    #[error("Collection {key} is unreadable: {reason}")]
    CorruptCollection { key: String, reason: String },

    #[error("Store error: {0}")]
    Store(String),

    #[error("Invalid input:\n{0}")]
    Validation(#[from] ValidationErrors),

    #[error("Api Error: {0}")]
    Api(String),
}

impl BookfyError {
    pub fn not_found(kind: &'static str, id: EntityId) -> Self {
        BookfyError::NotFound { kind, id }
    }
}

pub type Result<T> = std::result::Result<T, BookfyError>;
