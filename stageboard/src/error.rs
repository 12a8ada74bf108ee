//! Error types for the board engine

use thiserror::Error;

/// Result type for board operations
pub type Result<T> = std::result::Result<T, BoardError>;

/// Errors that can occur in board operations
#[derive(Debug, Error)]
pub enum BoardError {
    /// Stage not found
    #[error("stage not found: {id}")]
    StageNotFound { id: String },

    /// Task not found
    #[error("task not found: {id}")]
    TaskNotFound { id: String },

    /// The default stage is where orphaned tasks go; it cannot be removed
    #[error("stage '{id}' is the default stage and cannot be deleted")]
    DefaultStage { id: String },

    /// Deleting a stage needs a default stage to take its tasks
    #[error("project {project} has no default stage to take the tasks of stage '{id}'")]
    NoDefaultStage { project: String, id: String },

    /// Drag-library item identifier could not be decoded
    #[error("invalid item reference '{raw}': {message}")]
    InvalidItemRef { raw: String, message: String },

    /// Missing required field
    #[error("missing required field: {field}")]
    MissingField { field: String },

    /// Invalid field value
    #[error("invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    /// The remote store rejected or failed a call
    #[error("remote {operation} failed: {message}")]
    Remote { operation: String, message: String },

    /// Configuration could not be loaded
    #[error("configuration error: {0}")]
    Config(#[from] Box<figment::Error>),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl BoardError {
    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    /// Create an invalid value error
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an invalid item reference error
    pub fn invalid_item_ref(raw: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidItemRef {
            raw: raw.into(),
            message: message.into(),
        }
    }

    /// Create a remote call failure
    pub fn remote(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Remote {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Check if this is a retryable error
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Remote { .. })
    }
}

impl From<figment::Error> for BoardError {
    fn from(error: figment::Error) -> Self {
        Self::Config(Box::new(error))
    }
}
