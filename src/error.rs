use thiserror::Error;

#[derive(Error, Debug)]
pub enum GalaxyError {
    #[error("Not in a galaxy project. Run 'galaxy init' first.")]
    NotInitialized,

    #[error("Already initialized. Remove .galaxy/ to reinitialize.")]
    AlreadyInitialized,

    #[error("Entity not found: {0}")]
    EntityNotFound(String),

    #[error("Invalid entity type: {0}")]
    InvalidEntityType(String),

    #[error("Validation failed for field '{field}': {message}")]
    Validation { field: String, message: String },

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl GalaxyError {
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        GalaxyError::Validation {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, GalaxyError>;
