//! Error types for RoleGuard Core

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RoleGuardError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Watch error: {0}")]
    Watch(String),
}

impl From<notify::Error> for RoleGuardError {
    fn from(err: notify::Error) -> Self {
        RoleGuardError::Watch(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, RoleGuardError>;
