use std::io;

/// Errors that can occur during task-tree operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("State error: {0}")]
    StateError(String),

    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Node {key} is a {actual}, expected a {expected}")]
    NodeKindMismatch {
        key: String,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("{0}")]
    Other(String),
}

/// Result type alias for task-tree operations
pub type Result<T> = std::result::Result<T, Error>;
