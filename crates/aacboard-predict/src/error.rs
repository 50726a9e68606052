/// Predictive engine error types
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while persisting the prediction store
#[derive(Debug, Error)]
pub enum PredictError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Failed to persist store to {}: {source}", path.display())]
    PersistError {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Result type for predictive engine operations
pub type PredictResult<T> = std::result::Result<T, PredictError>;
