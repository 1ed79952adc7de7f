use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum FasalError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("failed to load crop catalog from {path}: {reason}")]
    CatalogLoad { path: PathBuf, reason: String },

    #[error("invalid crop catalog: {0}")]
    CatalogInvalid(String),

    #[error("remote service unavailable: {0}")]
    RemoteUnavailable(String),

    #[error("record store failure: {0}")]
    Persistence(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl FasalError {
    /// True for failures the caller may retry by resubmitting.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            FasalError::RemoteUnavailable(_) | FasalError::Persistence(_)
        )
    }
}
