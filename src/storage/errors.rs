use thiserror::Error;

/// Errors emitted by a persistent store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("store file is not a JSON object")]
    NotAnObject,
    #[error("store lock poisoned")]
    Poisoned,
}
