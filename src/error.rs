use thiserror::Error;
use tokio::sync::AcquireError;
use tokio::task::JoinError;

#[derive(Debug, Clone, Error)]
pub enum ThumbnailError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("semaphore acquire error: {0}")]
    SemaphoreError(String),

    #[error("render job failed: {0}")]
    TaskError(String),

    #[error("configuration error: {0}")]
    ConfigurationError(String),
}

impl From<std::io::Error> for ThumbnailError {
    fn from(err: std::io::Error) -> Self {
        ThumbnailError::IoError(err.to_string())
    }
}

impl From<AcquireError> for ThumbnailError {
    fn from(err: AcquireError) -> Self {
        ThumbnailError::SemaphoreError(err.to_string())
    }
}

impl From<JoinError> for ThumbnailError {
    fn from(err: JoinError) -> Self {
        ThumbnailError::TaskError(err.to_string())
    }
}
