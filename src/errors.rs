use thiserror::Error;

#[derive(Debug, Error)]
pub enum SummarizeError {
    #[error("sentence segmentation failed: {0}")]
    Segmentation(String),
    #[error("could not extract text from {path}: {reason}")]
    Extraction { path: String, reason: String },
    #[error("unsupported file format: {0}")]
    UnsupportedFormat(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure of a single generative backend call. Recovered by the
/// orchestrator, never returned to callers of the summarize entry points.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("backend unavailable: {0}")]
    Unavailable(String),
    #[error("http error: {0}")]
    Http(String),
    #[error("invalid backend response: {0}")]
    InvalidResponse(String),
}
