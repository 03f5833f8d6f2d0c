//! Error taxonomy shared by every pipeline job.
//!
//! Each fallible operation returns a [`PipelineError`] tagged with one of
//! five kinds; callers match on the variant to decide between aborting the
//! invocation (fetch, list, storage) and skipping a single input (read,
//! line-level parse).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// Upstream HTTP failure: transport error or non-2xx status.
    #[error("upstream fetch failed: {0}")]
    Fetch(String),

    /// Upstream payload is not the expected JSON array.
    #[error("payload parse failed: {0}")]
    Parse(String),

    /// Object store get failed for a single child input.
    #[error("read failed for {key}: {message}")]
    Read { key: String, message: String },

    /// Object store list failed for a prefix.
    #[error("list failed under {prefix}: {message}")]
    List { prefix: String, message: String },

    /// Object store put failed.
    #[error("storage write failed for {key}: {message}")]
    Storage { key: String, message: String },
}

impl PipelineError {
    /// Stable taxonomy label used in structured log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            PipelineError::Fetch(_) => "FETCH_ERROR",
            PipelineError::Parse(_) => "PARSE_ERROR",
            PipelineError::Read { .. } => "READ_ERROR",
            PipelineError::List { .. } => "LIST_ERROR",
            PipelineError::Storage { .. } => "STORAGE_ERROR",
        }
    }
}
