use thiserror::Error;

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("Draft could not be encoded: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("Draft could not be written: {0}")]
    Io(#[from] std::io::Error),
    #[error("Published drafts could not be flushed: {0}")]
    Flush(String),
    #[error("[{failed}] of [{total}] drafts were not published")]
    Incomplete {
        failed: usize,
        total: usize
    }
}
