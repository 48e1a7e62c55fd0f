use thiserror::Error;

#[derive(Debug, Error)]
pub enum FallbackError {
    #[error("Fallback delegate failed: {0}")]
    Delegate(String),
    #[error("Fallback reply contains no JSON array")]
    MissingArray,
    #[error("Fallback reply is not valid JSON: {0}")]
    Json(#[from] serde_json::Error)
}

impl FallbackError {
    pub fn delegate(reason: impl Into<String>) -> Self {
        Self::Delegate(reason.into())
    }
}
