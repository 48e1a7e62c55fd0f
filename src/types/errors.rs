use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PriceError {
    #[error("Price error: {0}")]
    InvalidFormat(String),
    #[error("Price error: value must be positive")]
    NotPositive,
    #[error("Price error: Overflow")]
    Overflow
}
