use thiserror::Error;

use crate::types::PriceError;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Record title is empty")]
    EmptyTitle,
    #[error("Product name [{name}] is too short")]
    NameTooShort {
        name: String
    },
    #[error("Product name [{name}] contains blocked keyword [{keyword}]")]
    BlockedKeyword {
        name: String,
        keyword: String
    },
    #[error("Product name [{name}] contains no recognised domain keyword")]
    MissingDomainKeyword {
        name: String
    },
    #[error("Price [{price}] is outside the accepted range [{min}..={max}]")]
    PriceOutOfRange {
        price: u32,
        min: u32,
        max: u32
    },
    #[error("Invalid price: {0}")]
    InvalidPrice(#[from] PriceError)
}

impl ValidationError {
    pub fn name_too_short(name: &str) -> Self {
        Self::NameTooShort { name: name.to_string() }
    }

    pub fn blocked_keyword(name: &str, keyword: &str) -> Self {
        Self::BlockedKeyword {
            name: name.to_string(),
            keyword: keyword.to_string()
        }
    }

    pub fn missing_domain_keyword(name: &str) -> Self {
        Self::MissingDomainKeyword { name: name.to_string() }
    }

    pub fn price_out_of_range(price: u32, min: u32, max: u32) -> Self {
        Self::PriceOutOfRange { price, min, max }
    }
}
