use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::extract::canonical::delivery_from_descriptor;
use crate::extract::errors::FallbackError;
use crate::models::{Category, Delivery, Direction, TradeRecord, ValidationError};
use crate::types::{Price, PriceError};

static RE_JSON_ARRAY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\[.*\]").unwrap()
});

/// Free-form extractor consulted when no grammar matched an accepted message.
///
/// Implementors only provide `complete`, the raw reply for a message; the
/// reply is expected to hold a JSON array of candidates somewhere in its body.
pub trait FallbackExtractor: Send + Sync {
    fn complete(&self, text: &str) -> Result<String, FallbackError>;

    fn extract(&self, text: &str) -> Result<Vec<FallbackCandidate>, FallbackError> {
        parse_reply(&self.complete(text)?)
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Keywords {
    List(Vec<String>),
    Joined(String)
}

impl Default for Keywords {
    fn default() -> Self {
        Keywords::List(Vec::new())
    }
}

impl Keywords {
    fn joined(&self) -> String {
        match self {
            Keywords::List(keywords) => keywords.iter()
                .map(|keyword| keyword.trim())
                .filter(|keyword| !keyword.is_empty())
                .collect::<Vec<_>>()
                .join(","),
            Keywords::Joined(keywords) => keywords.trim().to_string()
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct FallbackCandidate {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub price: Option<Value>,
    #[serde(default)]
    pub keywords: Keywords,
    /// Direction code, read by [`FallbackCandidate::direction`].
    #[serde(default)]
    pub trade_type: Option<Value>,
    #[serde(default)]
    pub description: String
}

impl FallbackCandidate {
    /// Integer, decimal and quoted prices are accepted and truncated. A missing price reads as zero.
    pub fn price(&self) -> Result<Price, PriceError> {
        let raw = match &self.price {
            None | Some(Value::Null) => return Err(PriceError::NotPositive),
            Some(Value::Number(number)) => number.to_string(),
            Some(Value::String(text)) => text.trim().to_string(),
            Some(other) => return Err(PriceError::InvalidFormat(other.to_string()))
        };

        let value = Decimal::from_str(&raw)
            .or_else(|_| Decimal::from_scientific(&raw))
            .map_err(|_| PriceError::InvalidFormat(raw.clone()))?;

        Price::from_decimal(value)
    }

    /// Integer codes 1..=4 map to their direction. Anything else is a sale,
    /// quoted codes included.
    pub fn direction(&self) -> Direction {
        self.trade_type.as_ref()
            .and_then(Value::as_u64)
            .and_then(|code| u8::try_from(code).ok())
            .and_then(Direction::from_code)
            .unwrap_or(Direction::Sell)
    }

    /// Futures without a day count in the description are demoted to their
    /// spot counterpart.
    pub fn direction_and_delivery(&self) -> (Direction, Delivery) {
        let direction = self.direction();

        if direction.is_spot() {
            return (direction, Delivery::Spot);
        }

        let delivery = delivery_from_descriptor(&self.description);

        (Direction::classify(direction.intent(), delivery), delivery)
    }
}

/// Decodes the first `[` to last `]` span of a reply. Elements that do not
/// fit the candidate shape are skipped.
pub fn parse_reply(reply: &str) -> Result<Vec<FallbackCandidate>, FallbackError> {
    let array = RE_JSON_ARRAY.find(reply).ok_or(FallbackError::MissingArray)?;
    let elements: Vec<Value> = serde_json::from_str(array.as_str())?;

    let candidates = elements.into_iter()
        .filter_map(|element| match serde_json::from_value::<FallbackCandidate>(element) {
            Ok(candidate) => Some(candidate),
            Err(error) => {
                debug!("Fallback candidate skipped: {error}");
                None
            }
        })
        .collect();

    Ok(candidates)
}

pub fn candidate_to_record(candidate: &FallbackCandidate, category: Category) -> Result<TradeRecord, ValidationError> {
    let price = candidate.price()?;
    let (direction, delivery) = candidate.direction_and_delivery();

    TradeRecord::new(category, &candidate.title, price, direction.intent(), delivery, candidate.keywords.joined())
}
