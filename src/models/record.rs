use std::cmp::Ordering;

use serde::Serialize;

use crate::config::TITLE_MAX_CHARS;
use crate::models::errors::ValidationError;
use crate::models::{Category, Delivery, Direction, InboundMessage, Intent};
use crate::types::Price;

/// A validated trade listing extracted from one line or segment of a message.
///
/// Records are created once per matched line and are only ever replaced
/// wholesale during deduplication, never edited in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TradeRecord {
    /// Subject/product identity, optional date and grade/descriptor.
    pub title: String,
    pub price: Price,
    #[serde(rename = "trade_type")]
    pub direction: Direction,
    /// Zero for spot trades, the forward term otherwise.
    pub delivery_days: u32,
    /// Ordered, separator-joined annotations.
    pub extra_info: String,
    pub category: Category,
    pub source_group: String,
    pub sender_id: Option<String>
}

impl TradeRecord {
    /// Builds a record, deriving the direction from intent and delivery so
    /// `delivery_days == 0` holds exactly for spot directions.
    ///
    /// # Errors
    /// Returns `ValidationError::EmptyTitle` when the title is blank after trimming.
    pub fn new(
        category: Category,
        title: &str,
        price: Price,
        intent: Intent,
        delivery: Delivery,
        extra_info: impl Into<String>
    ) -> Result<Self, ValidationError> {
        let title = title.trim();

        if title.is_empty() {
            return Err(ValidationError::EmptyTitle);
        }

        Ok(Self {
            title: title.chars().take(TITLE_MAX_CHARS).collect(),
            price,
            direction: Direction::classify(intent, delivery),
            delivery_days: delivery.days(),
            extra_info: extra_info.into(),
            category,
            source_group: String::new(),
            sender_id: None
        })
    }

    pub fn with_provenance(mut self, message: &InboundMessage) -> Self {
        self.source_group = message.group_label.clone();
        self.sender_id = message.sender_id.clone();
        self
    }

    pub fn dedup_key(&self) -> DedupKey {
        DedupKey {
            title: normalize_title(&self.title),
            direction: self.direction
        }
    }

    /// Whether `self` should replace `kept` when both share a dedup key.
    ///
    /// Buy/Long keep the strictly higher price, Sell/Short the strictly lower
    /// one. Equal prices fall back to a total order over the remaining fields,
    /// which keeps the merge independent of arrival order.
    pub fn outranks(&self, kept: &TradeRecord) -> bool {
        match self.price.cmp(&kept.price) {
            Ordering::Equal => self.tiebreak() < kept.tiebreak(),
            ordering if self.direction.prefers_higher() => ordering == Ordering::Greater,
            ordering => ordering == Ordering::Less
        }
    }

    fn tiebreak(&self) -> (&str, &str, u32, Category, &str, Option<&str>) {
        (
            &self.title,
            &self.extra_info,
            self.delivery_days,
            self.category,
            &self.source_group,
            self.sender_id.as_deref()
        )
    }
}

/// Identity used for deduplication: normalized title plus direction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DedupKey {
    pub title: String,
    pub direction: Direction
}

pub fn normalize_title(title: &str) -> String {
    title.trim()
        .chars()
        .filter(|character| !character.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}
