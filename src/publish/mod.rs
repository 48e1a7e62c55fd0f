mod errors;
mod json_lines;

use serde::Serialize;

use crate::models::{Category, Direction, TradeRecord};
use crate::types::Price;

pub use errors::PublishError;
pub use json_lines::JsonLinesPublisher;

/// Shape handed to the downstream publishing service for one record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublishDraft {
    pub title: String,
    pub price: Price,
    pub trade_type: Direction,
    pub delivery_days: u32,
    pub extra_info: String,
    pub category: Category,
    pub source_group: String,
    /// The listing's sender, or the publisher identity when the sender is unknown.
    pub wechat_id: String
}

impl PublishDraft {
    pub fn from_record(record: &TradeRecord, publisher_id: &str) -> Self {
        Self {
            title: record.title.clone(),
            price: record.price,
            trade_type: record.direction,
            delivery_days: record.delivery_days,
            extra_info: record.extra_info.clone(),
            category: record.category,
            source_group: record.source_group.clone(),
            wechat_id: record.sender_id.clone().unwrap_or_else(|| publisher_id.to_string())
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishItemError {
    pub title: String,
    pub reason: String
}

/// Outcome of one batch; a partially failed batch is still a report, not an error.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PublishReport {
    pub total_count: usize,
    pub success_count: usize,
    pub errors: Vec<PublishItemError>,
    /// Set when the writer failed to flush after the last draft.
    pub flush_error: Option<String>
}

impl PublishReport {
    pub fn failure_count(&self) -> usize {
        self.errors.len()
    }

    /// Fails when any draft or the final flush did not reach the writer.
    pub fn ensure_complete(&self) -> Result<(), PublishError> {
        if let Some(reason) = &self.flush_error {
            return Err(PublishError::Flush(reason.clone()));
        }

        if self.failure_count() > 0 {
            return Err(PublishError::Incomplete {
                failed: self.failure_count(),
                total: self.total_count
            });
        }

        Ok(())
    }
}

pub trait Publisher {
    fn publish(&mut self, records: &[TradeRecord], publisher_id: &str) -> PublishReport;
}
