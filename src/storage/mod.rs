mod record_storage;
mod trade_book;
#[cfg(test)]
mod tests;

use crate::models::TradeRecord;

pub use record_storage::RecordStorage;
pub use trade_book::{dedupe, sort_records, TradeBook};

/// Shared, deduplicating sink the extraction workers merge their books into.
pub trait Storage: Send + Sync + 'static {
    /// Keeps `record` unless a better competitor for its dedup key is already held.
    fn offer(&self, record: TradeRecord);

    /// Folds a worker's local book in with the same merge rule as `offer`.
    fn absorb(&self, book: TradeBook) {
        for record in book.into_records() {
            self.offer(record);
        }
    }

    /// Snapshot of the held records in output order.
    fn records(&self) -> Vec<TradeRecord>;
}
