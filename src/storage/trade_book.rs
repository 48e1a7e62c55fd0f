use std::collections::hash_map::Entry;
use std::collections::HashMap;

use crate::models::{DedupKey, TradeRecord};

/// Local deduplicated record set keyed by normalized title and direction.
///
/// Merging books is commutative and associative, so partial books built by
/// different workers in any order combine to the same final set.
#[derive(Debug, Default, Clone)]
pub struct TradeBook {
    records: HashMap<DedupKey, TradeRecord>
}

impl TradeBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether `record` is now the one held for its key.
    pub fn offer(&mut self, record: TradeRecord) -> bool {
        match self.records.entry(record.dedup_key()) {
            Entry::Occupied(mut kept) => {
                if record.outranks(kept.get()) {
                    kept.insert(record);
                    true
                } else {
                    false
                }
            }
            Entry::Vacant(slot) => {
                slot.insert(record);
                true
            }
        }
    }

    pub fn merge(&mut self, other: TradeBook) {
        for record in other.records.into_values() {
            self.offer(record);
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn into_records(self) -> Vec<TradeRecord> {
        let mut records: Vec<TradeRecord> = self.records.into_values().collect();
        sort_records(&mut records);
        records
    }
}

impl FromIterator<TradeRecord> for TradeBook {
    fn from_iter<I: IntoIterator<Item = TradeRecord>>(records: I) -> Self {
        let mut book = TradeBook::new();

        for record in records {
            book.offer(record);
        }

        book
    }
}

/// One-shot deduplication of a record multiset.
pub fn dedupe(records: impl IntoIterator<Item = TradeRecord>) -> Vec<TradeRecord> {
    records.into_iter().collect::<TradeBook>().into_records()
}

/// Output order: category, title, direction code, then price.
pub fn sort_records(records: &mut [TradeRecord]) {
    records.sort_by(|left, right| {
        (left.category, &left.title, left.direction.code(), left.price)
            .cmp(&(right.category, &right.title, right.direction.code(), right.price))
    });
}
