use crate::models::{DedupKey, TradeRecord};
use crate::storage::{sort_records, Storage};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::Arc;

pub struct RecordStorage {
    records: Arc<DashMap<DedupKey, TradeRecord>>
}

impl RecordStorage {
    pub fn new() -> Self {
        Self {
            records: Arc::new(DashMap::new())
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Default for RecordStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl Storage for RecordStorage {
    fn offer(&self, record: TradeRecord) {
        match self.records.entry(record.dedup_key()) {
            Entry::Occupied(mut kept) => {
                if record.outranks(kept.get()) {
                    kept.insert(record);
                }
            }
            Entry::Vacant(slot) => {
                slot.insert(record);
            }
        }
    }

    fn records(&self) -> Vec<TradeRecord> {
        let mut records: Vec<TradeRecord> = self.records.iter().map(|item| item.value().clone()).collect();
        sort_records(&mut records);
        records
    }
}
