use std::time::Duration;

use moka::future::Cache;
use sha2::{Digest, Sha256};

use crate::config::EngineConfig;

pub type ContentHash = [u8; 32];

/// Remembers which message bodies were already handed to the engine.
///
/// Keys are SHA-256 digests of the text, so the cache never holds message
/// content. Entries expire after the configured lifetime.
#[derive(Clone)]
pub struct SeenCache {
    entries: Cache<ContentHash, ()>
}

impl SeenCache {
    pub fn new(capacity: u64, time_to_live: Duration) -> Self {
        Self {
            entries: Cache::builder()
                .max_capacity(capacity)
                .time_to_live(time_to_live)
                .build()
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.seen_cache_capacity, config.seen_cache_ttl)
    }

    pub fn is_processed(&self, text: &str) -> bool {
        self.entries.contains_key(&content_hash(text))
    }

    pub async fn mark_processed(&self, text: &str) {
        self.entries.insert(content_hash(text), ()).await;
    }
}

pub fn content_hash(text: &str) -> ContentHash {
    Sha256::digest(text.as_bytes()).into()
}
