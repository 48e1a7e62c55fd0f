mod seen_cache;

pub use seen_cache::{content_hash, SeenCache};
