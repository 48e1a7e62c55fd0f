use std::time::Duration;

use thiserror::Error;

/// Minimum message length (chars) for the ticket path.
pub const TICKET_MIN_CHARS: usize = 20;

/// Accepted ticket sale price range, inclusive.
pub const TICKET_PRICE_MIN: u32 = 100;
pub const TICKET_PRICE_MAX: u32 = 50_000;

/// A nominal-sale pair with nominal >= sale is only trusted when both sides clear this floor.
pub const TICKET_NOMINAL_FLOOR: u32 = 300;

/// Titles are cut to this many chars.
pub const TITLE_MAX_CHARS: usize = 60;

/// Residual product names (no table hit) are cut to this many chars.
pub const RESIDUAL_NAME_MAX_CHARS: usize = 20;

/// Collectible natural-language lines shorter than this are ignored.
pub const COLLECTIBLE_MIN_LINE_CHARS: usize = 5;

/// Quantity tags are only attached below this count; larger numbers are years or weights.
pub const QUANTITY_TAG_LIMIT: u32 = 1000;

/// Channel capacity between CSV ingestion and dispatch.
pub const INGEST_BACKPRESSURE: usize = 256;

pub const DEFAULT_WORKERS: usize = 4;
pub const DEFAULT_SEEN_CACHE_CAPACITY: u64 = 100_000;
/// Seen-message hashes are kept for a week.
pub const DEFAULT_SEEN_CACHE_TTL_SECS: u64 = 7 * 24 * 60 * 60;
pub const DEFAULT_PUBLISHER_ID: &str = "collector";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration error: {name} must be {expected}, got [{value}]")]
    InvalidValue {
        name: &'static str,
        expected: &'static str,
        value: String
    }
}

#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Extraction worker actors (TRADE_WORKERS)
    pub workers: usize,
    /// Whether the message-seen gate is applied (TRADE_SEEN_CACHE=on|off)
    pub seen_cache_enabled: bool,
    /// Max remembered message hashes (TRADE_SEEN_CACHE_CAPACITY)
    pub seen_cache_capacity: u64,
    /// Lifetime of a remembered hash (TRADE_SEEN_CACHE_TTL_SECS)
    pub seen_cache_ttl: Duration,
    /// Identity attached to published drafts without a sender (TRADE_PUBLISHER_ID)
    pub publisher_id: String
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            seen_cache_enabled: true,
            seen_cache_capacity: DEFAULT_SEEN_CACHE_CAPACITY,
            seen_cache_ttl: Duration::from_secs(DEFAULT_SEEN_CACHE_TTL_SECS),
            publisher_id: DEFAULT_PUBLISHER_ID.to_string()
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the config from any variable source; `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let workers = match lookup("TRADE_WORKERS") {
            Some(value) => value.trim().parse::<usize>().ok().filter(|workers| *workers > 0)
                .ok_or_else(|| invalid("TRADE_WORKERS", "a positive integer", value))?,
            None => defaults.workers
        };

        let seen_cache_enabled = match lookup("TRADE_SEEN_CACHE") {
            Some(value) => {
                let normalized = value.trim().to_lowercase();

                match normalized.as_str() {
                    "on" | "true" | "1" => true,
                    "off" | "false" | "0" => false,
                    _ => return Err(invalid("TRADE_SEEN_CACHE", "on or off", value))
                }
            },
            None => defaults.seen_cache_enabled
        };

        let seen_cache_capacity = match lookup("TRADE_SEEN_CACHE_CAPACITY") {
            Some(value) => value.trim().parse::<u64>()
                .map_err(|_| invalid("TRADE_SEEN_CACHE_CAPACITY", "an unsigned integer", value))?,
            None => defaults.seen_cache_capacity
        };

        let seen_cache_ttl = match lookup("TRADE_SEEN_CACHE_TTL_SECS") {
            Some(value) => value.trim().parse::<u64>().map(Duration::from_secs)
                .map_err(|_| invalid("TRADE_SEEN_CACHE_TTL_SECS", "a number of seconds", value))?,
            None => defaults.seen_cache_ttl
        };

        let publisher_id = lookup("TRADE_PUBLISHER_ID")
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or(defaults.publisher_id);

        Ok(Self {
            workers,
            seen_cache_enabled,
            seen_cache_capacity,
            seen_cache_ttl,
            publisher_id
        })
    }
}

fn invalid(name: &'static str, expected: &'static str, value: String) -> ConfigError {
    ConfigError::InvalidValue { name, expected, value }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();

        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_config_defaults_when_environment_is_empty() -> anyhow::Result<()> {
        let config = EngineConfig::from_lookup(lookup_from(&[]))?;

        assert_eq!(config.workers, DEFAULT_WORKERS);
        assert!(config.seen_cache_enabled);
        assert_eq!(config.seen_cache_ttl, Duration::from_secs(DEFAULT_SEEN_CACHE_TTL_SECS));
        assert_eq!(config.publisher_id, DEFAULT_PUBLISHER_ID);

        Ok(())
    }

    #[test]
    fn test_config_reads_overrides() -> anyhow::Result<()> {
        let config = EngineConfig::from_lookup(lookup_from(&[
            ("TRADE_WORKERS", "8"),
            ("TRADE_SEEN_CACHE", "off"),
            ("TRADE_SEEN_CACHE_CAPACITY", "10"),
            ("TRADE_SEEN_CACHE_TTL_SECS", "60"),
            ("TRADE_PUBLISHER_ID", "desk-7")
        ]))?;

        assert_eq!(config.workers, 8);
        assert!(!config.seen_cache_enabled);
        assert_eq!(config.seen_cache_capacity, 10);
        assert_eq!(config.seen_cache_ttl, Duration::from_secs(60));
        assert_eq!(config.publisher_id, "desk-7");

        Ok(())
    }

    #[test]
    fn test_config_rejects_invalid_values() {
        assert!(EngineConfig::from_lookup(lookup_from(&[("TRADE_WORKERS", "0")])).is_err());
        assert!(EngineConfig::from_lookup(lookup_from(&[("TRADE_WORKERS", "many")])).is_err());
        assert!(EngineConfig::from_lookup(lookup_from(&[("TRADE_SEEN_CACHE", "maybe")])).is_err());
        assert!(EngineConfig::from_lookup(lookup_from(&[("TRADE_SEEN_CACHE_TTL_SECS", "-1")])).is_err());
    }
}
