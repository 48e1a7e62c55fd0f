//! Extracts deduplicated trade records (concert tickets, collectible coins and
//! notes) from exported group-chat messages.
//!
//! [`engine::AsyncEngine`] drives the whole pipeline; [`extract::Extractor`]
//! is the per-message entry point and takes an optional
//! [`extract::FallbackExtractor`].

pub mod actors;
pub mod cache;
pub mod config;
pub mod engine;
pub mod extract;
pub mod models;
pub mod publish;
pub mod storage;
pub mod types;
