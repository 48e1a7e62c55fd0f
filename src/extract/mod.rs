mod canonical;
mod categorizer;
mod collectible;
mod context;
mod errors;
mod fallback;
mod ticket;

use std::sync::Arc;

use tracing::{debug, trace, warn};

use crate::models::{Category, InboundMessage, TradeRecord};

pub use categorizer::{classify, MessageCategory};
pub use context::subject_identity;
pub use errors::FallbackError;
pub use fallback::{candidate_to_record, FallbackCandidate, FallbackExtractor, Keywords};

/// Turns one chat message into candidate records.
///
/// Stateless across messages; the same extractor is shared by every worker.
#[derive(Clone, Default)]
pub struct Extractor {
    fallback: Option<Arc<dyn FallbackExtractor>>
}

impl Extractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fallback(mut self, fallback: Arc<dyn FallbackExtractor>) -> Self {
        self.fallback = Some(fallback);
        self
    }

    /// Categorizes the message and runs the matching cascade. The fallback
    /// delegate is only consulted when an accepted message produced nothing.
    pub fn extract(&self, message: &InboundMessage) -> Vec<TradeRecord> {
        if message.is_system_notice() {
            trace!("System notice from [{}] skipped", message.group_label);
            return Vec::new();
        }

        let category = match classify(&message.text) {
            MessageCategory::Trade(category) => category,
            MessageCategory::NotTrade => {
                trace!("Message in [{}] is not a trade listing", message.group_label);
                return Vec::new();
            }
        };

        let mut records = match category {
            Category::Ticket => {
                let Some(subject) = subject_identity(&message.text) else {
                    debug!("Ticket message in [{}] names no known show", message.group_label);
                    return Vec::new();
                };

                ticket::parse_ticket_message(&message.text, &subject)
            }
            Category::Collectible => collectible::parse_collectible_message(&message.text)
        };

        if records.is_empty() {
            records = self.run_fallback(&message.text, category);
        }

        records.into_iter()
            .map(|record| record.with_provenance(message))
            .collect()
    }

    fn run_fallback(&self, text: &str, category: Category) -> Vec<TradeRecord> {
        let Some(fallback) = &self.fallback else {
            return Vec::new();
        };

        let candidates = match fallback.extract(text) {
            Ok(candidates) => candidates,
            Err(error) => {
                warn!("{error}");
                return Vec::new();
            }
        };

        candidates.iter()
            .filter_map(|candidate| match candidate_to_record(candidate, category) {
                Ok(record) => Some(record),
                Err(error) => {
                    debug!("Fallback candidate [{}] discarded: {error}", candidate.title);
                    None
                }
            })
            .collect()
    }
}
