use std::sync::Arc;

use tokio::spawn;
use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinHandle};
use tracing::{debug, trace};

use crate::extract::Extractor;
use crate::models::InboundMessage;
use crate::storage::{Storage, TradeBook};

/// What one worker did over its lifetime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerSummary {
    pub messages: usize,
    pub candidates: usize,
    pub held: usize
}

/// Extraction worker owning a private deduplicated book.
///
/// Messages are extracted in arrival order; the book is merged into the
/// shared storage once the input channel closes.
pub struct ExtractionActor {
    worker_id: usize,
    sender: mpsc::UnboundedSender<InboundMessage>,
    handle: JoinHandle<WorkerSummary>
}

impl ExtractionActor {
    pub fn new<S: Storage>(worker_id: usize, extractor: Arc<Extractor>, storage: Arc<S>) -> Self {
        let (sender, mut receiver) = mpsc::unbounded_channel::<InboundMessage>();

        let handle = spawn(async move {
            let mut book = TradeBook::new();
            let mut summary = WorkerSummary::default();

            while let Some(message) = receiver.recv().await {
                summary.messages += 1;

                let records = extractor.extract(&message);

                trace!("Worker [{worker_id}] extracted [{}] records from group [{}]", records.len(), message.group_label);

                summary.candidates += records.len();

                for record in records {
                    book.offer(record);
                }
            }

            summary.held = book.len();

            if !book.is_empty() {
                storage.absorb(book);
            }

            debug!("Worker [{worker_id}] merged [{}] records from [{}] messages", summary.held, summary.messages);

            summary
        });

        Self { worker_id, sender, handle }
    }

    pub fn worker_id(&self) -> usize {
        self.worker_id
    }

    /// Queues a message; `false` once the worker has stopped.
    pub fn accept(&self, message: InboundMessage) -> bool {
        self.sender.send(message).is_ok()
    }

    /// Closes the queue and waits for the book to be merged into storage.
    pub async fn despawn(self) -> Result<WorkerSummary, JoinError> {
        drop(self.sender);
        self.handle.await
    }
}
