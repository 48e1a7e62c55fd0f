use crate::actors::ExtractionActor;
use crate::cache::SeenCache;
use crate::config::{EngineConfig, DEFAULT_SEEN_CACHE_CAPACITY, DEFAULT_SEEN_CACHE_TTL_SECS, DEFAULT_WORKERS, INGEST_BACKPRESSURE};
use crate::extract::{Extractor, FallbackExtractor};
use crate::models::InboundMessage;
use crate::storage::RecordStorage;
use csv::{ReaderBuilder, Trim};
use futures::future::join_all;
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::sync::Arc;
use std::time::Duration;
use tokio::spawn;
use tokio::sync::mpsc;
use tokio::task::{spawn_blocking, JoinHandle};
use tracing::{error, info, trace};

/// Totals for one engine run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Messages read from the source.
    pub messages: usize,
    /// Messages dropped by the message-seen gate.
    pub skipped: usize,
    /// Records produced before deduplication.
    pub candidates: usize,
    /// Records held in storage after the run.
    pub records: usize
}

/// Batch extraction pipeline: ingestion, message-seen gate, worker fan-out
/// and the final merge into shared storage.
pub struct AsyncEngine {
    storage: Arc<RecordStorage>,
    extractor: Arc<Extractor>,
    workers: usize,
    backpressure: usize,
    cache_capacity: u64,
    cache_timeout: Duration,
    seen_cache: Option<SeenCache>
}

impl AsyncEngine {
    pub fn new(storage: Arc<RecordStorage>) -> Self {
        let cache_capacity = DEFAULT_SEEN_CACHE_CAPACITY;
        let cache_timeout = Duration::from_secs(DEFAULT_SEEN_CACHE_TTL_SECS);

        Self {
            storage,
            extractor: Arc::new(Extractor::new()),
            workers: DEFAULT_WORKERS,
            backpressure: INGEST_BACKPRESSURE,
            cache_capacity,
            cache_timeout,
            seen_cache: Some(SeenCache::new(cache_capacity, cache_timeout))
        }
    }

    pub fn from_config(storage: Arc<RecordStorage>, config: &EngineConfig) -> Self {
        let mut engine = Self::new(storage).with_workers(config.workers);

        engine.cache_capacity = config.seen_cache_capacity;
        engine.cache_timeout = config.seen_cache_ttl;
        engine.seen_cache = config.seen_cache_enabled.then(|| SeenCache::from_config(config));

        engine
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn with_extractor(mut self, extractor: Extractor) -> Self {
        self.extractor = Arc::new(extractor);
        self
    }

    pub fn with_fallback(self, fallback: Arc<dyn FallbackExtractor>) -> Self {
        let extractor = self.extractor.as_ref().clone().with_fallback(fallback);
        self.with_extractor(extractor)
    }

    pub fn with_cache_timeout(mut self, timeout: Duration) -> Self {
        self.cache_timeout = timeout;
        self.rebuild_seen_cache()
    }

    pub fn without_seen_cache(mut self) -> Self {
        self.seen_cache = None;
        self
    }

    fn rebuild_seen_cache(mut self) -> Self {
        if self.seen_cache.is_some() {
            self.seen_cache = Some(SeenCache::new(self.cache_capacity, self.cache_timeout));
        }
        self
    }

    /// Orchestrates the end-to-end extraction pipeline for a CSV export.
    pub async fn run(&self, path: &str) -> anyhow::Result<RunSummary> {
        let (sender, receiver) = mpsc::channel::<InboundMessage>(self.backpressure);
        let csv_handle = self.spawn_csv_reader(path.to_string(), sender);
        let processing_result = self.process_messages(receiver).await;

        if let Err(error) = csv_handle.await {
            error!("CSV ingestion failed: {error}");
        }

        processing_result
    }

    /// Same pipeline over messages already in memory.
    pub async fn run_batch(&self, messages: Vec<InboundMessage>) -> anyhow::Result<RunSummary> {
        let (sender, receiver) = mpsc::channel::<InboundMessage>(self.backpressure);

        let feeder: JoinHandle<()> = spawn(async move {
            for message in messages {
                if sender.send(message).await.is_err() {
                    break;
                }
            }
        });

        let processing_result = self.process_messages(receiver).await;

        if let Err(error) = feeder.await {
            error!("Batch ingestion failed: {error}");
        }

        processing_result
    }

    fn spawn_csv_reader(&self, path: String, sender: mpsc::Sender<InboundMessage>) -> JoinHandle<()> {
        spawn_blocking(move || {
            let file = match File::open(&path) {
                Ok(file) => file,
                Err(error) => {
                    error!("Error opening CSV at path: {path} | {error}");
                    return;
                }
            };

            let mut reader = ReaderBuilder::new()
                .trim(Trim::All)
                .flexible(true)
                .from_reader(BufReader::new(file));

            for result in reader.deserialize::<InboundMessage>() {
                match result {
                    Ok(message) => {
                        if sender.blocking_send(message).is_err() {
                            break;
                        }
                    }
                    Err(error) => {
                        error!("CSV deserialization error: {error}");
                    }
                }
            }
        })
    }

    async fn process_messages(&self, mut receiver: mpsc::Receiver<InboundMessage>) -> anyhow::Result<RunSummary> {
        let mut actors = HashMap::<usize, ExtractionActor>::new();
        let mut summary = RunSummary::default();
        let mut next_worker = 0;

        while let Some(message) = receiver.recv().await {
            summary.messages += 1;

            if let Some(seen_cache) = &self.seen_cache {
                if seen_cache.is_processed(&message.text) {
                    trace!("Message in group [{}] already processed, skipping", message.group_label);
                    summary.skipped += 1;
                    continue;
                }

                seen_cache.mark_processed(&message.text).await;
            }

            //NOTE: Messages are independent of each other, so plain round-robin keeps the workers evenly loaded
            let worker_id = next_worker;
            next_worker = (next_worker + 1) % self.workers;

            let actor = actors.entry(worker_id).or_insert_with(|| {
                ExtractionActor::new(worker_id, self.extractor.clone(), self.storage.clone())
            });

            if !actor.accept(message) {
                error!("Extraction worker [{}] could not accept a message", actor.worker_id());
            }
        }

        let despawns = actors.into_values().map(|actor| actor.despawn());

        for result in join_all(despawns).await {
            match result {
                Ok(worker) => summary.candidates += worker.candidates,
                Err(error) => error!("An extraction worker did not despawn gracefully: {error:?}")
            }
        }

        summary.records = self.storage.len();

        info!(
            "Processed [{}] messages ([{}] already seen), [{}] candidates, [{}] records held",
            summary.messages, summary.skipped, summary.candidates, summary.records
        );

        Ok(summary)
    }
}
