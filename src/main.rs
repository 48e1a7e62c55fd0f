use std::io::{stderr, stdout, BufWriter};
use std::process::exit;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use tracing::{info, warn};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, Layer};

use chat_trade_extractor::config::EngineConfig;
use chat_trade_extractor::engine::AsyncEngine;
use chat_trade_extractor::publish::{JsonLinesPublisher, Publisher};
use chat_trade_extractor::storage::{RecordStorage, Storage};

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: trade-extractor [messages].csv [log_level:optional] > [records].jsonl");
        eprintln!("Input columns: group,sender,text");
        eprintln!("Available log levels: error, warn, info, debug, trace (default: error)");
        exit(1);
    }

    let path = &args[1];
    let log_level = args.get(2)
        .map(|s| parse_log_level(s)).unwrap_or_else(|| LevelFilter::ERROR);

    setup_logging(log_level);

    let config = EngineConfig::from_env()?;
    let storage = Arc::new(RecordStorage::new());
    let engine = AsyncEngine::from_config(storage.clone(), &config);

    let timer = Instant::now();
    let summary = engine.run(path).await?;
    let duration = timer.elapsed();

    info!("Extracted [{}] records from [{}] messages in: {duration:?}", summary.records, summary.messages);

    if storage.is_empty() {
        warn!("No trade records were extracted from {path}");
    }

    write_results_to_stdout(storage, &config.publisher_id)
}

fn parse_log_level(level: &str) -> LevelFilter {
    match level.to_lowercase().as_str() {
        "trace" => LevelFilter::TRACE,
        "debug" => LevelFilter::DEBUG,
        "info" => LevelFilter::INFO,
        "warn" => LevelFilter::WARN,
        "error" => LevelFilter::ERROR,
        _ => {
            eprintln!("Invalid log level '{}', defaulting to 'error'", level);
            LevelFilter::ERROR
        }
    }
}

fn setup_logging(level: LevelFilter) {
    //NOTE: Records go to stdout, so logging has to use stderr
    let terminal_log = fmt::layer()
        .with_target(false)
        .with_writer(stderr)
        .with_filter(level);

    tracing_subscriber::registry()
        .with(terminal_log)
        .init();
}

fn write_results_to_stdout(storage: Arc<RecordStorage>, publisher_id: &str) -> Result<()> {
    let records = storage.records();
    let mut publisher = JsonLinesPublisher::new(BufWriter::new(stdout().lock()));
    let report = publisher.publish(&records, publisher_id);

    info!("Published [{}] of [{}] records", report.success_count, report.total_count);

    report.ensure_complete()?;

    Ok(())
}
