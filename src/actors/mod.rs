mod extraction_actor;

pub use extraction_actor::{ExtractionActor, WorkerSummary};
