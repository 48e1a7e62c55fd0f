use std::io::Write;

use tracing::{debug, warn};

use crate::models::TradeRecord;
use crate::publish::{PublishDraft, PublishError, PublishItemError, PublishReport, Publisher};

/// Writes one JSON draft per line to any writer.
pub struct JsonLinesPublisher<W: Write> {
    output: W
}

impl<W: Write> JsonLinesPublisher<W> {
    pub fn new(output: W) -> Self {
        Self { output }
    }

    pub fn into_inner(self) -> W {
        self.output
    }

    fn write_draft(&mut self, draft: &PublishDraft) -> Result<(), PublishError> {
        let line = serde_json::to_string(draft)?;
        writeln!(self.output, "{line}")?;
        Ok(())
    }
}

impl<W: Write> Publisher for JsonLinesPublisher<W> {
    fn publish(&mut self, records: &[TradeRecord], publisher_id: &str) -> PublishReport {
        let mut report = PublishReport {
            total_count: records.len(),
            ..PublishReport::default()
        };

        for record in records {
            let draft = PublishDraft::from_record(record, publisher_id);

            match self.write_draft(&draft) {
                Ok(()) => report.success_count += 1,
                Err(error) => {
                    warn!("Publishing [{}] failed: {error}", draft.title);
                    report.errors.push(PublishItemError {
                        title: draft.title,
                        reason: error.to_string()
                    });
                }
            }
        }

        if let Err(error) = self.output.flush() {
            warn!("Flushing published drafts failed: {error}");
            report.flush_error = Some(error.to_string());
        }

        debug!("Published [{}] of [{}] drafts", report.success_count, report.total_count);

        report
    }
}
