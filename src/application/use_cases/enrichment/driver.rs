use super::{Cancellation, EnrichmentEvent, EnrichmentObserver, TextExtractor};
use crate::domain::csv::{EnrichmentUnit, Table};
use crate::domain::error::{AppError, Result};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

/// Counters for one pass over the worklist
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EnrichmentSummary {
    pub total: usize,
    pub enriched: usize,
    pub no_value: usize,
    pub empty: usize,
    pub failed: usize,
}

/// What to do with a row once its call has returned
enum RowOutcome {
    Replace(String),
    Keep,
}

/// Sends each worklist entry to the extractor, strictly one at a time and in
/// order. A failing entry keeps its original text and never stops the batch.
pub struct EnrichmentDriver {
    extractor: Arc<dyn TextExtractor + Send + Sync>,
    observer: Arc<dyn EnrichmentObserver + Send + Sync>,
    instruction: String,
    sentinel: String,
    request_timeout: Duration,
}

impl EnrichmentDriver {
    pub fn new(
        extractor: Arc<dyn TextExtractor + Send + Sync>,
        observer: Arc<dyn EnrichmentObserver + Send + Sync>,
        instruction: impl Into<String>,
        sentinel: impl Into<String>,
        request_timeout: Duration,
    ) -> Self {
        Self {
            extractor,
            observer,
            instruction: instruction.into(),
            sentinel: sentinel.into(),
            request_timeout,
        }
    }

    pub fn build_prompt(&self, description: &str) -> String {
        format!("{}: {}", self.instruction, description)
    }

    /// Enrich `description_idx` of every row referenced by `worklist`.
    ///
    /// Only cancellation is surfaced as an error; rows enriched before the
    /// cancellation keep their new values.
    pub async fn enrich(
        &self,
        table: &mut Table,
        worklist: &mut [EnrichmentUnit],
        description_idx: usize,
        cancellation: &mut Cancellation,
    ) -> Result<EnrichmentSummary> {
        let mut summary = EnrichmentSummary {
            total: worklist.len(),
            ..Default::default()
        };
        self.observer.on_event(&EnrichmentEvent::Started {
            total: summary.total,
        });

        for (completed, unit) in worklist.iter_mut().enumerate() {
            let prompt = self.build_prompt(&unit.original);

            let reply = tokio::select! {
                biased;
                _ = cancellation.cancelled() => {
                    self.observer.on_event(&EnrichmentEvent::Cancelled {
                        completed,
                        total: summary.total,
                    });
                    return Err(AppError::Cancelled);
                }
                reply = self.call_extractor(&prompt) => reply,
            };

            match self.recover(unit, reply, &mut summary) {
                RowOutcome::Replace(enriched) => {
                    if let Some(row) = table.row(unit.row_index) {
                        let updated = row.with_field(description_idx, enriched.as_str());
                        table.replace_row(unit.row_index, updated);
                    }
                    unit.enriched = Some(enriched);
                }
                RowOutcome::Keep => {}
            }
        }

        self.observer.on_event(&EnrichmentEvent::Finished {
            total: summary.total,
            enriched: summary.enriched + summary.no_value,
            failed: summary.failed,
        });
        Ok(summary)
    }

    async fn call_extractor(&self, prompt: &str) -> Result<String> {
        match tokio::time::timeout(self.request_timeout, self.extractor.extract(prompt)).await {
            Ok(reply) => reply,
            Err(_) => Err(AppError::Timeout(self.request_timeout.as_secs())),
        }
    }

    /// Per-row recovery policy: failures and blank replies keep the original.
    fn recover(
        &self,
        unit: &EnrichmentUnit,
        reply: Result<String>,
        summary: &mut EnrichmentSummary,
    ) -> RowOutcome {
        let row_index = unit.row_index;
        let original = unit.original.clone();

        match reply {
            Ok(text) => {
                let text = text.trim();
                if text.is_empty() {
                    summary.empty += 1;
                    self.observer
                        .on_event(&EnrichmentEvent::EmptyReply { row_index, original });
                    RowOutcome::Keep
                } else if text == self.sentinel {
                    summary.no_value += 1;
                    self.observer
                        .on_event(&EnrichmentEvent::NoValueFound { row_index, original });
                    RowOutcome::Replace(text.to_string())
                } else {
                    summary.enriched += 1;
                    self.observer.on_event(&EnrichmentEvent::Enriched {
                        row_index,
                        original,
                        enriched: text.to_string(),
                    });
                    RowOutcome::Replace(text.to_string())
                }
            }
            Err(error) => {
                summary.failed += 1;
                self.observer.on_event(&EnrichmentEvent::Failed {
                    row_index,
                    original,
                    error: error.to_string(),
                });
                RowOutcome::Keep
            }
        }
    }
}
