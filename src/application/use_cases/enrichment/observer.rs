use serde::Serialize;
use tracing::{debug, info, warn};

/// Progress and failure notifications emitted by the enrichment driver
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum EnrichmentEvent {
    Started {
        total: usize,
    },
    Enriched {
        row_index: usize,
        original: String,
        enriched: String,
    },
    /// The collaborator answered with the "nothing found" marker
    NoValueFound {
        row_index: usize,
        original: String,
    },
    /// The collaborator answered with blank text; the cell was kept
    EmptyReply {
        row_index: usize,
        original: String,
    },
    Failed {
        row_index: usize,
        original: String,
        error: String,
    },
    Cancelled {
        completed: usize,
        total: usize,
    },
    Finished {
        total: usize,
        enriched: usize,
        failed: usize,
    },
}

impl EnrichmentEvent {
    pub fn is_failure(&self) -> bool {
        matches!(self, EnrichmentEvent::Failed { .. })
    }
}

pub trait EnrichmentObserver {
    fn on_event(&self, event: &EnrichmentEvent);
}

/// Reports enrichment events through `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl EnrichmentObserver for TracingObserver {
    fn on_event(&self, event: &EnrichmentEvent) {
        match event {
            EnrichmentEvent::Started { total } => {
                info!(total, "Enriching descriptions");
            }
            EnrichmentEvent::Enriched {
                row_index,
                original,
                enriched,
            } => {
                debug!(row_index, %original, %enriched, "Description enriched");
            }
            EnrichmentEvent::NoValueFound { row_index, original } => {
                debug!(row_index, %original, "No extractable value in description");
            }
            EnrichmentEvent::EmptyReply { row_index, original } => {
                warn!(row_index, %original, "Empty reply, description kept");
            }
            EnrichmentEvent::Failed {
                row_index,
                original,
                error,
            } => {
                warn!(row_index, %original, %error, "Error processing description");
            }
            EnrichmentEvent::Cancelled { completed, total } => {
                warn!(completed, total, "Enrichment cancelled");
            }
            EnrichmentEvent::Finished {
                total,
                enriched,
                failed,
            } => {
                info!(total, enriched, failed, "Enrichment finished");
            }
        }
    }
}

/// Fans one event out to several observers
pub struct CompositeObserver {
    observers: Vec<std::sync::Arc<dyn EnrichmentObserver + Send + Sync>>,
}

impl CompositeObserver {
    pub fn new(observers: Vec<std::sync::Arc<dyn EnrichmentObserver + Send + Sync>>) -> Self {
        Self { observers }
    }
}

impl EnrichmentObserver for CompositeObserver {
    fn on_event(&self, event: &EnrichmentEvent) {
        for observer in &self.observers {
            observer.on_event(event);
        }
    }
}
