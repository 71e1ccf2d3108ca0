use chrono::Local;
use serde::{Deserialize, Serialize};
use std::sync::Mutex;

use crate::application::use_cases::enrichment::{EnrichmentEvent, EnrichmentObserver};

const MAX_LOG_ENTRIES: usize = 100;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LogEntry {
    pub time: String,
    pub level: String,
    pub source: String,
    pub message: String,
}

pub type LogBuffer = Mutex<Vec<LogEntry>>;

pub fn add_log_entry(logs: &LogBuffer, level: &str, source: &str, message: &str) -> LogEntry {
    let entry = LogEntry {
        time: Local::now().format("%H:%M:%S").to_string(),
        level: level.to_string(),
        source: source.to_string(),
        message: message.to_string(),
    };
    let mut logs = logs.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    logs.push(entry.clone());
    if logs.len() > MAX_LOG_ENTRIES {
        logs.remove(0);
    }
    entry
}

pub fn add_log(logs: &LogBuffer, level: &str, source: &str, message: &str) {
    add_log_entry(logs, level, source, message);
}

pub fn snapshot(logs: &LogBuffer) -> Vec<LogEntry> {
    logs.lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .clone()
}

/// Mirrors enrichment progress into the log buffer served at `/api/logs`
pub struct LogBufferObserver {
    logs: std::sync::Arc<LogBuffer>,
}

impl LogBufferObserver {
    pub fn new(logs: std::sync::Arc<LogBuffer>) -> Self {
        Self { logs }
    }
}

impl EnrichmentObserver for LogBufferObserver {
    fn on_event(&self, event: &EnrichmentEvent) {
        let (level, message) = match event {
            EnrichmentEvent::Started { total } => {
                ("INFO", format!("Enriching {} descriptions", total))
            }
            EnrichmentEvent::Enriched { .. } | EnrichmentEvent::NoValueFound { .. } => return,
            EnrichmentEvent::EmptyReply { row_index, original } => (
                "WARN",
                format!("Row {}: empty reply for '{}'", row_index + 1, original),
            ),
            EnrichmentEvent::Failed {
                row_index,
                original,
                error,
            } => (
                "ERROR",
                format!(
                    "Row {}: error processing description '{}': {}",
                    row_index + 1,
                    original,
                    error
                ),
            ),
            EnrichmentEvent::Cancelled { completed, total } => (
                "WARN",
                format!("Enrichment cancelled after {} of {}", completed, total),
            ),
            EnrichmentEvent::Finished {
                total,
                enriched,
                failed,
            } => (
                "INFO",
                format!(
                    "Enrichment finished: {} of {} enriched, {} failed",
                    enriched, total, failed
                ),
            ),
        };
        add_log(&self.logs, level, "Enrichment", &message);
    }
}
