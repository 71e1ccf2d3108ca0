use serde::{Deserialize, Serialize};

/// One description cell queued for enrichment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichmentUnit {
    /// Index of the owning row in the normalized table
    pub row_index: usize,
    pub original: String,
    pub enriched: Option<String>,
}

impl EnrichmentUnit {
    pub fn new(row_index: usize, original: impl Into<String>) -> Self {
        Self {
            row_index,
            original: original.into(),
            enriched: None,
        }
    }

    /// The enriched text if the collaborator succeeded, otherwise the original
    pub fn current(&self) -> &str {
        self.enriched.as_deref().unwrap_or(&self.original)
    }

    pub fn is_enriched(&self) -> bool {
        self.enriched.is_some()
    }
}

/// Terminal record of one processed upload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessingResult {
    pub file_name: String,
    pub rows_processed: usize,
    pub descriptions: Vec<String>,
    pub updated_csv_content: String,
    pub saved_file_path: String,
}
