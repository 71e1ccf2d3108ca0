pub mod use_cases;

pub use use_cases::csv_enrichment::CsvEnrichmentUseCase;
pub use use_cases::enrichment::{
    CancelHandle, Cancellation, EnrichmentDriver, EnrichmentEvent, EnrichmentObserver,
    LlmExtractor, TextExtractor, TracingObserver,
};
