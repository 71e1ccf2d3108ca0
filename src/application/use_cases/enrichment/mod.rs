mod cancellation;
mod driver;
mod extractor;
mod observer;

pub use cancellation::{CancelHandle, Cancellation};
pub use driver::{EnrichmentDriver, EnrichmentSummary};
pub use extractor::{LlmExtractor, TextExtractor};
pub use observer::{CompositeObserver, EnrichmentEvent, EnrichmentObserver, TracingObserver};
