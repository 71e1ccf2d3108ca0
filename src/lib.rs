pub mod app;
pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;

pub use app::run;
pub use application::CsvEnrichmentUseCase;
pub use domain::csv::{ProcessingResult, UploadedFile};
pub use domain::error::{AppError, Result};
