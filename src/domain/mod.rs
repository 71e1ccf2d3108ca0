pub mod error;
pub mod llm_config;

// Statement ingest types and structural stages
pub mod csv;
