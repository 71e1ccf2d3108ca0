pub mod csv_enrichment;
pub mod enrichment;
