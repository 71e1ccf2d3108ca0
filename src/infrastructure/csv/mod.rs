// ============================================================
// CSV INFRASTRUCTURE LAYER
// ============================================================
// Byte decoding, record parsing and re-serialization

mod csv_parser;
mod csv_writer;

pub use csv_parser::{decode_text, CsvParser};
pub use csv_writer::CsvWriter;
