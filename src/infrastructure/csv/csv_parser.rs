// ============================================================
// CSV PARSER
// ============================================================
// Decode uploaded bytes and split them into raw records

use std::borrow::Cow;

use csv::{ReaderBuilder, Trim};
use encoding_rs::{Encoding, UTF_8};

use crate::domain::csv::RawRow;
use crate::domain::error::AppError;

/// Header-less, width-tolerant CSV parser
pub struct CsvParser {
    /// Delimiter character (default: comma)
    delimiter: u8,

    /// Whether to trim whitespace from values
    trim: bool,
}

impl Default for CsvParser {
    fn default() -> Self {
        Self {
            delimiter: b',',
            trim: true,
        }
    }
}

impl CsvParser {
    /// Create a new CSV parser with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether to trim whitespace
    pub fn with_trim(mut self, trim: bool) -> Self {
        self.trim = trim;
        self
    }

    /// Decode and parse raw upload bytes
    pub fn parse_bytes(&self, bytes: &[u8]) -> Result<Vec<RawRow>, AppError> {
        let content = decode_text(bytes)?;
        self.parse_content(&content)
    }

    /// Parse CSV content from string. Blank lines are skipped and rows may
    /// have any width. Trimming also applies inside quoted fields.
    pub fn parse_content(&self, content: &str) -> Result<Vec<RawRow>, AppError> {
        let mut reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(false)
            .trim(if self.trim { Trim::All } else { Trim::None })
            .flexible(true)
            .from_reader(content.as_bytes());

        let mut rows = Vec::new();
        for (index, result) in reader.records().enumerate() {
            let record = result.map_err(|e| {
                AppError::MalformedInput(format!("Failed to parse CSV row {}: {}", index + 1, e))
            })?;

            let row = RawRow::new(record.iter().map(str::to_string).collect());
            if row.is_blank() {
                continue;
            }
            rows.push(row);
        }

        Ok(rows)
    }
}

/// Decode bytes as text. A BOM picks the encoding (UTF-8 / UTF-16LE / UTF-16BE),
/// otherwise the bytes must be valid UTF-8.
pub fn decode_text(bytes: &[u8]) -> Result<Cow<'_, str>, AppError> {
    let (encoding, bom_len) = Encoding::for_bom(bytes).unwrap_or((UTF_8, 0));
    encoding
        .decode_without_bom_handling_and_without_replacement(&bytes[bom_len..])
        .ok_or_else(|| {
            AppError::MalformedInput(format!(
                "File content is not valid {} text",
                encoding.name()
            ))
        })
}
