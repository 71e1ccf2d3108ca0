// ============================================================
// CSV WRITER
// ============================================================
// Re-encode the header and retained data rows as delimited text

use crate::domain::csv::{is_qualifying_row, RawRow, Table};
use crate::domain::error::{AppError, Result};

/// Writes rows with minimal RFC-4180 quoting: a field is wrapped in quotes
/// only when it contains a comma, a double quote or a newline.
pub struct CsvWriter {
    delimiter: char,
    line_terminator: &'static str,
}

impl Default for CsvWriter {
    fn default() -> Self {
        Self {
            delimiter: ',',
            line_terminator: "\n",
        }
    }
}

impl CsvWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn escape_field(&self, field: &str) -> String {
        if field.contains(self.delimiter) || field.contains('"') || field.contains('\n') {
            format!("\"{}\"", field.replace('"', "\"\""))
        } else {
            field.to_string()
        }
    }

    pub fn format_row(&self, row: &RawRow) -> String {
        let delimiter = self.delimiter.to_string();
        row.fields()
            .iter()
            .map(|field| self.escape_field(field))
            .collect::<Vec<_>>()
            .join(&delimiter)
    }

    /// Serialize the header followed by every data row that still has a
    /// non-blank description. Other data rows are dropped.
    pub fn write_table(&self, table: &Table, description_idx: usize) -> Result<String> {
        let header = table.header().ok_or(AppError::HeaderNotFound)?;

        let mut content = String::new();
        content.push_str(&self.format_row(header));
        content.push_str(self.line_terminator);

        for (_, row) in table
            .data_rows()
            .filter(|(_, row)| is_qualifying_row(row, description_idx))
        {
            content.push_str(&self.format_row(row));
            content.push_str(self.line_terminator);
        }

        Ok(content)
    }
}
