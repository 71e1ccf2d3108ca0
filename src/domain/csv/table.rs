// ============================================================
// TABLE TYPES
// ============================================================
// Raw rows as parsed from an upload, plus the located header marker

use serde::{Deserialize, Serialize};

use crate::domain::error::{AppError, Result};

/// One physical record, fields in file order
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RawRow {
    fields: Vec<String>,
}

impl RawRow {
    pub fn new(fields: Vec<String>) -> Self {
        Self { fields }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.fields.get(index).map(String::as_str)
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// A copy of this row with one cell swapped out. Out of range is a no-op.
    pub fn with_field(&self, index: usize, value: impl Into<String>) -> Self {
        let mut fields = self.fields.clone();
        if let Some(cell) = fields.get_mut(index) {
            *cell = value.into();
        }
        Self { fields }
    }

    /// True when every field is empty after trimming
    pub fn is_blank(&self) -> bool {
        self.fields.iter().all(|f| f.trim().is_empty())
    }
}

impl From<Vec<String>> for RawRow {
    fn from(fields: Vec<String>) -> Self {
        Self::new(fields)
    }
}

impl From<Vec<&str>> for RawRow {
    fn from(fields: Vec<&str>) -> Self {
        Self::new(fields.into_iter().map(str::to_string).collect())
    }
}

/// Ordered rows addressed by index, with an optional header marker.
///
/// Rows are never edited in place: enrichment swaps a whole new
/// [`RawRow`] into its slot via [`Table::replace_row`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Table {
    rows: Vec<RawRow>,
    header_index: Option<usize>,
}

impl Table {
    pub fn new(rows: Vec<RawRow>) -> Self {
        Self {
            rows,
            header_index: None,
        }
    }

    pub fn rows(&self) -> &[RawRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, index: usize) -> Option<&RawRow> {
        self.rows.get(index)
    }

    pub fn header_index(&self) -> Option<usize> {
        self.header_index
    }

    pub fn header(&self) -> Option<&RawRow> {
        self.header_index.and_then(|idx| self.rows.get(idx))
    }

    /// Set the header marker. It can be set once and must point at an existing row.
    pub fn mark_header(&mut self, index: usize) -> Result<()> {
        if index >= self.rows.len() {
            return Err(AppError::Internal(format!(
                "Header index {} is out of range for {} rows",
                index,
                self.rows.len()
            )));
        }
        match self.header_index {
            Some(existing) if existing != index => Err(AppError::Internal(format!(
                "Header already located at row {}",
                existing
            ))),
            _ => {
                self.header_index = Some(index);
                Ok(())
            }
        }
    }

    /// Rows after the header, with their table index
    pub fn data_rows(&self) -> impl Iterator<Item = (usize, &RawRow)> {
        let start = self.header_index.map(|idx| idx + 1).unwrap_or(self.rows.len());
        self.rows.iter().enumerate().skip(start)
    }

    /// Swap in a new row value at `index`. Returns the previous value.
    pub fn replace_row(&mut self, index: usize, row: RawRow) -> Option<RawRow> {
        self.rows
            .get_mut(index)
            .map(|slot| std::mem::replace(slot, row))
    }

    /// Build a new table from mapped rows, keeping the header marker.
    pub fn map_rows<F>(&self, f: F) -> Table
    where
        F: FnMut(&RawRow) -> RawRow,
    {
        Table {
            rows: self.rows.iter().map(f).collect(),
            header_index: self.header_index,
        }
    }
}
