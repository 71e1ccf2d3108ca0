// ============================================================
// COLUMN PROJECTION
// ============================================================
// Deduplicate header columns and re-slice every row onto them

use std::collections::HashSet;

use tracing::debug;

use super::{normalize_name, RawRow, Table};
use crate::domain::error::{AppError, Result};

/// Source-column indices kept after case-insensitive deduplication,
/// in their original relative order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnProjection {
    indices: Vec<usize>,
}

impl ColumnProjection {
    /// Walk the header left to right and keep the first occurrence of each name.
    /// Names are compared trimmed and case-insensitively.
    pub fn from_header(header: &RawRow) -> Self {
        let mut seen = HashSet::new();
        let indices = header
            .fields()
            .iter()
            .enumerate()
            .filter(|(_, name)| seen.insert(normalize_name(name)))
            .map(|(idx, _)| idx)
            .collect();

        Self { indices }
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Re-slice a row. Missing source cells become empty strings, so the
    /// result always has exactly `self.len()` fields.
    pub fn apply(&self, row: &RawRow) -> RawRow {
        RawRow::new(
            self.indices
                .iter()
                .map(|&idx| row.get(idx).unwrap_or_default().to_string())
                .collect(),
        )
    }
}

/// Project every row of `table` (header and data alike) onto the
/// deduplicated header columns.
pub fn normalize_columns(table: &Table) -> Result<(Table, ColumnProjection)> {
    let header = table.header().ok_or(AppError::HeaderNotFound)?;
    let projection = ColumnProjection::from_header(header);

    let normalized = table.map_rows(|row| projection.apply(row));
    for (idx, row) in normalized.rows().iter().enumerate() {
        debug!("Row {}: {}", idx + 1, row.fields().join(", "));
    }

    Ok((normalized, projection))
}
