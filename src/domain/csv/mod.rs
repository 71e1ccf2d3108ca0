// ============================================================
// CSV DOMAIN LAYER
// ============================================================
// Core types and structural stages for statement ingest
// No I/O, no async

mod column_projection;
mod processing_result;
mod schema;
mod table;
mod upload;

pub use column_projection::{normalize_columns, ColumnProjection};
pub use processing_result::{EnrichmentUnit, ProcessingResult};
pub use schema::{column_position, ExpectedSchema, DESCRIPTION_COLUMN, STATEMENT_COLUMNS};
pub use table::{RawRow, Table};
pub use upload::{has_csv_extension, upload_too_large, UploadedFile, MAX_UPLOAD_BYTES};

/// Canonical form used for case-insensitive column name comparison
pub(crate) fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

pub(crate) fn names_match(a: &str, b: &str) -> bool {
    normalize_name(a) == normalize_name(b)
}

/// A data row qualifies for enrichment when it has more than one field and
/// a non-blank description cell.
pub fn is_qualifying_row(row: &RawRow, description_idx: usize) -> bool {
    row.len() > 1
        && row
            .get(description_idx)
            .is_some_and(|cell| !cell.trim().is_empty())
}

/// Build the enrichment worklist in a single forward pass over the data rows.
pub fn collect_worklist(table: &Table, description_idx: usize) -> Vec<EnrichmentUnit> {
    table
        .data_rows()
        .filter(|(_, row)| is_qualifying_row(row, description_idx))
        .map(|(idx, row)| {
            EnrichmentUnit::new(idx, row.get(description_idx).unwrap_or_default().trim())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_worklist_skips_blank_descriptions() {
        let mut table = Table::new(vec![
            RawRow::from(vec!["Date", "Description"]),
            RawRow::from(vec!["2024-01-01", "  Payment to Ana Hoxha "]),
            RawRow::from(vec!["2024-01-02", "   "]),
            RawRow::from(vec!["lonely"]),
            RawRow::from(vec!["2024-01-03", "Fee"]),
        ]);
        table.mark_header(0).unwrap();

        let worklist = collect_worklist(&table, 1);
        let picked: Vec<(usize, &str)> = worklist
            .iter()
            .map(|u| (u.row_index, u.original.as_str()))
            .collect();
        assert_eq!(picked, vec![(1, "Payment to Ana Hoxha"), (4, "Fee")]);
    }

    #[test]
    fn test_names_match_trims_and_ignores_case() {
        assert!(names_match(" Cr/Dr ", "cr/dr"));
        assert!(!names_match("Amount", "Amounts"));
    }
}
