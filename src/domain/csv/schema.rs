// ============================================================
// EXPECTED SCHEMA
// ============================================================
// Header fingerprinting, positional validation and named column lookup

use serde::{Deserialize, Serialize};

use super::{names_match, RawRow};
use crate::domain::error::{AppError, Result};

/// Column layout of a bank statement export
pub const STATEMENT_COLUMNS: [&str; 7] = [
    "Date",
    "Description",
    "Reference Number",
    "Currency",
    "Amount",
    "Cr/Dr",
    "Balance",
];

/// Column whose cells are sent out for enrichment
pub const DESCRIPTION_COLUMN: &str = "Description";

/// How many leading columns a row must match to be taken as the header
const FINGERPRINT_LEN: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpectedSchema {
    columns: Vec<String>,
    fingerprint_len: usize,
}

impl Default for ExpectedSchema {
    fn default() -> Self {
        Self::new(STATEMENT_COLUMNS.iter().map(|c| c.to_string()).collect())
    }
}

impl ExpectedSchema {
    pub fn new(columns: Vec<String>) -> Self {
        let fingerprint_len = FINGERPRINT_LEN.min(columns.len());
        Self {
            columns,
            fingerprint_len,
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// A row is a header candidate when it is at least as wide as the schema
    /// and its leading fingerprint columns match by name.
    pub fn matches_fingerprint(&self, row: &RawRow) -> bool {
        if row.len() < self.columns.len() {
            return false;
        }

        self.columns
            .iter()
            .take(self.fingerprint_len)
            .enumerate()
            .all(|(idx, expected)| row.get(idx).is_some_and(|cell| names_match(cell, expected)))
    }

    /// Index of the first row matching the fingerprint
    pub fn locate_header(&self, rows: &[RawRow]) -> Result<usize> {
        rows.iter()
            .position(|row| self.matches_fingerprint(row))
            .ok_or(AppError::HeaderNotFound)
    }

    /// Compare the leading columns of a normalized header positionally.
    pub fn validate(&self, header: &RawRow) -> Result<()> {
        if header.len() < self.columns.len() {
            return Err(AppError::SchemaTooShort {
                expected: self.columns.len(),
                found: header.len(),
            });
        }

        for (idx, expected) in self.columns.iter().enumerate() {
            let actual = header.get(idx).unwrap_or_default().trim();
            if !names_match(actual, expected) {
                return Err(AppError::SchemaMismatch {
                    position: idx + 1,
                    expected: expected.clone(),
                    actual: actual.to_string(),
                });
            }
        }

        Ok(())
    }
}

/// Position of a named column in a normalized header
pub fn column_position(header: &RawRow, name: &str) -> Option<usize> {
    header.fields().iter().position(|cell| names_match(cell, name))
}
