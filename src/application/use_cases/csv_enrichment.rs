// ============================================================
// CSV ENRICHMENT USE CASE
// ============================================================
// Parse -> locate header -> normalize -> validate -> enrich -> write -> save

use std::path::PathBuf;

use tracing::{info, Instrument};
use uuid::Uuid;

use super::enrichment::{Cancellation, EnrichmentDriver};
use crate::domain::csv::{
    collect_worklist, column_position, normalize_columns, ExpectedSchema, ProcessingResult, Table,
    UploadedFile, DESCRIPTION_COLUMN,
};
use crate::domain::error::{AppError, Result};
use crate::infrastructure::csv::{CsvParser, CsvWriter};
use crate::infrastructure::storage::save_processed_csv;

/// A validated, normalized table ready for enrichment
#[derive(Debug, Clone)]
pub struct PreparedTable {
    pub table: Table,
    pub description_idx: usize,
}

pub struct CsvEnrichmentUseCase {
    driver: EnrichmentDriver,
    schema: ExpectedSchema,
    parser: CsvParser,
    writer: CsvWriter,
    output_dir: PathBuf,
}

impl CsvEnrichmentUseCase {
    pub fn new(driver: EnrichmentDriver, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            driver,
            schema: ExpectedSchema::default(),
            parser: CsvParser::new(),
            writer: CsvWriter::new(),
            output_dir: output_dir.into(),
        }
    }

    pub fn with_schema(mut self, schema: ExpectedSchema) -> Self {
        self.schema = schema;
        self
    }

    pub async fn execute(&self, file: &UploadedFile) -> Result<ProcessingResult> {
        self.execute_with_cancel(file, Cancellation::never()).await
    }

    pub async fn execute_with_cancel(
        &self,
        file: &UploadedFile,
        cancellation: Cancellation,
    ) -> Result<ProcessingResult> {
        let span = tracing::info_span!(
            "process_upload",
            upload_id = %Uuid::new_v4(),
            file_name = %file.file_name
        );
        self.run(file, cancellation).instrument(span).await
    }

    async fn run(
        &self,
        file: &UploadedFile,
        mut cancellation: Cancellation,
    ) -> Result<ProcessingResult> {
        file.ensure_processable()?;

        let PreparedTable {
            mut table,
            description_idx,
        } = self.prepare(&file.content)?;

        let mut worklist = collect_worklist(&table, description_idx);
        self.driver
            .enrich(&mut table, &mut worklist, description_idx, &mut cancellation)
            .await?;

        let content = self.writer.write_table(&table, description_idx)?;
        let saved = save_processed_csv(&self.output_dir, &file.file_name, &content).await?;

        info!(
            rows_processed = worklist.len(),
            path = %saved.display(),
            "Upload processed"
        );

        Ok(ProcessingResult {
            file_name: file.file_name.clone(),
            rows_processed: worklist.len(),
            descriptions: worklist.iter().map(|unit| unit.current().to_string()).collect(),
            updated_csv_content: content,
            saved_file_path: saved.display().to_string(),
        })
    }

    /// Every structural stage before any external call. Any failure here
    /// rejects the upload.
    pub fn prepare(&self, bytes: &[u8]) -> Result<PreparedTable> {
        let rows = self.parser.parse_bytes(bytes)?;
        let header_idx = self.schema.locate_header(&rows)?;

        let mut table = Table::new(rows);
        table.mark_header(header_idx)?;

        let (table, projection) = normalize_columns(&table)?;
        let header = table.header().ok_or(AppError::HeaderNotFound)?;
        self.schema.validate(header)?;

        let description_idx = column_position(header, DESCRIPTION_COLUMN).ok_or_else(|| {
            AppError::Internal(format!(
                "Column '{}' is missing from the expected schema",
                DESCRIPTION_COLUMN
            ))
        })?;

        info!(
            header_row = header_idx,
            columns = projection.len(),
            rows = table.len(),
            "Header located and columns normalized"
        );

        Ok(PreparedTable {
            table,
            description_idx,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::use_cases::enrichment::{TextExtractor, TracingObserver};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    const HEADER: &str = "Date,Description,Reference Number,Currency,Amount,Cr/Dr,Balance";

    #[derive(Default)]
    struct CountingExtractor {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl TextExtractor for CountingExtractor {
        async fn extract(&self, _prompt: &str) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok("John Acme".to_string())
        }
    }

    fn use_case(extractor: Arc<CountingExtractor>, output_dir: PathBuf) -> CsvEnrichmentUseCase {
        let driver = EnrichmentDriver::new(
            extractor,
            Arc::new(TracingObserver),
            "Find the name",
            "----",
            Duration::from_secs(5),
        );
        CsvEnrichmentUseCase::new(driver, output_dir)
    }

    #[test]
    fn test_prepare_locates_header_after_junk() {
        let tmp = tempfile::tempdir().unwrap();
        let uc = use_case(Arc::default(), tmp.path().to_path_buf());
        let csv = format!(
            "Account statement\nIBAN,AL00 0000\n{}\n2024-01-01,Fee,R1,ALL,5,Dr,95\n",
            HEADER
        );

        let prepared = uc.prepare(csv.as_bytes()).unwrap();
        assert_eq!(prepared.table.header_index(), Some(2));
        assert_eq!(prepared.description_idx, 1);
        assert!(prepared.table.rows().iter().all(|row| row.len() == 7));
    }

    #[test]
    fn test_prepare_dedups_before_validation() {
        let tmp = tempfile::tempdir().unwrap();
        let uc = use_case(Arc::default(), tmp.path().to_path_buf());
        let csv = "Date,Description,Reference Number,date,Currency,Amount,Cr/Dr,Balance\n\
                   2024-01-01,Fee,R1,dup,ALL,5,Dr,95\n";

        let prepared = uc.prepare(csv.as_bytes()).unwrap();
        let data = prepared.table.row(1).unwrap();
        assert_eq!(data.fields(), &["2024-01-01", "Fee", "R1", "ALL", "5", "Dr", "95"]);
    }

    #[test]
    fn test_prepare_fingerprint_match_but_schema_mismatch_fails_hard() {
        let tmp = tempfile::tempdir().unwrap();
        let uc = use_case(Arc::default(), tmp.path().to_path_buf());
        let csv = "Date,Description,Reference Number,Amount,Currency,Cr/Dr,Balance\n";

        assert!(matches!(
            uc.prepare(csv.as_bytes()),
            Err(AppError::SchemaMismatch { position: 4, .. })
        ));
    }

    #[test]
    fn test_prepare_dedup_can_leave_header_too_short() {
        let tmp = tempfile::tempdir().unwrap();
        let uc = use_case(Arc::default(), tmp.path().to_path_buf());
        let csv = "Date,Description,Reference Number,Currency,Amount,amount,balance\n";

        assert_eq!(
            uc.prepare(csv.as_bytes()).unwrap_err(),
            AppError::SchemaTooShort {
                expected: 7,
                found: 6
            }
        );
    }

    #[tokio::test]
    async fn test_header_not_found_makes_no_calls() {
        let tmp = tempfile::tempdir().unwrap();
        let extractor = Arc::new(CountingExtractor::default());
        let uc = use_case(extractor.clone(), tmp.path().join("uploads"));
        let file = UploadedFile::new("statement.csv", b"a,b,c\n1,2,3\n".to_vec());

        assert_eq!(uc.execute(&file).await.unwrap_err(), AppError::HeaderNotFound);
        assert_eq!(extractor.calls.load(Ordering::SeqCst), 0);
        assert!(!tmp.path().join("uploads").exists());
    }

    #[tokio::test]
    async fn test_rejects_non_csv_before_parsing() {
        let tmp = tempfile::tempdir().unwrap();
        let uc = use_case(Arc::default(), tmp.path().to_path_buf());
        let file = UploadedFile::new("statement.txt", HEADER.as_bytes().to_vec());

        assert_eq!(
            uc.execute(&file).await.unwrap_err(),
            AppError::InvalidInput("File must be a CSV file".to_string())
        );
    }

    #[tokio::test]
    async fn test_execute_with_cancel_before_start() {
        let tmp = tempfile::tempdir().unwrap();
        let extractor = Arc::new(CountingExtractor::default());
        let uc = use_case(extractor.clone(), tmp.path().join("uploads"));
        let csv = format!("{}\n2024-01-01,Fee,R1,ALL,5,Dr,95\n", HEADER);
        let file = UploadedFile::new("statement.csv", csv.into_bytes());

        let (handle, cancellation) = Cancellation::new();
        handle.cancel();

        assert_eq!(
            uc.execute_with_cancel(&file, cancellation).await.unwrap_err(),
            AppError::Cancelled
        );
        assert_eq!(extractor.calls.load(Ordering::SeqCst), 0);
        assert!(!tmp.path().join("uploads").exists());
    }
}
