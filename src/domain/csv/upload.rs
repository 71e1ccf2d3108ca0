use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::domain::error::{AppError, Result};

pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// A named byte stream handed over by the upload boundary
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UploadedFile {
    #[validate(
        length(min = 1, message = "Please upload a file."),
        custom(function = "validate_csv_extension")
    )]
    pub file_name: String,
    #[validate(length(min = 1, message = "The uploaded file is empty."))]
    pub content: Vec<u8>,
}

impl UploadedFile {
    pub fn new(file_name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.into(),
            content: content.into(),
        }
    }

    /// Boundary validation against the configured size ceiling, reported
    /// with the first failing rule's message.
    pub fn check(&self, max_bytes: u64) -> Result<()> {
        self.validate()
            .map_err(|errors| AppError::InvalidInput(first_message(&errors)))?;
        if self.content.len() as u64 > max_bytes {
            return Err(upload_too_large(max_bytes));
        }
        Ok(())
    }

    /// Minimal re-check the pipeline performs regardless of what the caller did.
    pub fn ensure_processable(&self) -> Result<()> {
        if self.content.is_empty() {
            return Err(AppError::InvalidInput("File is empty or null".to_string()));
        }
        if !has_csv_extension(&self.file_name) {
            return Err(AppError::InvalidInput("File must be a CSV file".to_string()));
        }
        Ok(())
    }
}

pub fn upload_too_large(max_bytes: u64) -> AppError {
    let limit = if max_bytes % (1024 * 1024) == 0 {
        format!("{} MB", max_bytes / (1024 * 1024))
    } else {
        format!("{} bytes", max_bytes)
    };
    AppError::InvalidInput(format!("The file is larger than the {} limit.", limit))
}

pub fn has_csv_extension(file_name: &str) -> bool {
    file_name.to_lowercase().ends_with(".csv")
}

fn validate_csv_extension(file_name: &str) -> std::result::Result<(), ValidationError> {
    if has_csv_extension(file_name) {
        Ok(())
    } else {
        let mut err = ValidationError::new("extension");
        err.message = Some("Unsupported file type. Only .csv files are allowed.".into());
        Err(err)
    }
}

fn first_message(errors: &ValidationErrors) -> String {
    let fields = errors.field_errors();
    ["file_name", "content"]
        .iter()
        .filter_map(|name| fields.get(*name))
        .flat_map(|errs| errs.iter())
        .find_map(|err| err.message.as_ref().map(|m| m.to_string()))
        .unwrap_or_else(|| errors.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_upload() {
        let file = UploadedFile::new("statement.CSV", b"a,b\n".to_vec());
        assert!(file.check(MAX_UPLOAD_BYTES).is_ok());
        assert!(file.ensure_processable().is_ok());
    }

    #[test]
    fn test_wrong_extension() {
        let file = UploadedFile::new("statement.xlsx", b"a,b\n".to_vec());
        assert_eq!(
            file.check(MAX_UPLOAD_BYTES).unwrap_err(),
            AppError::InvalidInput("Unsupported file type. Only .csv files are allowed.".into())
        );
        assert_eq!(
            file.ensure_processable().unwrap_err(),
            AppError::InvalidInput("File must be a CSV file".into())
        );
    }

    #[test]
    fn test_empty_content() {
        let file = UploadedFile::new("statement.csv", Vec::new());
        assert_eq!(
            file.check(MAX_UPLOAD_BYTES).unwrap_err(),
            AppError::InvalidInput("The uploaded file is empty.".into())
        );
        assert_eq!(
            file.ensure_processable().unwrap_err(),
            AppError::InvalidInput("File is empty or null".into())
        );
    }

    #[test]
    fn test_oversized_content() {
        let file = UploadedFile::new("big.csv", vec![b'a'; MAX_UPLOAD_BYTES as usize + 1]);
        assert_eq!(
            file.check(MAX_UPLOAD_BYTES).unwrap_err(),
            AppError::InvalidInput("The file is larger than the 10 MB limit.".into())
        );
    }

    #[test]
    fn test_raised_ceiling_accepts_larger_files() {
        let file = UploadedFile::new("big.csv", vec![b'a'; 12 * 1024 * 1024]);
        assert!(file.check(MAX_UPLOAD_BYTES).is_err());
        assert!(file.check(20 * 1024 * 1024).is_ok());
    }

    #[test]
    fn test_lowered_ceiling_is_exact() {
        let file = UploadedFile::new("small.csv", vec![b'a'; 100]);
        assert!(file.check(100).is_ok());
        assert_eq!(
            file.check(99).unwrap_err(),
            AppError::InvalidInput("The file is larger than the 99 bytes limit.".into())
        );
    }
}
