use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime};
use tracing::info;

const PROCESSED_SUFFIX: &str = "_processed_";
const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Resolve the output directory against the process working directory.
pub fn resolve_output_dir(output_dir: &Path) -> std::io::Result<PathBuf> {
    if output_dir.is_absolute() {
        Ok(output_dir.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(output_dir))
    }
}

/// `<base>_processed_<yyyyMMdd_HHmmss><ext>`
pub fn processed_file_name(original_file_name: &str, timestamp: NaiveDateTime) -> String {
    let name = Path::new(original_file_name)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| original_file_name.to_string());

    let (base, extension) = match name.rfind('.') {
        Some(pos) => name.split_at(pos),
        None => (name.as_str(), ""),
    };

    format!(
        "{}{}{}{}",
        base,
        PROCESSED_SUFFIX,
        timestamp.format(TIMESTAMP_FORMAT),
        extension
    )
}

/// Write `content` under `output_dir`, creating it if needed, and return the
/// full path written. Same-second collisions overwrite.
pub async fn save_processed_csv(
    output_dir: &Path,
    original_file_name: &str,
    content: &str,
) -> std::io::Result<PathBuf> {
    let dir = resolve_output_dir(output_dir)?;
    ensure_dir(&dir).await?;

    let file_name = processed_file_name(original_file_name, Local::now().naive_local());
    let path = dir.join(file_name);
    tokio::fs::write(&path, content).await?;

    info!(path = %path.display(), bytes = content.len(), "Saved processed CSV");
    Ok(path)
}

async fn ensure_dir(path: &Path) -> std::io::Result<()> {
    if !tokio::fs::try_exists(path).await? {
        tokio::fs::create_dir_all(path).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn fixed_time() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 5)
            .unwrap()
            .and_hms_opt(9, 7, 2)
            .unwrap()
    }

    #[test]
    fn test_processed_file_name() {
        assert_eq!(
            processed_file_name("statement.csv", fixed_time()),
            "statement_processed_20240305_090702.csv"
        );
    }

    #[test]
    fn test_processed_file_name_keeps_inner_dots_and_drops_dirs() {
        assert_eq!(
            processed_file_name("exports/jan.2024.CSV", fixed_time()),
            "jan.2024_processed_20240305_090702.CSV"
        );
        assert_eq!(
            processed_file_name("noext", fixed_time()),
            "noext_processed_20240305_090702"
        );
    }

    #[tokio::test]
    async fn test_save_creates_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let out = tmp.path().join("uploads");

        let path = save_processed_csv(&out, "statement.csv", "Date\n")
            .await
            .unwrap();

        assert!(path.starts_with(&out));
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("statement_processed_"));
        assert!(name.ends_with(".csv"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "Date\n");
    }

    #[tokio::test]
    async fn test_save_fails_when_dir_is_a_file() {
        let tmp = tempfile::tempdir().unwrap();
        let blocker = tmp.path().join("uploads");
        std::fs::write(&blocker, "not a dir").unwrap();

        assert!(save_processed_csv(&blocker, "statement.csv", "x").await.is_err());
    }
}
