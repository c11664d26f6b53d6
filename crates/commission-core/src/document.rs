//! Loading voucher report files.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{CommissionError, Result};
use crate::models::config::ExtractionConfig;

/// File extensions voucher reports are exported with.
pub const REPORT_EXTENSIONS: [&str; 2] = ["txt", "prt"];

/// Whether `path` has a voucher report extension (case-insensitive).
pub fn is_report_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| REPORT_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Read a voucher report into memory.
///
/// The file must be a `.txt` or `.prt` report within the configured size
/// limit. Invalid UTF-8 sequences are replaced rather than rejected.
pub fn read_document(path: &Path, config: &ExtractionConfig) -> Result<String> {
    if !is_report_file(path) {
        return Err(CommissionError::UnsupportedInput(path.display().to_string()));
    }

    let size = fs::metadata(path)?.len() as usize;
    config.check_document_size(size)?;

    let bytes = fs::read(path)?;
    debug!("Read {} bytes from {}", bytes.len(), path.display());

    Ok(match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExtractionError;

    #[test]
    fn test_is_report_file() {
        assert!(is_report_file(Path::new("march.txt")));
        assert!(is_report_file(Path::new("MARCH.PRT")));
        assert!(!is_report_file(Path::new("march.pdf")));
        assert!(!is_report_file(Path::new("march")));
    }

    #[test]
    fn test_read_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.prt");
        fs::write(&path, "****Voucher 1\n").unwrap();

        let text = read_document(&path, &ExtractionConfig::default()).unwrap();
        assert_eq!(text, "****Voucher 1\n");
    }

    #[test]
    fn test_read_document_lossy_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.txt");
        fs::write(&path, b"Name \xff here").unwrap();

        let text = read_document(&path, &ExtractionConfig::default()).unwrap();
        assert!(text.starts_with("Name "));
        assert!(text.ends_with(" here"));
    }

    #[test]
    fn test_read_document_rejects_other_extensions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.csv");
        fs::write(&path, "x").unwrap();

        let err = read_document(&path, &ExtractionConfig::default()).unwrap_err();
        assert!(matches!(err, CommissionError::UnsupportedInput(_)));
    }

    #[test]
    fn test_read_document_size_limit() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.txt");
        fs::write(&path, "0123456789").unwrap();

        let config = ExtractionConfig {
            max_document_bytes: 4,
            ..ExtractionConfig::default()
        };
        let err = read_document(&path, &config).unwrap_err();
        assert!(matches!(
            err,
            CommissionError::Extraction(ExtractionError::DocumentTooLarge { size: 10, limit: 4 })
        ));
    }

    #[test]
    fn test_read_missing_document() {
        let err = read_document(Path::new("/nonexistent/report.txt"), &ExtractionConfig::default())
            .unwrap_err();
        assert!(matches!(err, CommissionError::Io(_)));
    }
}
