//! Configuration structures for the commission tools.

use serde::{Deserialize, Serialize};

use crate::error::{CommissionError, ExtractionError, Result};
use crate::voucher::rules::patterns::VOUCHER_MARKER;

/// Main configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommissionConfig {
    /// Voucher extraction configuration.
    pub extraction: ExtractionConfig,

    /// Agent code input configuration.
    pub codes: CodesConfig,

    /// Report output configuration.
    pub output: OutputConfig,
}

/// Voucher extraction configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Literal text that starts every voucher section.
    pub voucher_marker: String,

    /// Largest document accepted, in bytes (0 = unlimited).
    pub max_document_bytes: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            voucher_marker: VOUCHER_MARKER.to_string(),
            max_document_bytes: 0,
        }
    }
}

impl ExtractionConfig {
    /// Reject documents above the configured size limit.
    pub fn check_document_size(&self, size: usize) -> Result<(), ExtractionError> {
        if self.max_document_bytes > 0 && size > self.max_document_bytes {
            return Err(ExtractionError::DocumentTooLarge {
                size,
                limit: self.max_document_bytes,
            });
        }
        Ok(())
    }
}

/// Agent code input configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodesConfig {
    /// Skip the first row of a code file.
    pub skip_header_row: bool,
}

impl Default for CodesConfig {
    fn default() -> Self {
        Self {
            skip_header_row: true,
        }
    }
}

/// Report output configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Text shown for fields that never matched.
    pub absent_placeholder: String,

    /// File name used when exporting without an explicit path.
    pub export_file_name: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            absent_placeholder: "-".to_string(),
            export_file_name: "agent_credit_totals.csv".to_string(),
        }
    }
}

impl CommissionConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }

    /// Load and validate configuration, falling back to defaults when no
    /// path is given.
    pub fn load(path: Option<&std::path::Path>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::from_file(path).map_err(|e| {
                CommissionError::Config(format!("{}: {}", path.display(), e))
            })?,
            None => Self::default(),
        };
        config
            .validate()
            .map_err(|e| CommissionError::Config(e.to_string()))?;
        Ok(config)
    }

    /// Check values that deserialize fine but cannot be used.
    pub fn validate(&self) -> Result<(), ExtractionError> {
        if self.extraction.voucher_marker.is_empty() {
            return Err(ExtractionError::EmptyMarker);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = CommissionConfig::default();
        assert_eq!(config.extraction.voucher_marker, "****Voucher ");
        assert_eq!(config.extraction.max_document_bytes, 0);
        assert!(config.codes.skip_header_row);
        assert_eq!(config.output.absent_placeholder, "-");
        assert_eq!(config.output.export_file_name, "agent_credit_totals.csv");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: CommissionConfig =
            serde_json::from_str(r#"{"output": {"absent_placeholder": "n/a"}}"#).unwrap();
        assert_eq!(config.output.absent_placeholder, "n/a");
        assert_eq!(config.output.export_file_name, "agent_credit_totals.csv");
        assert_eq!(config.extraction, ExtractionConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = CommissionConfig::default();
        config.extraction.max_document_bytes = 1024;
        config.codes.skip_header_row = false;
        config.save(&path).unwrap();

        assert_eq!(CommissionConfig::from_file(&path).unwrap(), config);
    }

    #[test]
    fn test_invalid_json_is_invalid_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = CommissionConfig::from_file(&path).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_load() {
        assert_eq!(CommissionConfig::load(None).unwrap(), CommissionConfig::default());

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"extraction": {"voucher_marker": ""}}"#).unwrap();

        let err = CommissionConfig::load(Some(&path)).unwrap_err();
        assert!(matches!(err, CommissionError::Config(_)));

        let missing = dir.path().join("missing.json");
        assert!(matches!(
            CommissionConfig::load(Some(&missing)).unwrap_err(),
            CommissionError::Config(_)
        ));
    }

    #[test]
    fn test_empty_marker_is_invalid() {
        let mut config = CommissionConfig::default();
        config.extraction.voucher_marker.clear();
        assert_eq!(config.validate(), Err(ExtractionError::EmptyMarker));
    }

    #[test]
    fn test_document_size_limit() {
        let mut extraction = ExtractionConfig::default();
        assert!(extraction.check_document_size(usize::MAX).is_ok());

        extraction.max_document_bytes = 10;
        assert!(extraction.check_document_size(10).is_ok());
        assert_eq!(
            extraction.check_document_size(11),
            Err(ExtractionError::DocumentTooLarge { size: 11, limit: 10 })
        );
    }
}
