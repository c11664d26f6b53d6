//! Error types for the commission-core library.

use thiserror::Error;

/// Main error type for the commission library.
#[derive(Error, Debug)]
pub enum CommissionError {
    /// Voucher extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// Agent code list error.
    #[error("agent code error: {0}")]
    Codes(#[from] CodeError),

    /// Input file is not a voucher report.
    #[error("unsupported input file: {0} (expected .txt or .prt)")]
    UnsupportedInput(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised around voucher extraction.
///
/// The fold itself never fails; these cover setting up an aggregator and
/// admitting a document into it.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ExtractionError {
    /// The voucher marker is empty, which would split on every character.
    #[error("voucher marker must not be empty")]
    EmptyMarker,

    /// The document exceeds the configured size limit.
    #[error("document is {size} bytes, limit is {limit} bytes")]
    DocumentTooLarge { size: usize, limit: usize },
}

/// Errors related to agent code lists.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CodeError {
    /// No agent codes remained after trimming and dropping blanks.
    #[error("no agent codes provided")]
    Empty,
}

/// Result type for the commission library.
pub type Result<T, E = CommissionError> = std::result::Result<T, E>;
