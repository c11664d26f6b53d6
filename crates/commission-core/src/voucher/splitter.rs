//! Splitting a report into voucher sections.

use crate::error::ExtractionError;

use super::rules::patterns::VOUCHER_MARKER;

/// Splits report text on a literal voucher marker.
///
/// The marker itself is dropped. Text before the first marker (the report
/// preamble) comes out as the leading section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoucherSplitter {
    marker: String,
}

impl VoucherSplitter {
    /// Create a splitter for a custom marker.
    pub fn new(marker: impl Into<String>) -> Result<Self, ExtractionError> {
        let marker = marker.into();
        if marker.is_empty() {
            return Err(ExtractionError::EmptyMarker);
        }
        Ok(Self { marker })
    }

    /// The marker sections are split on.
    pub fn marker(&self) -> &str {
        &self.marker
    }

    /// Lazily yield the sections of `text`, in document order.
    pub fn sections<'a>(&'a self, text: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        text.split(self.marker.as_str())
    }
}

impl Default for VoucherSplitter {
    fn default() -> Self {
        Self {
            marker: VOUCHER_MARKER.to_string(),
        }
    }
}

/// Split `text` on the standard voucher marker.
pub fn split_vouchers(text: &str) -> impl Iterator<Item = &str> {
    text.split(VOUCHER_MARKER)
}
