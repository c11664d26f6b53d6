//! Rule-based extractors for voucher sections.

pub mod credit;
pub mod fields;
pub mod identity;
pub mod patterns;

pub use credit::{CreditExtractor, extract_credit_total};
pub use fields::{DebitExtractor, FIELD_COUNT, FIELD_SPECS, FieldSpec, extract_debits};
pub use identity::{AgentIdentity, IdentityExtractor, extract_identity};

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the first occurrence of the field from text.
    fn extract(&self, text: &str) -> Option<Self::Output>;

    /// Extract all occurrences of the field.
    fn extract_all(&self, text: &str) -> Vec<Self::Output>;
}

/// A value extracted from a voucher together with where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Byte range in the voucher section.
    pub position: Option<(usize, usize)>,
    /// Source text that was matched.
    pub source: String,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, source: impl Into<String>) -> Self {
        Self {
            value,
            position: None,
            source: source.into(),
        }
    }

    pub fn with_position(mut self, start: usize, end: usize) -> Self {
        self.position = Some((start, end));
        self
    }
}
