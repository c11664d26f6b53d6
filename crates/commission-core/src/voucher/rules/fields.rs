//! Tracked debit fields and their extraction.

use rust_decimal::Decimal;
use std::str::FromStr;
use tracing::warn;

use super::patterns::DEBIT_ROWS;
use super::{ExtractionMatch, FieldExtractor};

/// Number of tracked debit fields.
pub const FIELD_COUNT: usize = 7;

/// A named rule locating one debit amount among a voucher's line items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Column name in the report.
    pub name: &'static str,
    /// Numeric line-item code.
    pub code: &'static str,
    /// Label text printed next to the code.
    pub label: &'static str,
}

impl FieldSpec {
    const fn new(name: &'static str, code: &'static str, label: &'static str) -> Self {
        Self { name, code, label }
    }

    /// Position of the named field in [`FIELD_SPECS`].
    pub fn index_of(name: &str) -> Option<usize> {
        FIELD_SPECS.iter().position(|spec| spec.name == name)
    }
}

/// Tracked fields, in report column order.
pub const FIELD_SPECS: [FieldSpec; FIELD_COUNT] = [
    FieldSpec::new("First_Comm_Participating", "11272100", "First Comm Participating"),
    FieldSpec::new("First_Year_Comm_Participating", "11270600", "First Year Comm Participating"),
    FieldSpec::new("Bonus_Comm_Participating", "11271200", "Bonus Comm Participating"),
    FieldSpec::new("Renewal_Comm_Participating", "11273100", "Renewal Comm Participating"),
    FieldSpec::new("Comm_Other_FY_Prem", "96270600", "Comm. on Other FY Prem. to Agents(873)"),
    FieldSpec::new("Bonus_Comm_Agents", "96271100", "Bonus Comm. to Agents(873)"),
    FieldSpec::new("Income_Tax", "11110300", "Income Tax"),
];

/// Debit extractor for a single tracked field.
pub struct DebitExtractor {
    index: usize,
}

impl DebitExtractor {
    /// Create an extractor for the field at `index` in [`FIELD_SPECS`].
    ///
    /// Returns `None` when the index is out of range.
    pub fn new(index: usize) -> Option<Self> {
        (index < FIELD_COUNT).then_some(Self { index })
    }

    /// The field this extractor looks for.
    pub fn spec(&self) -> &'static FieldSpec {
        &FIELD_SPECS[self.index]
    }
}

impl FieldExtractor for DebitExtractor {
    type Output = ExtractionMatch<Decimal>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        let caps = DEBIT_ROWS[self.index].captures(text)?;
        let full_match = caps.get(0)?;
        let amount = parse_amount(&caps[1])?;
        Some(
            ExtractionMatch::new(amount, full_match.as_str())
                .with_position(full_match.start(), full_match.end()),
        )
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        DEBIT_ROWS[self.index]
            .captures_iter(text)
            .filter_map(|caps| {
                let full_match = caps.get(0)?;
                let amount = parse_amount(&caps[1])?;
                Some(
                    ExtractionMatch::new(amount, full_match.as_str())
                        .with_position(full_match.start(), full_match.end()),
                )
            })
            .collect()
    }
}

/// Extract the first debit amount of every tracked field from a voucher section.
///
/// The result is indexed like [`FIELD_SPECS`]; `None` means the field's row is
/// not present in this voucher.
pub fn extract_debits(text: &str) -> [Option<Decimal>; FIELD_COUNT] {
    let mut debits = [None; FIELD_COUNT];
    for (index, slot) in debits.iter_mut().enumerate() {
        *slot = DebitExtractor { index }.extract(text).map(|m| m.value);
    }
    debits
}

/// Parse an amount already constrained to `[0-9]+\.[0-9]+`.
///
/// Only a value outside the decimal range can fail here; it is logged and
/// treated as not found.
pub(crate) fn parse_amount(s: &str) -> Option<Decimal> {
    match Decimal::from_str(s) {
        Ok(amount) => Some(amount),
        Err(e) => {
            warn!("Ignoring amount {} outside decimal range: {}", s, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_field_specs_are_unique() {
        for (i, a) in FIELD_SPECS.iter().enumerate() {
            for b in &FIELD_SPECS[i + 1..] {
                assert_ne!(a.name, b.name);
                assert_ne!(a.code, b.code);
            }
        }
        assert_eq!(FieldSpec::index_of("Income_Tax"), Some(6));
        assert_eq!(FieldSpec::index_of("Unknown"), None);
    }

    #[test]
    fn test_extract_debits_tolerates_whitespace() {
        let text = "|11272100|First Comm Participating|150.00|150.00|\n\
                    |   11110300   |   Income Tax   |   12.50   |   0.00   |";
        let debits = extract_debits(text);

        assert_eq!(debits[0], Some(dec("150.00")));
        assert_eq!(debits[6], Some(dec("12.50")));
        assert!(debits[1..6].iter().all(Option::is_none));
    }

    #[test]
    fn test_first_match_only_within_voucher() {
        let text = "| 11272100 | First Comm Participating | 10.00 | 0.00 |\n\
                    | 11272100 | First Comm Participating | 99.00 | 0.00 |";

        assert_eq!(extract_debits(text)[0], Some(dec("10.00")));

        let extractor = DebitExtractor::new(0).unwrap();
        assert_eq!(extractor.extract_all(text).len(), 2);
    }

    #[test]
    fn test_label_with_punctuation_is_literal() {
        let text = "| 96270600 | Comm. on Other FY Prem. to Agents(873) | 75.25 | 0.00 |";
        assert_eq!(extract_debits(text)[4], Some(dec("75.25")));

        // '.' in the label must not act as a wildcard
        let text = "| 96270600 | CommX on Other FY Prem. to Agents(873) | 75.25 | 0.00 |";
        assert_eq!(extract_debits(text)[4], None);
    }

    #[test]
    fn test_code_and_label_must_both_match() {
        let text = "| 11270600 | First Comm Participating | 40.00 | 0.00 |";
        let debits = extract_debits(text);
        assert_eq!(debits[0], None);
        assert_eq!(debits[1], None);
    }

    #[test]
    fn test_amount_requires_decimal_point() {
        let text = "| 11110300 | Income Tax | 12 | 0.00 |";
        assert_eq!(extract_debits(text)[6], None);

        let text = "| 11110300 | Income Tax | 1,200.00 | 0.00 |";
        assert_eq!(extract_debits(text)[6], None);
    }

    #[test]
    fn test_extract_reports_position() {
        let text = "xx| 11110300 | Income Tax | 3.00 | 0.00 |";
        let m = DebitExtractor::new(6).unwrap().extract(text).unwrap();
        assert_eq!(m.position.map(|p| p.0), Some(2));
        assert!(m.source.starts_with("| 11110300"));
        assert!(DebitExtractor::new(FIELD_COUNT).is_none());
    }
}
