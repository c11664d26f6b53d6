//! Credit amount extraction.
//!
//! Every four-cell line item contributes its credit cell, whether or not the
//! row is one of the tracked debit fields.

use rust_decimal::Decimal;

use crate::models::totals::accumulate;

use super::fields::parse_amount;
use super::patterns::CREDIT_ROW;
use super::{ExtractionMatch, FieldExtractor};

/// Credit cell extractor.
pub struct CreditExtractor;

impl CreditExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CreditExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for CreditExtractor {
    type Output = ExtractionMatch<Decimal>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        CREDIT_ROW
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

/// Sum of every credit cell in a voucher section.
pub fn extract_credit_total(text: &str) -> Decimal {
    CreditExtractor::new()
        .extract_all(text)
        .into_iter()
        .fold(Decimal::ZERO, |total, m| accumulate(total, m.value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_credit_total_counts_every_row() {
        let text = r#"
| 11272100 | First Comm Participating | 150.00 | 150.00 |
| 99999999 | Other Row | 20.00 | 20.00 |
"#;
        assert_eq!(extract_credit_total(text), dec("170.00"));
    }

    #[test]
    fn test_rows_without_decimal_cells_are_skipped() {
        let text = r#"
| Code | Description | Dr. Amount | Cr. Amount |
| 11110300 | Income Tax | 12.00 | 0.00 |
| 11110300 | Income Tax | 12.00 | - |
"#;
        let rows = CreditExtractor::new().extract_all(text);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].value, dec("0.00"));
    }

    #[test]
    fn test_credit_total_drops_overflowing_cell() {
        let text = r#"
| 11110300 | Income Tax | 1.00 | 79228162514264337593543950335.00 |
| 99999999 | Other Row | 1.00 | 79228162514264337593543950335.00 |
"#;
        assert_eq!(extract_credit_total(text), Decimal::MAX);
    }

    #[test]
    fn test_non_ascii_digits_do_not_match() {
        let text = "| 11110300 | Income Tax | 1.00 | \u{0661}\u{0662}.\u{0660}\u{0660} |";
        assert!(CreditExtractor::new().extract_all(text).is_empty());
        assert_eq!(extract_credit_total(text), Decimal::ZERO);
    }

    #[test]
    fn test_credit_total_empty_section() {
        assert_eq!(extract_credit_total("no rows here"), Decimal::ZERO);
    }
}
