//! Rule-based voucher section parser.

use tracing::trace;

use crate::models::totals::VoucherAmounts;

use super::rules::{AgentIdentity, extract_credit_total, extract_debits, extract_identity};

/// A voucher section that carried an agent identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedVoucher {
    /// Agent the voucher belongs to.
    pub identity: AgentIdentity,
    /// Amounts found in the voucher's line items.
    pub amounts: VoucherAmounts,
}

/// Trait for voucher section parsing.
pub trait VoucherParser {
    /// Parse the agent identity of a section.
    ///
    /// Returns `None` for sections without an `Agency Code/Name` line.
    fn identify(&self, section: &str) -> Option<AgentIdentity>;

    /// Extract the tracked debits and the credit total of a section.
    fn amounts(&self, section: &str) -> VoucherAmounts;

    /// Parse a whole section.
    fn parse(&self, section: &str) -> Option<ParsedVoucher> {
        let identity = self.identify(section)?;
        let amounts = self.amounts(section);
        Some(ParsedVoucher { identity, amounts })
    }
}

/// Parser built on the fixed regex rules.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleVoucherParser;

impl RuleVoucherParser {
    pub fn new() -> Self {
        Self
    }
}

impl VoucherParser for RuleVoucherParser {
    fn identify(&self, section: &str) -> Option<AgentIdentity> {
        extract_identity(section)
    }

    fn amounts(&self, section: &str) -> VoucherAmounts {
        let amounts = VoucherAmounts {
            debits: extract_debits(section),
            credit_total: extract_credit_total(section),
        };
        trace!(
            "Voucher has {} tracked fields, credit total {}",
            amounts.matched_fields(),
            amounts.credit_total
        );
        amounts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    #[test]
    fn test_parse_voucher() {
        let section = r#"1234 dated 01/04/2024
Agency Code/Name : AB123(John Doe)
| Code | Description | Dr. Amount | Cr. Amount |
| 11272100 | First Comm Participating | 150.00 | 150.00 |
| 99999999 | Other Row | 20.00 | 20.00 |
"#;
        let parsed = RuleVoucherParser::new().parse(section).unwrap();

        assert_eq!(parsed.identity.code, "AB123");
        assert_eq!(parsed.identity.name, "John Doe");
        assert_eq!(parsed.amounts.debits[0], Some(Decimal::from_str("150.00").unwrap()));
        assert_eq!(parsed.amounts.matched_fields(), 1);
        assert_eq!(parsed.amounts.debit_sum(), Decimal::from_str("150.00").unwrap());
        assert_eq!(parsed.amounts.credit_total, Decimal::from_str("170.00").unwrap());
    }

    #[test]
    fn test_section_without_identity_is_not_parsed() {
        let section = "| 11272100 | First Comm Participating | 150.00 | 150.00 |";
        assert_eq!(RuleVoucherParser::new().parse(section), None);
    }
}
