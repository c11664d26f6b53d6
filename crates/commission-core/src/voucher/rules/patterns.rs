//! Common regex patterns for voucher extraction.

use lazy_static::lazy_static;
use regex::Regex;

use super::fields::{FIELD_SPECS, FieldSpec};

/// Marker that opens every voucher section in a report.
pub const VOUCHER_MARKER: &str = "****Voucher ";

lazy_static! {
    // Agent identity: `Agency Code/Name : AB123(John Doe)`
    pub static ref AGENT_IDENTITY: Regex = Regex::new(
        r"Agency Code/Name\s*:\s*([A-Za-z0-9]+)\s*\((.*?)\)"
    ).unwrap();

    // Any four-cell line item; group 1 is the credit cell. ASCII digits only.
    pub static ref CREDIT_ROW: Regex = Regex::new(
        r"\|\s*[0-9]+\s*\|\s*.*?\s*\|\s*[0-9]+\.[0-9]+\s*\|\s*([0-9]+\.[0-9]+)\s*\|"
    ).unwrap();

    // One debit pattern per tracked field, in FIELD_SPECS order
    pub static ref DEBIT_ROWS: Vec<Regex> = FIELD_SPECS
        .iter()
        .map(|spec| Regex::new(&debit_pattern(spec)).unwrap())
        .collect();
}

/// Build the debit-row pattern for a field: `| <code> | <label> | <amount> |`.
pub fn debit_pattern(spec: &FieldSpec) -> String {
    format!(
        r"\|\s*{}\s*\|\s*{}\s*\|\s*([0-9]+\.[0-9]+)\s*\|",
        regex::escape(spec.code),
        regex::escape(spec.label)
    )
}
