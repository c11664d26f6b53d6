//! Agent code list handling.
//!
//! Codes arrive as a single entry, a comma-separated list, or the first
//! column of a table. All three end up as the exact-match set the
//! aggregator filters on.

use std::collections::HashSet;

use tracing::warn;

use crate::error::CodeError;

/// Parse a single code, trimming surrounding whitespace.
pub fn parse_single_code(text: &str) -> Option<String> {
    let code = text.trim();
    (!code.is_empty()).then(|| code.to_string())
}

/// Parse a comma-separated list of codes.
///
/// Entries are trimmed and blank entries dropped. Order is preserved and
/// duplicates are kept; [`code_set`] removes them.
pub fn parse_code_list(text: &str) -> Vec<String> {
    text.split(',').filter_map(parse_single_code).collect()
}

/// Take codes from the first column of table rows.
///
/// When `skip_header` is set the first row is treated as a header. Blank
/// cells are dropped.
pub fn codes_from_column<I, S>(first_column: I, skip_header: bool) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    first_column
        .into_iter()
        .skip(usize::from(skip_header))
        .filter_map(|cell| parse_single_code(cell.as_ref()))
        .collect()
}

/// Build the filter set, rejecting an empty one.
///
/// Codes that can never appear on an `Agency Code/Name` line are kept but
/// logged, since matching is exact.
pub fn code_set<I>(codes: I) -> Result<HashSet<String>, CodeError>
where
    I: IntoIterator<Item = String>,
{
    let set: HashSet<String> = codes.into_iter().collect();
    if set.is_empty() {
        return Err(CodeError::Empty);
    }

    for code in &set {
        if !code.chars().all(|c| c.is_ascii_alphanumeric()) {
            warn!("Agent code {:?} is not alphanumeric and will never match", code);
        }
    }

    Ok(set)
}
