//! Per-agent aggregation over a whole report.

use std::collections::HashSet;
use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info};

use crate::error::ExtractionError;
use crate::models::config::ExtractionConfig;
use crate::models::totals::CommissionReport;

use super::parser::{RuleVoucherParser, VoucherParser};
use super::splitter::VoucherSplitter;

/// Counters describing one aggregation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AggregationStats {
    /// Sections produced by the splitter, preamble included.
    pub sections: usize,
    /// Sections without an agent identity line.
    pub without_identity: usize,
    /// Sections whose agent was not requested.
    pub filtered_out: usize,
    /// Sections folded into the report.
    pub matched_vouchers: usize,
}

impl AggregationStats {
    /// Add another run's counters.
    pub fn merge(&mut self, other: &AggregationStats) {
        self.sections += other.sections;
        self.without_identity += other.without_identity;
        self.filtered_out += other.filtered_out;
        self.matched_vouchers += other.matched_vouchers;
    }
}

/// Result of aggregating one document.
#[derive(Debug, Clone)]
pub struct AggregationResult {
    /// Per-agent totals.
    pub report: CommissionReport,
    /// Run counters.
    pub stats: AggregationStats,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

/// Folds voucher sections into per-agent totals.
///
/// Holds no state between calls; every `aggregate` builds a fresh report.
#[derive(Debug, Clone, Default)]
pub struct VoucherAggregator<P = RuleVoucherParser> {
    splitter: VoucherSplitter,
    parser: P,
}

impl VoucherAggregator {
    /// Aggregator with the standard marker and rules.
    pub fn new() -> Self {
        Self::default()
    }

    /// Aggregator splitting on a custom voucher marker.
    pub fn with_marker(marker: impl Into<String>) -> Result<Self, ExtractionError> {
        Ok(Self {
            splitter: VoucherSplitter::new(marker)?,
            parser: RuleVoucherParser::new(),
        })
    }

    /// Aggregator configured from the extraction settings.
    pub fn from_config(config: &ExtractionConfig) -> Result<Self, ExtractionError> {
        Self::with_marker(config.voucher_marker.as_str())
    }
}

impl<P: VoucherParser> VoucherAggregator<P> {
    /// Aggregator using a custom section parser.
    pub fn with_parser(splitter: VoucherSplitter, parser: P) -> Self {
        Self { splitter, parser }
    }

    pub fn marker(&self) -> &str {
        self.splitter.marker()
    }

    /// Aggregate every voucher of `document` whose agent code is in `codes`.
    ///
    /// Codes are compared exactly, without case or zero-padding
    /// normalization.
    pub fn aggregate(&self, document: &str, codes: &HashSet<String>) -> AggregationResult {
        let start = start_timer();
        let mut report = CommissionReport::new();
        let mut stats = AggregationStats::default();

        info!(
            "Aggregating {} characters of text for {} agent codes",
            document.len(),
            codes.len()
        );

        for section in self.splitter.sections(document) {
            stats.sections += 1;

            let Some(identity) = self.parser.identify(section) else {
                stats.without_identity += 1;
                continue;
            };

            if !codes.contains(&identity.code) {
                stats.filtered_out += 1;
                continue;
            }

            let amounts = self.parser.amounts(section);
            debug!(
                "Voucher for {} ({}): {} tracked fields, debit {}, credit {}",
                identity.code,
                identity.name,
                amounts.matched_fields(),
                amounts.debit_sum(),
                amounts.credit_total
            );

            report.entry(&identity.code, &identity.name).record(&amounts);
            stats.matched_vouchers += 1;
        }

        debug!(
            "Aggregated {} vouchers for {} agents ({} sections, {} without identity, {} filtered out)",
            stats.matched_vouchers,
            report.len(),
            stats.sections,
            stats.without_identity,
            stats.filtered_out
        );

        AggregationResult {
            report,
            stats,
            processing_time_ms: start.map_or(0, |start| start.elapsed().as_millis() as u64),
        }
    }
}

// No clock on wasm32-unknown-unknown
#[cfg(not(target_arch = "wasm32"))]
fn start_timer() -> Option<Instant> {
    Some(Instant::now())
}

#[cfg(target_arch = "wasm32")]
fn start_timer() -> Option<Instant> {
    None
}

/// Aggregate `document` for the agent codes in `codes` with the standard rules.
pub fn aggregate(document: &str, codes: &HashSet<String>) -> CommissionReport {
    VoucherAggregator::new().aggregate(document, codes).report
}
