//! Voucher splitting, extraction, and aggregation.

mod aggregator;
mod parser;
pub mod rules;
mod splitter;

pub use aggregator::{AggregationResult, AggregationStats, VoucherAggregator, aggregate};
pub use parser::{ParsedVoucher, RuleVoucherParser, VoucherParser};
pub use splitter::{VoucherSplitter, split_vouchers};
