//! Data models for commission reports.

pub mod config;
pub mod totals;

pub use config::{CodesConfig, CommissionConfig, ExtractionConfig, OutputConfig};
pub use totals::{AgentTotals, CommissionReport, FieldTotal, VoucherAmounts, report_columns};
