//! Core library for agent commission voucher reports.
//!
//! This crate provides:
//! - Splitting a plain-text voucher report into voucher sections
//! - Rule-based extraction of agent identity, tracked debit fields, and credit amounts
//! - Per-agent aggregation with absent-until-matched field totals
//! - Agent code list parsing and configuration models

pub mod codes;
pub mod document;
pub mod error;
pub mod models;
pub mod voucher;

pub use codes::{code_set, codes_from_column, parse_code_list, parse_single_code};
pub use document::{is_report_file, read_document};
pub use error::{CodeError, CommissionError, ExtractionError, Result};
pub use models::config::CommissionConfig;
pub use models::totals::{
    AgentTotals, CommissionReport, FieldTotal, VoucherAmounts, report_columns,
};
pub use rust_decimal::Decimal;
pub use voucher::rules::{FIELD_COUNT, FIELD_SPECS, FieldSpec};
pub use voucher::{
    AggregationResult, AggregationStats, RuleVoucherParser, VoucherAggregator, VoucherParser,
    aggregate,
};
