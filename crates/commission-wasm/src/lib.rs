//! WASM bindings for agent commission voucher reports.
//!
//! Exposes the aggregator to browsers and Node.js. Reports come back as plain
//! objects keyed by agent code, with amounts as decimal strings and absent
//! fields as `null`.

use std::collections::HashSet;

use js_sys::Array;
use serde::Serialize;
use wasm_bindgen::prelude::*;

use commission_core::{
    AggregationStats, CommissionReport, VoucherAggregator, code_set, report_columns,
};

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Version information.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Plain objects instead of JS `Map`s.
fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(js_error)
}

/// Collect the string entries of a JS array into a code filter.
fn codes_from_array(codes: &Array) -> Result<HashSet<String>, JsValue> {
    let codes = codes
        .iter()
        .filter_map(|value| value.as_string())
        .filter_map(|code| commission_core::parse_single_code(&code));
    code_set(codes).map_err(js_error)
}

/// Aggregate a voucher report for the given agent codes.
///
/// `codes` is an array of strings; blank entries are ignored.
#[wasm_bindgen]
pub fn aggregate_commissions(document: &str, codes: Array) -> Result<JsValue, JsValue> {
    let codes = codes_from_array(&codes)?;
    let report = commission_core::aggregate(document, &codes);
    to_js(&report)
}

/// Split a comma-separated list of agent codes.
#[wasm_bindgen]
pub fn parse_code_list(text: &str) -> Array {
    commission_core::parse_code_list(text)
        .into_iter()
        .map(JsValue::from)
        .collect()
}

/// Aggregate a voucher report and render it as CSV.
#[wasm_bindgen]
pub fn report_to_csv(document: &str, codes: Array) -> Result<String, JsValue> {
    let codes = codes_from_array(&codes)?;
    let report = commission_core::aggregate(document, &codes);
    write_csv(&report, "-").map_err(js_error)
}

fn write_csv(report: &CommissionReport, placeholder: &str) -> Result<String, Box<dyn std::error::Error>> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(report_columns())?;
    for agent in report {
        wtr.write_record(agent.cells(placeholder))?;
    }
    Ok(String::from_utf8(wtr.into_inner()?)?)
}

/// Commission calculator class for browser use.
#[wasm_bindgen]
pub struct CommissionCalculator {
    aggregator: VoucherAggregator,
    placeholder: String,
}

#[wasm_bindgen]
impl CommissionCalculator {
    /// Create a calculator with the standard voucher marker.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            aggregator: VoucherAggregator::new(),
            placeholder: "-".to_string(),
        }
    }

    /// Use a different voucher marker. Empty markers are rejected.
    #[wasm_bindgen]
    pub fn set_marker(&mut self, marker: &str) -> Result<(), JsValue> {
        self.aggregator = VoucherAggregator::with_marker(marker).map_err(js_error)?;
        Ok(())
    }

    /// Current voucher marker.
    #[wasm_bindgen(getter)]
    pub fn marker(&self) -> String {
        self.aggregator.marker().to_string()
    }

    /// Text written for absent fields in CSV output.
    #[wasm_bindgen]
    pub fn set_placeholder(&mut self, placeholder: &str) {
        self.placeholder = placeholder.to_string();
    }

    /// Aggregate a report for the given agent codes.
    #[wasm_bindgen]
    pub fn aggregate(&self, document: &str, codes: Array) -> Result<JsValue, JsValue> {
        let codes = codes_from_array(&codes)?;
        let result = self.aggregator.aggregate(document, &codes);
        to_js(&result.report)
    }

    /// Aggregate and also return run counters and timing.
    #[wasm_bindgen]
    pub fn aggregate_with_stats(&self, document: &str, codes: Array) -> Result<JsValue, JsValue> {
        let codes = codes_from_array(&codes)?;
        let result = self.aggregator.aggregate(document, &codes);

        #[derive(Serialize)]
        struct AggregateOutput<'a> {
            report: &'a CommissionReport,
            stats: AggregationStats,
            processing_time_ms: u64,
        }

        to_js(&AggregateOutput {
            report: &result.report,
            stats: result.stats,
            processing_time_ms: result.processing_time_ms,
        })
    }

    /// Aggregate and render as CSV.
    #[wasm_bindgen]
    pub fn to_csv(&self, document: &str, codes: Array) -> Result<String, JsValue> {
        let codes = codes_from_array(&codes)?;
        let result = self.aggregator.aggregate(document, &codes);
        write_csv(&result.report, &self.placeholder).map_err(js_error)
    }
}

impl Default for CommissionCalculator {
    fn default() -> Self {
        Self::new()
    }
}


#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    const REPORT: &str = "\
****Voucher No. 1
Agency Code/Name : AB123(John Doe)
| 11272100 | First Comm Participating | 150.00 | 150.00 |
";

    fn codes(list: &[&str]) -> Array {
        list.iter().map(|c| JsValue::from_str(c)).collect()
    }

    #[wasm_bindgen_test]
    fn test_aggregate_commissions() {
        let value = aggregate_commissions(REPORT, codes(&["AB123"])).unwrap();
        let agent = js_sys::Reflect::get(&value, &JsValue::from_str("AB123")).unwrap();
        let credit = js_sys::Reflect::get(&agent, &JsValue::from_str("Cr_Amount")).unwrap();
        assert_eq!(credit.as_string().unwrap(), "150.00");
    }

    #[wasm_bindgen_test]
    fn test_empty_codes_rejected() {
        assert!(aggregate_commissions(REPORT, codes(&[" "])).is_err());
    }

    #[wasm_bindgen_test]
    fn test_parse_code_list() {
        let list = parse_code_list("AB123, ,CD456");
        assert_eq!(list.length(), 2);
    }

    #[wasm_bindgen_test]
    fn test_set_marker_rejects_empty() {
        let mut calculator = CommissionCalculator::new();
        assert!(calculator.set_marker("").is_err());
    }
}
