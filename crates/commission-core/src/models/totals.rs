//! Per-agent commission totals.

use std::collections::HashMap;
use std::fmt;

use rust_decimal::Decimal;
use serde::ser::{Serialize, SerializeMap, Serializer};
use tracing::warn;

use crate::voucher::rules::{FIELD_COUNT, FIELD_SPECS, FieldSpec};

/// Add `amount` to `total`, dropping the contribution if the sum would
/// leave the decimal range.
pub(crate) fn accumulate(total: Decimal, amount: Decimal) -> Decimal {
    match total.checked_add(amount) {
        Some(sum) => sum,
        None => {
            warn!("Ignoring amount {} that would overflow total {}", amount, total);
            total
        }
    }
}

/// Running total of one tracked field.
///
/// A field stays `Absent` until some voucher carries its row. After that it is
/// numeric for good, so a later voucher without the row adds nothing instead
/// of resetting it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FieldTotal {
    #[default]
    Absent,
    Amount(Decimal),
}

impl FieldTotal {
    /// Add one voucher's amount.
    pub fn add(&mut self, amount: Decimal) {
        *self = match *self {
            Self::Absent => Self::Amount(amount),
            Self::Amount(total) => Self::Amount(accumulate(total, amount)),
        };
    }

    /// Fold another running total into this one.
    pub fn merge(&mut self, other: FieldTotal) {
        if let Self::Amount(amount) = other {
            self.add(amount);
        }
    }

    pub fn amount(&self) -> Option<Decimal> {
        match self {
            Self::Absent => None,
            Self::Amount(amount) => Some(*amount),
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }
}

impl From<Option<Decimal>> for FieldTotal {
    fn from(value: Option<Decimal>) -> Self {
        value.map_or(Self::Absent, Self::Amount)
    }
}

impl fmt::Display for FieldTotal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Absent => f.write_str("-"),
            Self::Amount(amount) => write!(f, "{}", amount),
        }
    }
}

impl Serialize for FieldTotal {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Absent => serializer.serialize_none(),
            Self::Amount(amount) => serializer.serialize_some(amount),
        }
    }
}

/// Amounts extracted from a single voucher.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VoucherAmounts {
    /// First debit amount per tracked field, indexed like `FIELD_SPECS`.
    pub debits: [Option<Decimal>; FIELD_COUNT],
    /// Sum of every credit cell in the voucher.
    pub credit_total: Decimal,
}

impl VoucherAmounts {
    /// Sum of the tracked debit fields present in this voucher.
    pub fn debit_sum(&self) -> Decimal {
        self.debits
            .iter()
            .flatten()
            .fold(Decimal::ZERO, |total, amount| accumulate(total, *amount))
    }

    /// Number of tracked fields present in this voucher.
    pub fn matched_fields(&self) -> usize {
        self.debits.iter().filter(|d| d.is_some()).count()
    }
}

/// Accumulated totals for one agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentTotals {
    /// Agent code as printed in the report.
    pub agent_code: String,
    /// Display name from the first voucher seen for this agent.
    pub name: String,
    /// Running total per tracked field, indexed like `FIELD_SPECS`.
    pub fields: [FieldTotal; FIELD_COUNT],
    /// Sum of tracked debit fields across vouchers.
    pub sum_dr_amount: Decimal,
    /// Sum of every credit cell across vouchers.
    pub cr_amount: Decimal,
}

impl AgentTotals {
    pub fn new(agent_code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            agent_code: agent_code.into(),
            name: name.into(),
            fields: [FieldTotal::Absent; FIELD_COUNT],
            sum_dr_amount: Decimal::ZERO,
            cr_amount: Decimal::ZERO,
        }
    }

    /// Look up a field total by its column name.
    pub fn field(&self, name: &str) -> Option<&FieldTotal> {
        FieldSpec::index_of(name).map(|i| &self.fields[i])
    }

    /// Report cells for this agent, matching [`report_columns`]. Absent
    /// fields render as `placeholder`.
    pub fn cells(&self, placeholder: &str) -> Vec<String> {
        let mut row = vec![self.agent_code.clone(), self.name.clone()];
        row.extend(self.fields.iter().map(|field| match field {
            FieldTotal::Absent => placeholder.to_string(),
            FieldTotal::Amount(amount) => amount.to_string(),
        }));
        row.push(self.sum_dr_amount.to_string());
        row.push(self.cr_amount.to_string());
        row
    }

    /// Fold one voucher into the totals.
    pub fn record(&mut self, amounts: &VoucherAmounts) {
        for (total, debit) in self.fields.iter_mut().zip(amounts.debits.iter()) {
            if let Some(amount) = debit {
                total.add(*amount);
            }
        }
        self.sum_dr_amount = accumulate(self.sum_dr_amount, amounts.debit_sum());
        self.cr_amount = accumulate(self.cr_amount, amounts.credit_total);
    }

    /// Fold another agent's totals into these. The existing name is kept.
    pub fn merge(&mut self, other: &AgentTotals) {
        for (total, theirs) in self.fields.iter_mut().zip(other.fields.iter()) {
            total.merge(*theirs);
        }
        self.sum_dr_amount = accumulate(self.sum_dr_amount, other.sum_dr_amount);
        self.cr_amount = accumulate(self.cr_amount, other.cr_amount);
    }
}

impl Serialize for AgentTotals {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(FIELD_COUNT + 3))?;
        map.serialize_entry("Name", &self.name)?;
        for (spec, total) in FIELD_SPECS.iter().zip(self.fields.iter()) {
            map.serialize_entry(spec.name, total)?;
        }
        map.serialize_entry("Sum_Dr_Amount", &self.sum_dr_amount)?;
        map.serialize_entry("Cr_Amount", &self.cr_amount)?;
        map.end()
    }
}

/// Column headers of a tabular report, in export order.
pub fn report_columns() -> Vec<&'static str> {
    let mut columns = vec!["Agent_Code", "Name"];
    columns.extend(FIELD_SPECS.iter().map(|spec| spec.name));
    columns.extend(["Sum_Dr_Amount", "Cr_Amount"]);
    columns
}

/// Per-agent totals keyed by agent code, in order of first appearance.
#[derive(Debug, Clone, Default)]
pub struct CommissionReport {
    agents: Vec<AgentTotals>,
    index: HashMap<String, usize>,
}

impl CommissionReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Totals for `code`, created with `name` on first sight.
    pub fn entry(&mut self, code: &str, name: &str) -> &mut AgentTotals {
        let position = match self.index.get(code) {
            Some(&position) => position,
            None => {
                self.agents.push(AgentTotals::new(code, name));
                self.index.insert(code.to_string(), self.agents.len() - 1);
                self.agents.len() - 1
            }
        };
        &mut self.agents[position]
    }

    pub fn get(&self, code: &str) -> Option<&AgentTotals> {
        self.index.get(code).map(|&i| &self.agents[i])
    }

    pub fn contains(&self, code: &str) -> bool {
        self.index.contains_key(code)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AgentTotals> {
        self.agents.iter()
    }

    /// Agent codes in order of first appearance.
    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.agents.iter().map(|a| a.agent_code.as_str())
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Fold a report built from a later part of the same document (or from
    /// another document) into this one.
    pub fn merge(&mut self, other: &CommissionReport) {
        for theirs in &other.agents {
            self.entry(&theirs.agent_code, &theirs.name).merge(theirs);
        }
    }

    pub fn into_agents(self) -> Vec<AgentTotals> {
        self.agents
    }
}

impl PartialEq for CommissionReport {
    fn eq(&self, other: &Self) -> bool {
        self.agents == other.agents
    }
}

impl Eq for CommissionReport {}

impl<'a> IntoIterator for &'a CommissionReport {
    type Item = &'a AgentTotals;
    type IntoIter = std::slice::Iter<'a, AgentTotals>;

    fn into_iter(self) -> Self::IntoIter {
        self.agents.iter()
    }
}

impl Serialize for CommissionReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.agents.len()))?;
        for agent in &self.agents {
            map.serialize_entry(&agent.agent_code, agent)?;
        }
        map.end()
    }
}
