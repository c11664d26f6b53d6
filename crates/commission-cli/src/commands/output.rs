//! Rendering commission reports as a table, CSV, or JSON.

use commission_core::{CommissionReport, report_columns};

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Aligned text table
    Table,
    /// CSV spreadsheet
    Csv,
    /// JSON keyed by agent code
    Json,
}

impl OutputFormat {
    /// File extension for exports in this format.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Table => "txt",
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
        }
    }
}

pub fn format_report(
    report: &CommissionReport,
    format: OutputFormat,
    placeholder: &str,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Table => Ok(format_table(report, placeholder)),
        OutputFormat::Csv => format_csv(report, placeholder),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
    }
}

fn format_csv(report: &CommissionReport, placeholder: &str) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(report_columns())?;
    for agent in report {
        wtr.write_record(agent.cells(placeholder))?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_table(report: &CommissionReport, placeholder: &str) -> String {
    let header: Vec<String> = report_columns().into_iter().map(String::from).collect();
    let rows: Vec<Vec<String>> = report
        .iter()
        .map(|agent| agent.cells(placeholder))
        .collect();

    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut output = String::new();
    push_table_line(&mut output, &header, &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_table_line(&mut output, &rule, &widths);
    for row in &rows {
        push_table_line(&mut output, row, &widths);
    }

    output
}

fn push_table_line(output: &mut String, cells: &[String], widths: &[usize]) {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .enumerate()
        .map(|(i, (cell, width))| {
            // Code and name columns are text, the rest are amounts
            if i < 2 {
                format!("{:<width$}", cell, width = width)
            } else {
                format!("{:>width$}", cell, width = width)
            }
        })
        .collect();
    output.push_str(line.join("  ").trim_end());
    output.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use commission_core::{Decimal, FIELD_COUNT, VoucherAmounts};
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    fn sample_report() -> CommissionReport {
        let mut debits = [None; FIELD_COUNT];
        debits[0] = Some(Decimal::from_str("150.00").unwrap());

        let mut report = CommissionReport::new();
        report.entry("AB123", "John Doe").record(&VoucherAmounts {
            debits,
            credit_total: Decimal::from_str("170.00").unwrap(),
        });
        report
    }

    #[test]
    fn test_csv() {
        let csv = format_report(&sample_report(), OutputFormat::Csv, "-").unwrap();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next().unwrap(),
            "Agent_Code,Name,First_Comm_Participating,First_Year_Comm_Participating,\
             Bonus_Comm_Participating,Renewal_Comm_Participating,Comm_Other_FY_Prem,\
             Bonus_Comm_Agents,Income_Tax,Sum_Dr_Amount,Cr_Amount"
        );
        assert_eq!(
            lines.next().unwrap(),
            "AB123,John Doe,150.00,-,-,-,-,-,-,150.00,170.00"
        );
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_table_placeholder() {
        let table = format_report(&sample_report(), OutputFormat::Table, "n/a").unwrap();
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Agent_Code  Name"));
        assert!(lines[1].starts_with("----------"));
        assert!(lines[2].starts_with("AB123       John Doe"));
        assert!(lines[2].contains("n/a"));
        assert!(lines[2].ends_with("170.00"));
    }

    #[test]
    fn test_json() {
        let json = format_report(&sample_report(), OutputFormat::Json, "-").unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["AB123"]["Cr_Amount"], "170.00");
        assert!(value["AB123"]["Income_Tax"].is_null());
    }

    #[test]
    fn test_empty_report_has_header_only() {
        let csv = format_report(&CommissionReport::new(), OutputFormat::Csv, "-").unwrap();
        assert_eq!(csv.lines().count(), 1);
    }
}
