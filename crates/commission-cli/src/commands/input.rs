//! Agent code sources shared by `aggregate` and `batch`.

use std::path::{Path, PathBuf};

use clap::Args;
use tracing::debug;

use commission_core::models::config::CodesConfig;
use commission_core::{codes_from_column, parse_code_list, parse_single_code};

/// Where the agent codes to filter on come from. Exactly one is required.
#[derive(Args, Debug, Clone)]
#[group(required = true, multiple = false)]
pub struct CodeSourceArgs {
    /// A single agent code
    #[arg(long)]
    code: Option<String>,

    /// Comma-separated agent codes
    #[arg(long)]
    codes: Option<String>,

    /// CSV file whose first column lists agent codes
    #[arg(long, value_name = "FILE")]
    codes_file: Option<PathBuf>,
}

impl CodeSourceArgs {
    /// Resolve the requested codes, in the order given.
    pub fn resolve(&self, config: &CodesConfig) -> anyhow::Result<Vec<String>> {
        let codes = if let Some(code) = &self.code {
            parse_single_code(code).into_iter().collect()
        } else if let Some(list) = &self.codes {
            parse_code_list(list)
        } else if let Some(path) = &self.codes_file {
            read_codes_file(path, config.skip_header_row)?
        } else {
            Vec::new()
        };

        if codes.is_empty() {
            anyhow::bail!("No agent codes provided");
        }

        Ok(codes)
    }
}

/// Read the first column of a CSV code file.
fn read_codes_file(path: &Path, skip_header: bool) -> anyhow::Result<Vec<String>> {
    if !path.exists() {
        anyhow::bail!("Agent code file not found: {}", path.display());
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)?;

    let mut first_column = Vec::new();
    for record in reader.records() {
        let record = record?;
        first_column.push(record.get(0).unwrap_or("").to_string());
    }

    let codes = codes_from_column(first_column, skip_header);
    debug!("Read {} agent codes from {}", codes.len(), path.display());

    Ok(codes)
}
