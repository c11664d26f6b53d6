//! Batch command - aggregate several voucher reports into combined totals.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, error, warn};

use commission_core::{
    AggregationResult, AggregationStats, CommissionConfig, CommissionReport, VoucherAggregator,
    code_set, is_report_file, read_document,
};

use super::input::CodeSourceArgs;
use super::load_config;
use super::output::{OutputFormat, format_report};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern
    #[arg(required = true)]
    input: String,

    #[command(flatten)]
    codes: CodeSourceArgs,

    /// Output directory for per-file and combined reports
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    format: OutputFormat,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

/// Result of processing a single file.
struct ProcessResult {
    path: PathBuf,
    result: Option<AggregationResult>,
    error: Option<String>,
    processing_time_ms: u64,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    // Expand glob pattern
    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| is_report_file(p))
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    let codes = code_set(args.codes.resolve(&config.codes)?)?;

    eprintln!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let overall_pb = ProgressBar::new(files.len() as u64);
    overall_pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let aggregator = VoucherAggregator::from_config(&config.extraction)?;
    let mut results = Vec::with_capacity(files.len());

    // Each file gets its own accumulator; reports are merged afterwards
    for path in files {
        let file_start = Instant::now();
        let outcome = read_document(&path, &config.extraction)
            .map(|document| aggregator.aggregate(&document, &codes));
        let processing_time_ms = file_start.elapsed().as_millis() as u64;

        match outcome {
            Ok(result) => {
                results.push(ProcessResult {
                    path: path.clone(),
                    result: Some(result),
                    error: None,
                    processing_time_ms,
                });
            }
            Err(e) => {
                let error_msg = e.to_string();
                if args.continue_on_error {
                    warn!("Failed to process {}: {}", path.display(), error_msg);
                    results.push(ProcessResult {
                        path: path.clone(),
                        result: None,
                        error: Some(error_msg),
                        processing_time_ms,
                    });
                } else {
                    error!("Failed to process {}: {}", path.display(), error_msg);
                    anyhow::bail!("Processing failed: {}", error_msg);
                }
            }
        }

        overall_pb.inc(1);
    }

    overall_pb.finish_and_clear();

    let successful: Vec<_> = results.iter().filter(|r| r.result.is_some()).collect();
    let failed: Vec<_> = results.iter().filter(|r| r.error.is_some()).collect();

    let mut combined = CommissionReport::new();
    let mut stats = AggregationStats::default();
    for entry in &successful {
        if let Some(result) = &entry.result {
            combined.merge(&result.report);
            stats.merge(&result.stats);
        }
    }

    if combined.is_empty() {
        eprintln!(
            "{} No matching agent codes found in the data.",
            style("⚠").yellow()
        );
    }

    if let Some(output_dir) = &args.output_dir {
        write_outputs(output_dir, &successful, &combined, args.format, &config)?;
    } else if !combined.is_empty() {
        let output = format_report(&combined, args.format, &config.output.absent_placeholder)?;
        print!("{}", output);
        if !output.ends_with('\n') {
            println!();
        }
    }

    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &results)?;
        eprintln!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    eprintln!();
    eprintln!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    eprintln!(
        "   {} successful, {} failed, {} vouchers matched for {} agents",
        style(successful.len()).green(),
        style(failed.len()).red(),
        stats.matched_vouchers,
        combined.len()
    );

    if !failed.is_empty() {
        eprintln!();
        eprintln!("{}", style("Failed files:").red());
        for result in &failed {
            eprintln!(
                "  - {}: {}",
                result.path.display(),
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

fn write_outputs(
    output_dir: &Path,
    successful: &[&ProcessResult],
    combined: &CommissionReport,
    format: OutputFormat,
    config: &CommissionConfig,
) -> anyhow::Result<()> {
    let placeholder = &config.output.absent_placeholder;

    for entry in successful {
        let Some(result) = &entry.result else {
            continue;
        };
        let output_path = output_dir.join(per_file_output_name(&entry.path, format));

        fs::write(&output_path, format_report(&result.report, format, placeholder)?)?;
        debug!("Wrote output to {}", output_path.display());
    }

    let combined_path = output_dir.join(format!("combined.{}", format.extension()));
    fs::write(&combined_path, format_report(combined, format, placeholder)?)?;
    eprintln!(
        "{} Combined totals written to {}",
        style("✓").green(),
        combined_path.display()
    );

    Ok(())
}

/// Output name for one input: its full file name plus the format extension.
fn per_file_output_name(path: &Path, format: OutputFormat) -> String {
    let file_name = path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("report");
    format!("{}.{}", file_name, format.extension())
}

fn write_summary(path: &Path, results: &[ProcessResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "sections",
        "matched_vouchers",
        "agents",
        "processing_time_ms",
        "error",
    ])?;

    for entry in results {
        let filename = entry
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("");

        if let Some(result) = &entry.result {
            wtr.write_record([
                filename,
                "success",
                &result.stats.sections.to_string(),
                &result.stats.matched_vouchers.to_string(),
                &result.report.len().to_string(),
                &entry.processing_time_ms.to_string(),
                "",
            ])?;
        } else {
            wtr.write_record([
                filename,
                "error",
                "",
                "",
                "",
                &entry.processing_time_ms.to_string(),
                entry.error.as_deref().unwrap_or(""),
            ])?;
        }
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_per_file_output_name_keeps_extension() {
        let txt = per_file_output_name(Path::new("reports/march.txt"), OutputFormat::Csv);
        let prt = per_file_output_name(Path::new("reports/march.prt"), OutputFormat::Csv);
        assert_eq!(txt, "march.txt.csv");
        assert_eq!(prt, "march.prt.csv");

        let combined = per_file_output_name(Path::new("combined.txt"), OutputFormat::Json);
        assert_eq!(combined, "combined.txt.json");
        assert_ne!(combined, format!("combined.{}", OutputFormat::Json.extension()));
    }
}
