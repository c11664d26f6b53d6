//! Aggregate command - per-agent totals from a single voucher report.

use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use commission_core::{AggregationStats, VoucherAggregator, code_set, read_document};

use super::input::CodeSourceArgs;
use super::load_config;
use super::output::{OutputFormat, format_report};

/// Arguments for the aggregate command.
#[derive(Args)]
pub struct AggregateArgs {
    /// Voucher report (.txt or .prt)
    #[arg(required = true)]
    input: PathBuf,

    #[command(flatten)]
    codes: CodeSourceArgs,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    format: OutputFormat,

    /// Also export the totals as CSV under the configured export file name
    #[arg(long)]
    export: bool,

    /// Show voucher statistics
    #[arg(long)]
    stats: bool,
}

pub async fn run(args: AggregateArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let codes = args.codes.resolve(&config.codes)?;
    eprintln!(
        "{} Processing with the following agent codes: {}",
        style("ℹ").blue(),
        codes.join(", ")
    );
    let codes = code_set(codes)?;

    info!("Processing file: {}", args.input.display());

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")?,
    );
    pb.enable_steady_tick(Duration::from_millis(100));

    pb.set_message("Reading report...");
    let document = read_document(&args.input, &config.extraction)?;

    pb.set_message("Aggregating vouchers...");
    let aggregator = VoucherAggregator::from_config(&config.extraction)?;
    let result = aggregator.aggregate(&document, &codes);

    pb.finish_and_clear();

    if args.stats {
        print_stats(&result.stats, result.processing_time_ms);
    }

    if result.report.is_empty() {
        eprintln!(
            "{} No matching agent codes found in the data.",
            style("⚠").yellow()
        );
        return Ok(());
    }

    eprintln!(
        "{} Processing complete: {} agents",
        style("✓").green(),
        result.report.len()
    );

    let placeholder = &config.output.absent_placeholder;
    let output = format_report(&result.report, args.format, placeholder)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        eprintln!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        print!("{}", output);
        if !output.ends_with('\n') {
            println!();
        }
    }

    if args.export {
        let export_path = PathBuf::from(&config.output.export_file_name);
        let csv = format_report(&result.report, OutputFormat::Csv, placeholder)?;
        fs::write(&export_path, csv)?;
        eprintln!(
            "{} Totals exported to {}",
            style("✓").green(),
            export_path.display()
        );
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

fn print_stats(stats: &AggregationStats, processing_time_ms: u64) {
    eprintln!("{} Sections:          {}", style("ℹ").blue(), stats.sections);
    eprintln!("{} Without identity:  {}", style("ℹ").blue(), stats.without_identity);
    eprintln!("{} Other agents:      {}", style("ℹ").blue(), stats.filtered_out);
    eprintln!("{} Matched vouchers:  {}", style("ℹ").blue(), stats.matched_vouchers);
    eprintln!("{} Processing time:   {}ms", style("ℹ").blue(), processing_time_ms);
}
