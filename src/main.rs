//! filecensus - catalog a directory tree into a Parquet inventory.
//!
//! Usage:
//!   filecensus --root PATH [--output FILE] [--buffer N] [--workers N] [--flush N]

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::{Context, Result};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use filecensus_core::{
    CatalogConfig, DEFAULT_BUFFER_SIZE, DEFAULT_FLUSH_SIZE, DEFAULT_OUTPUT, DEFAULT_WORKERS,
};
use filecensus_sink::{Catalog, CatalogSummary};

const DEFAULT_ROW_GROUP_MB: usize = 128;

#[derive(Parser)]
#[command(
    name = "filecensus",
    version,
    about = "Catalog a directory tree into a Parquet file",
    long_about = "filecensus walks a directory tree and writes one Parquet row per entry: \
                  path, size, timestamps, type and attribute flags, and a SHA-256 of every \
                  regular file."
)]
struct Cli {
    /// Root directory to catalog
    #[arg(long)]
    root: Option<PathBuf>,

    /// Output Parquet file path
    #[arg(long, default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// Capacity of the queue between the walker and the writer
    #[arg(long, default_value_t = DEFAULT_BUFFER_SIZE)]
    buffer: usize,

    /// Number of hashing workers
    #[arg(long, default_value_t = DEFAULT_WORKERS)]
    workers: usize,

    /// Records per durable flush
    #[arg(long, default_value_t = DEFAULT_FLUSH_SIZE)]
    flush: usize,

    /// Row group size threshold in MiB
    #[arg(long, default_value_t = DEFAULT_ROW_GROUP_MB)]
    row_group_mb: usize,

    /// Tag written to every row (defaults to the output path)
    #[arg(long)]
    batch_tag: Option<String>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let config = build_config(cli)?;
    let output = config.output.clone();

    let catalog = Catalog::new(config);
    let cancel = catalog.cancellation_token();
    ctrlc::set_handler(move || {
        warn!("Interrupt received, finishing output");
        cancel.cancel();
    })
    .context("Failed to set signal handler")?;

    let summary = catalog.run().context("Catalog failed")?;
    print_summary(&summary, &output);

    Ok(())
}

fn build_config(cli: Cli) -> Result<CatalogConfig> {
    let mut builder = CatalogConfig::builder();
    builder
        .output(cli.output)
        .buffer_size(cli.buffer)
        .workers(cli.workers)
        .flush_size(cli.flush)
        .row_group_bytes(cli.row_group_mb.saturating_mul(1024 * 1024));
    if let Some(root) = cli.root {
        builder.root(root);
    }
    if let Some(tag) = cli.batch_tag {
        builder.batch_tag(tag);
    }
    builder.build().context("Invalid arguments")
}

fn setup_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "filecensus={level},filecensus_core={level},filecensus_scan={level},filecensus_sink={level},warn"
        ))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn print_summary(summary: &CatalogSummary, output: &std::path::Path) {
    println!(
        "Cataloged {} entries ({}) into {} in {:.2}s",
        summary.records_written,
        format_size(summary.bytes_cataloged),
        output.display(),
        summary.elapsed.as_secs_f64()
    );
    println!(
        " {} flushes, {} warnings, {:.0} entries/s",
        summary.flushes,
        summary.warnings,
        summary.records_per_second()
    );
}

/// Format bytes as human-readable size.
fn format_size(bytes: u64) -> String {
    humansize::format_size(bytes, humansize::BINARY)
}
