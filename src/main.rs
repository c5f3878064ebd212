//! tardiff CLI
//!
//! Compares two tar archives entry by entry and reports which entries
//! differ in name/size or in content.

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use tardiff_core::logging::{self, TracingConfig};
use tardiff_core::report::{self, ReportSources};
use tardiff_core::OutputFormat;
use tardiff_tools::{ArchiveDiff, CompareOptions, DEFAULT_CHUNK_SIZE};

/// tardiff - compare two tar archives entry by entry
#[derive(Parser)]
#[command(name = "tardiff")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the first tar archive
    first: PathBuf,

    /// Path to the second tar archive
    second: PathBuf,

    /// Enable verbose output (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Output format: text, json or csv
    #[arg(long, default_value = "text")]
    format: OutputFormat,

    /// Bytes read from each entry per comparison step
    #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE)]
    chunk_size: usize,

    /// Also report entries left over when one archive is longer
    #[arg(long)]
    report_unmatched: bool,

    /// Write a JSON report to this file as well
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn setup_logging(verbosity: u8) {
    logging::init_with_config(&TracingConfig::from_verbosity(verbosity));
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let options = CompareOptions::default()
        .with_chunk_size(cli.chunk_size)
        .with_report_unmatched(cli.report_unmatched);
    let differ = ArchiveDiff::new(options).context("Invalid comparison options")?;

    info!("Comparing archives...");
    info!(" First:  {:?}", cli.first);
    info!(" Second: {:?}", cli.second);

    let report = differ
        .compare_files(&cli.first, &cli.second)
        .context("Error comparing tar files")?;

    let sources = ReportSources::new(&cli.first, &cli.second);
    let rendered = report::render(&report, cli.format, sources)?;

    let mut stdout = io::stdout().lock();
    stdout.write_all(rendered.as_bytes())?;
    stdout.flush()?;

    if let Some(output_path) = &cli.output {
        let json = report::render_json(&report, sources)?;
        fs::write(output_path, json)
            .with_context(|| format!("Failed to write report to {:?}", output_path))?;
        info!("Report written to: {:?}", output_path);
    }

    Ok(())
}
