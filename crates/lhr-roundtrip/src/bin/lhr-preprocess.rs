//! lhr-preprocess - reshape a raw Lighthouse report for the protobuf schema
//!
//! Reads the report at `--in`, applies the preprocessing transform and writes
//! the result to `--out` as two-space indented JSON.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use lhr_proto::preprocess::process_for_proto;
use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// lhr-preprocess - reshape a raw Lighthouse report for the protobuf schema
#[derive(Parser, Debug)]
#[command(name = "lhr-preprocess")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Raw report to read
    #[arg(long = "in", value_name = "PATH")]
    input: PathBuf,

    /// Where to write the preprocessed report
    #[arg(long = "out", value_name = "PATH")]
    output: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_new(&cli.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let text = fs::read_to_string(&cli.input)
        .with_context(|| format!("failed to read {}", cli.input.display()))?;
    let report: serde_json::Value = serde_json::from_str(&text)
        .with_context(|| format!("{} is not valid JSON", cli.input.display()))?;

    let processed = process_for_proto(&report);

    if let Some(parent) = cli.output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let out = serde_json::to_string_pretty(&processed)?;
    fs::write(&cli.output, out)
        .with_context(|| format!("failed to write {}", cli.output.display()))?;

    info!(input = %cli.input.display(), output = %cli.output.display(), "preprocessed report");
    Ok(())
}
