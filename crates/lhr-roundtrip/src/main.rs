//! lhr-roundtrip - Lighthouse report schema round-trip check
//!
//! Preprocesses the canonical sample report, round-trips it through the
//! `LighthouseResult` protobuf schema and writes the result for diffing.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use lhr_proto::config::DEFAULT_PREPROCESSOR;
use lhr_proto::{RoundTripConfig, RunReport};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// lhr-roundtrip - Lighthouse report schema round-trip check
#[derive(Parser, Debug)]
#[command(name = "lhr-roundtrip")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to a TOML configuration file (its directory becomes the root)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory relative paths resolve against (defaults to the workspace root)
    #[arg(long)]
    root: Option<PathBuf>,

    /// Canonical sample report
    #[arg(long)]
    sample: Option<PathBuf>,

    /// Preprocessed artifact, rewritten every run
    #[arg(long)]
    preprocessed: Option<PathBuf>,

    /// Round-tripped artifact, rewritten every run
    #[arg(long)]
    round_trip: Option<PathBuf>,

    /// Preprocessor program (invoked as `<program> --in=<p> --out=<p>`)
    #[arg(long)]
    preprocessor: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Print the run summary as JSON
    #[arg(long)]
    json: bool,
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

    let config = resolve_config(&cli)?;
    let report = lhr_proto::run(&config)
        .with_context(|| format!("round trip of {} failed", config.sample.display()))?;
    print_report(&report, cli.json)
}

/// Builds the run configuration: defaults or config file, then CLI flags.
fn resolve_config(cli: &Cli) -> Result<RoundTripConfig> {
    let (mut config, root) = match (&cli.config, &cli.root) {
        (Some(path), root) => {
            let config = RoundTripConfig::from_file(path)
                .with_context(|| format!("failed to load config from {}", path.display()))?;
            let root = root.clone().unwrap_or_else(|| {
                path.parent().map_or_else(PathBuf::new, Path::to_path_buf)
            });
            (config, root)
        },
        (None, Some(root)) => (RoundTripConfig::rooted_at(root), root.clone()),
        (None, None) => {
            let root = workspace_root();
            (RoundTripConfig::rooted_at(&root), root)
        },
    };

    if let Some(sample) = &cli.sample {
        config.sample = root.join(sample);
    }
    if let Some(preprocessed) = &cli.preprocessed {
        config.preprocessed = root.join(preprocessed);
    }
    if let Some(round_trip) = &cli.round_trip {
        config.round_trip = root.join(round_trip);
    }
    if let Some(program) = &cli.preprocessor {
        config.preprocessor.program = if program.components().count() > 1 {
            root.join(program)
        } else {
            program.clone()
        };
        config.preprocessor.args.clear();
    } else if config.preprocessor.program == Path::new(DEFAULT_PREPROCESSOR) {
        if let Some(bundled) = bundled_preprocessor() {
            config.preprocessor.program = bundled;
        }
    }

    config.validate().context("invalid configuration")?;
    Ok(config)
}

/// Root of the source tree this binary was built from.
fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../..")
}

/// The `lhr-preprocess` binary installed next to this one, if any.
fn bundled_preprocessor() -> Option<PathBuf> {
    let exe = std::env::current_exe().ok()?;
    let candidate = exe
        .parent()?
        .join(format!("{DEFAULT_PREPROCESSOR}{}", std::env::consts::EXE_SUFFIX));
    candidate.is_file().then_some(candidate)
}

fn print_report(report: &RunReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        println!("Wrote {}", report.round_trip_path.display());
        println!(
            "  audits: {}  categories: {}",
            report.audit_count, report.category_count
        );
        println!("  wire: {} bytes, blake3 {}", report.wire_len, report.wire_digest);
    }
    Ok(())
}
