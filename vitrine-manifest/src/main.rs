//! vitrine-manifest - regenerate `index.json` from the item documents
//!
//! **Usage:**
//! ```bash
//! vitrine-manifest [--data <dir>] [--output <file>] [--strict] [--dry-run] [--indent <n>]
//! ```
//!
//! Exit codes: 0 ok, 1 strict mode with warnings, 2 data directory missing,
//! 3 manifest could not be written.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use vitrine_common::config::DEFAULT_SOURCE;
use vitrine_manifest::{generate, GenerateOptions};

/// Manifest generator
#[derive(Parser, Debug)]
#[command(name = "vitrine-manifest")]
#[command(about = "Generate the catalog manifest from the item documents (one .json per coffee)")]
#[command(version)]
struct Args {
    /// Data directory holding the item documents
    #[arg(long, default_value = DEFAULT_SOURCE)]
    data: PathBuf,

    /// Output manifest path (default: <data>/index.json)
    #[arg(long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Exit with status 1 when any document is invalid or has warnings
    #[arg(long)]
    strict: bool,

    /// Print the manifest instead of writing it
    #[arg(long)]
    dry_run: bool,

    /// JSON indentation in spaces
    #[arg(long, default_value_t = 2)]
    indent: usize,
}

fn main() -> ExitCode {
    // Logs go to stderr so dry-run output stays clean
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let options = GenerateOptions {
        data_dir: args.data,
        output: args.output,
        strict: args.strict,
        dry_run: args.dry_run,
        indent: args.indent,
    };

    let report = match generate(&options) {
        Ok(report) => report,
        Err(e) => {
            error!("{}", e);
            return ExitCode::from(e.exit_code());
        }
    };

    if options.dry_run {
        println!("{}", report.rendered);
        return ExitCode::from(report.exit_code());
    }

    let output = options.output_path();
    if !report.warnings.is_empty() {
        if report.strict {
            error!(
                "Manifest written to {}, but some documents have problems (use --dry-run to inspect)",
                output.display()
            );
            return ExitCode::from(report.exit_code());
        } else {
            warn!(
                "Manifest written to {}, with {} warning(s)",
                output.display(),
                report.warnings.len()
            );
        }
    }

    info!(
        "✓ Manifest updated: {} ({} coffee(s))",
        output.display(),
        report.manifest.cafes.len()
    );
    ExitCode::from(report.exit_code())
}
