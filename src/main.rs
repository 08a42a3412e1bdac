use anyhow::{Context, Result};
use clap::Parser;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use tracing::{error, info};

use defogger::engine::{EngineConfig, FindingStore, ScanEngine};
use defogger::{logging, report, targets};

/// Scan files for Base64- and hex-encoded content, recursively.
#[derive(Parser, Debug)]
#[command(name = "defogger", version, about)]
struct Cli {
    /// Files or directories to scan
    #[arg(required = true)]
    targets: Vec<PathBuf>,

    /// Minimum decoded-equivalent length for Base64 candidates
    #[arg(long = "minimum-base64-length", default_value_t = 1)]
    minimum_base64_length: usize,

    /// Minimum decoded byte length for hex candidates
    #[arg(long = "minimum-hex-length", default_value_t = 8)]
    minimum_hex_length: usize,

    /// Hard bound on nesting depth for recursive rescans
    #[arg(long, default_value_t = 16)]
    max_depth: usize,

    /// Directory to persist binary/archive/blob payloads into
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Write the findings report to this file instead of stdout
    #[arg(long)]
    report: Option<PathBuf>,
}

fn main() -> Result<()> {
    logging::init_tracing();
    let cli = Cli::parse();

    let config = EngineConfig {
        min_base64_length: cli.minimum_base64_length,
        min_hex_length: cli.minimum_hex_length,
        max_depth: cli.max_depth,
        ..EngineConfig::default()
    };
    let engine = ScanEngine::new(config);

    let mut store = FindingStore::new();
    for target in &cli.targets {
        match targets::scan_target(&engine, target) {
            Ok(found) => {
                for finding in found.into_vec() {
                    store.record(finding);
                }
            }
            Err(e) => {
                // A bad target is reported and skipped, never fatal
                error!(target = %target.display(), error = %e, "skipping target");
            }
        }
    }
    info!(findings = store.len(), "scan finished");

    if let Some(dir) = &cli.output_dir {
        report::persist_payloads(&store, dir).context("persist payloads")?;
    }

    match &cli.report {
        Some(path) => {
            let mut out = BufWriter::new(File::create(path).context("create report file")?);
            report::write_json(&store, &mut out)?;
            out.flush().ok();
        }
        None => {
            let stdout = io::stdout();
            report::write_json(&store, stdout.lock())?;
            println!();
        }
    }

    Ok(())
}
