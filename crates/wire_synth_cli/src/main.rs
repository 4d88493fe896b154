#![forbid(unsafe_code)]
//! `generate-wires`: renders a stack of random wire networks to disk.
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use wire_synth::prelude::*;

mod logging;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Parameter file; created with defaults if missing.
    #[arg(short, long, default_value = "wire_generator.toml")]
    config: PathBuf,

    /// Worker threads (overrides the parameter file).
    #[arg(short, long)]
    threads: Option<usize>,

    /// Base seed for reproducible stacks (overrides the parameter file).
    #[arg(short, long)]
    seed: Option<u64>,

    /// Enable debug logging.
    #[arg(short, long)]
    verbose: bool,

    /// Write the default parameter file to `--config` and exit.
    #[arg(long)]
    write_default_config: bool,
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();
    logging::init(args.verbose);

    if run(&args)? {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

/// Runs the command; returns `false` if any level failed.
fn run(args: &Args) -> Result<bool> {
    if args.write_default_config {
        WireConfig::default()
            .save(&args.config)
            .with_context(|| format!("writing {}", args.config.display()))?;
        println!("Wrote default parameters to {}", args.config.display());
        return Ok(true);
    }

    let mut config = WireConfig::load_or_create(&args.config)
        .with_context(|| format!("loading {}", args.config.display()))?;
    if args.threads.is_some() {
        config.parameters.threads = args.threads;
    }
    if args.seed.is_some() {
        config.parameters.seed = args.seed;
    }

    let generator = config.generator().context("invalid wire parameters")?;
    let sink = DirectorySink::new(config.destination(), config.naming());
    info!("Writing levels to {}.", sink.root().display());

    let report = generator.run(&sink);
    print_summary(&report, &sink);
    Ok(report.is_complete())
}

fn print_summary(report: &BatchReport, sink: &DirectorySink) {
    for outcome in &report.outcomes {
        match outcome {
            Ok(result) => println!(
                "n = {:>6}  ok      coverage {:>6.2}%  attempts {:>8}  {}",
                result.level.wire_count,
                result.canvas.coverage() * 100.0,
                result.attempts,
                sink.image_path(result.level.wire_count).display()
            ),
            Err(failure) => println!(
                "n = {:>6}  FAILED  {}",
                failure.level.wire_count, failure.error
            ),
        }
    }
    let failed = report.failures().count();
    println!(
        "{} of {} levels generated.",
        report.len() - failed,
        report.len()
    );
}
