//! CLI entry point for the alchemy dataset scraper.

use std::process::ExitCode;

use alchemy_core::config::load_file_config;
use alchemy_core::{Pipeline, PipelineConfig, PipelineReport};
use anyhow::Result;
use clap::Parser;
use indicatif::ProgressBar;
use tracing::{debug, error, info};

mod cli;
mod progress;

use cli::Args;
use progress::ProgressAwareWriter;

/// Process outcome mapped to the exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ProcessExit {
    /// The artifact was written. Individual icon failures do not change this.
    Success,
    /// A fatal pipeline error.
    Failure,
    /// The configuration could not be loaded or resolved.
    Usage,
}

impl ProcessExit {
    fn code(self) -> u8 {
        match self {
            ProcessExit::Success => 0,
            ProcessExit::Failure => 1,
            ProcessExit::Usage => 2,
        }
    }
}

impl From<ProcessExit> for ExitCode {
    fn from(outcome: ProcessExit) -> Self {
        ExitCode::from(outcome.code())
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (info)
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    // Log lines share stderr with the spinner and are drawn above it
    let spinner = progress::run_spinner(args.quiet);
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(ProgressAwareWriter::new(spinner.clone(), std::io::stderr))
        .init();

    debug!(?args, "CLI arguments parsed");

    let config = match resolve_config(&args) {
        Ok(config) => config,
        Err(e) => {
            error!("{e:#}");
            return ProcessExit::Usage.into();
        }
    };

    match run(config, &spinner).await {
        Ok(report) => {
            if !args.quiet {
                print_summary(&report);
            }
            ProcessExit::Success.into()
        }
        Err(e) => {
            error!("{e:#}");
            ProcessExit::Failure.into()
        }
    }
}

fn resolve_config(args: &Args) -> Result<PipelineConfig> {
    let file = load_file_config(args.config.as_deref())?;
    PipelineConfig::resolve(file.as_ref(), &args.overrides())
}

async fn run(config: PipelineConfig, spinner: &ProgressBar) -> Result<PipelineReport> {
    info!("Alchemy dataset scraper starting");
    let pipeline = Pipeline::new(config)?;

    progress::start(spinner);
    let report = pipeline
        .run(|element, outcome| progress::record_icon(spinner, &element.id, outcome))
        .await;
    spinner.finish_and_clear();

    Ok(report?)
}

fn print_summary(report: &PipelineReport) {
    println!("Elements found: {}", report.elements_found());
    match &report.icons {
        Some(icons) => {
            println!(
                "Icons: {} downloaded, {} failed, {} skipped",
                icons.downloaded, icons.failed, icons.skipped
            );
            for failure in &icons.failures {
                println!("  failed: {} ({})", failure.id, failure.reason);
            }
        }
        None => println!("Icons: disabled"),
    }
    if !report.conflicts.is_empty() {
        println!("Id conflicts: {}", report.conflicts.len());
    }
    println!("Wrote {}", report.output.display());
}
