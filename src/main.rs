use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use asset_archiver::{ArchiveConfig, ArchiveReport, AssetArchiver};
use clap::Parser;
use log::{error, info};

/// Copy the local images a document references into its assets directory and point the
/// document at the copies.
#[derive(Parser, Debug)]
#[command(name = "asset-archiver", version, about)]
struct Cli {
    /// Document to process
    #[arg(short = 'f', long = "file-path")]
    file_path: PathBuf,

    /// JSON configuration file (defaults to asset-archiver.json next to the document)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the run summary as JSON on stdout
    #[arg(long)]
    json: bool,

    /// More log output (-v: debug, -vv: trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only report warnings and errors
    #[arg(short = 'q', long = "quiet", conflicts_with = "verbose")]
    quiet: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);
    ExitCode::from(exit_status(run(&cli)))
}

/// Map the outcome of a run to the process exit status, logging any failure.
fn exit_status(result: Result<()>) -> u8 {
    match result {
        Ok(()) => 0,
        Err(err) => {
            error!("{err:#}");
            1
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let report = archive(cli)?;
    if cli.json {
        println!("{}", render_json(&report)?);
    } else {
        info!(
            "done: {} copied, {} already in place, {} reference(s) rewritten, backup at {}",
            report.copied,
            report.reused,
            report.replacements,
            report.backup.display()
        );
    }
    Ok(())
}

fn archive(cli: &Cli) -> Result<ArchiveReport> {
    let config = match &cli.config {
        Some(path) => ArchiveConfig::from_path(path)?,
        None => {
            let document_dir = cli
                .file_path
                .parent()
                .map(PathBuf::from)
                .unwrap_or_default();
            ArchiveConfig::discover(&document_dir)
        }
    };

    AssetArchiver::with_config(config)
        .archive(&cli.file_path)
        .with_context(|| format!("archiving {} failed", cli.file_path.display()))
}

fn render_json(report: &ArchiveReport) -> Result<String> {
    serde_json::to_string_pretty(report).context("failed to serialise run summary")
}

/// Initialize logging based on verbosity flags.
fn init_logging(verbose: u8, quiet: bool) {
    let log_level = match (quiet, verbose) {
        (true, _) => log::LevelFilter::Warn,
        (false, 0) => log::LevelFilter::Info,
        (false, 1) => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(log_level)
        .parse_default_env()
        .format_timestamp_secs()
        .format_module_path(false)
        .format_target(false)
        .init();
}
