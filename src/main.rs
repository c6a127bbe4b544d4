//! aidelog - structured JSON pipeline for AIDE integrity reports
//!
//! Command-line entry point: runs the full check/parse/publish/update
//! workflow, or parses an existing report offline for triage.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use aidelog_core::config::{
    DEFAULT_AIDE_PROGRAM, DEFAULT_DB_CURRENT, DEFAULT_DB_NEW, DEFAULT_MAX_ENTRY_LENGTH,
    DEFAULT_REPORT_DEST, DEFAULT_REPORT_SOURCE, DEFAULT_REPORT_TEMP,
};
use aidelog_core::Config;
use aidelog_parser::{ParseError, ReportParser};
use aidelog_workflow::Workflow;

/// aidelog - AIDE report analysis and baseline maintenance
#[derive(Parser)]
#[command(name = "aidelog")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full workflow: check, parse, publish, update baseline
    Run(RunArgs),

    /// Parse an existing report and emit the JSON record, touching nothing
    Parse(ParseArgs),
}

#[derive(Args)]
struct RunArgs {
    /// Active baseline database consumed by the check
    #[arg(long, default_value = DEFAULT_DB_CURRENT)]
    db_current: PathBuf,

    /// Baseline database produced by the update
    #[arg(long, default_value = DEFAULT_DB_NEW)]
    db_new: PathBuf,

    /// Text report written by the check
    #[arg(long, default_value = DEFAULT_REPORT_SOURCE)]
    report: PathBuf,

    /// Staging path for the JSON record
    #[arg(long, default_value = DEFAULT_REPORT_TEMP)]
    report_temp: PathBuf,

    /// Final destination of the JSON record
    #[arg(long, default_value = DEFAULT_REPORT_DEST)]
    report_dest: PathBuf,

    /// AIDE executable name or path
    #[arg(long, default_value = DEFAULT_AIDE_PROGRAM)]
    aide_program: String,

    /// Maximum entry path length in the published record
    #[arg(long, default_value_t = DEFAULT_MAX_ENTRY_LENGTH)]
    max_entry_length: usize,

    /// Kill the external check/update commands after this many seconds
    #[arg(long)]
    timeout_secs: Option<u64>,
}

#[derive(Args)]
struct ParseArgs {
    /// Report file to parse
    report: PathBuf,

    /// Write the record here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Maximum entry path length in the emitted record
    #[arg(long, default_value_t = DEFAULT_MAX_ENTRY_LENGTH)]
    max_entry_length: usize,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Run(args) => cmd_run(args),
        Commands::Parse(args) => cmd_parse(args),
    }
}

fn init_tracing(verbose: u8) {
    let default_filter = match verbose {
        0 => "warn,aidelog=info,aidelog_core=info,aidelog_parser=info,aidelog_workflow=info",
        1 => "info,aidelog=debug,aidelog_core=debug,aidelog_parser=debug,aidelog_workflow=debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn cmd_run(args: RunArgs) -> ExitCode {
    let config = Config {
        db_new: args.db_new,
        db_current: args.db_current,
        report_source: args.report,
        report_temp: args.report_temp,
        report_dest: args.report_dest,
        aide_program: args.aide_program,
        max_entry_length: args.max_entry_length,
        command_timeout: args.timeout_secs.map(Duration::from_secs),
    };

    match Workflow::system(config).run() {
        Ok(record) => {
            info!(
                added = record.added_entries.len(),
                removed = record.removed_entries.len(),
                changed = record.changed_entries.len(),
                "run finished"
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(error = %err, resumable = err.is_resumable(), "workflow aborted");
            ExitCode::from(err.exit_code() as u8)
        }
    }
}

fn cmd_parse(args: ParseArgs) -> ExitCode {
    match parse_report(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %format!("{err:#}"), "parse failed");
            // Structural parse failures keep the exit code the workflow
            // would use for a malformed report; everything else is I/O.
            if err.downcast_ref::<ParseError>().is_some() {
                ExitCode::from(4)
            } else {
                ExitCode::from(1)
            }
        }
    }
}

fn parse_report(args: &ParseArgs) -> Result<()> {
    let text = std::fs::read_to_string(&args.report)
        .with_context(|| format!("reading report {}", args.report.display()))?;

    let record = ReportParser::with_max_entry_length(args.max_entry_length).parse(&text)?;
    let line = record.to_json_line().context("serializing record")?;

    match &args.output {
        Some(path) => std::fs::write(path, &line)
            .with_context(|| format!("writing record to {}", path.display()))?,
        None => print!("{line}"),
    }
    Ok(())
}
