//! Keel CLI - Inspect and check installer modules.
//!
//! Reads `module.desc` files the same way the installer does and reports
//! what the descriptor subsystem makes of them.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use keel_telemetry::{LogConfig, LogFormat, setup_logging};

mod commands;

use commands::{check, inspect};

/// Keel - installer module tools
#[derive(Parser)]
#[command(name = "keel")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log level or filter directive
    #[arg(long, global = true, env = "KEEL_LOG", default_value = "warn")]
    log_level: String,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Pretty)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the descriptor of each module, or why it is invalid
    Inspect {
        /// Module directories or `module.desc` files
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// Register modules together and verify their requiredModules
    Check {
        /// Module directories or `module.desc` files
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
}

/// How command results are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Human-readable, colored text.
    Pretty,
    /// One JSON document on stdout.
    Json,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        "debug"
    } else {
        cli.log_level.as_str()
    };
    let log_config = LogConfig::new(level).with_format(LogFormat::Compact);
    if let Err(e) = setup_logging(&log_config) {
        eprintln!("Failed to initialize logging: {e}");
    }

    let passed = match cli.command {
        Commands::Inspect { paths } => inspect::run_inspect(&paths, cli.format)?,
        Commands::Check { paths } => check::run_check(&paths, cli.format)?,
    };

    Ok(if passed {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
