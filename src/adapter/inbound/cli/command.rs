//! Command-line interface definitions.
//!
//! Defines the CLI structure for the dispatch optimizer using `clap`. The CLI
//! runs the binary worker, solves JSON model files directly, and inspects
//! configuration.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// LP dispatch optimization and Monte Carlo risk worker
#[derive(Parser, Debug)]
#[command(name = "dispatch-optimizer")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Serve binary requests on stdio or a TCP address
    Serve(ServeArgs),

    /// Solve or simulate a JSON model file and print the result as JSON
    Solve(SolveArgs),

    /// Inspect configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

/// Arguments for `serve`.
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Listen on this TCP address instead of stdin/stdout (e.g. 127.0.0.1:7070)
    #[arg(short, long)]
    pub listen: Option<String>,

    /// Path to the configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// Arguments for `solve`.
#[derive(Parser, Debug)]
pub struct SolveArgs {
    /// JSON file with `model`, `variables` and optional `scenarios`
    pub path: PathBuf,

    /// Run a Monte Carlo simulation with this many scenarios
    #[arg(short, long)]
    pub scenarios: Option<u32>,

    /// Path to the configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// Subcommands for `config`.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Display the effective configuration with defaults applied
    Show(ConfigPathArg),
    /// Validate a configuration file
    Validate(ConfigPathArg),
}

/// Optional configuration file path; defaults apply when omitted.
#[derive(Parser, Debug)]
pub struct ConfigPathArg {
    /// Path to the configuration file
    pub path: Option<PathBuf>,
}
