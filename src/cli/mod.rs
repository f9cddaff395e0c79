//! Command-line parsing for the request carbon estimator.
//!
//! Argument parsing and command dispatch stay separate from the evaluation code.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "carbon", version, about = "Per-request energy and carbon estimates for reverse-proxy traffic")]
pub struct Cli {
    /// Log verbosity (overrides CARBON_LOG and RUST_LOG).
    #[arg(long, global = true, value_enum)]
    pub log_level: Option<LogLevel>,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Compute the carbon headers for a single request.
    Eval(EvalArgs),
    /// Evaluate every row of an access-log CSV.
    Replay(ReplayArgs),
    /// Load the endpoint configuration and print what each path resolves to.
    Check(CheckArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_filter(self) -> &'static str {
        match self {
            LogLevel::Off => "off",
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

/// Options for a single request evaluation.
///
/// Timing and size values are passed exactly as the proxy exposes them
/// (e.g. `--upstream-time "0.120, 0.300"` or `--upstream-time -`).
#[derive(Debug, Parser, Clone)]
pub struct EvalArgs {
    /// Endpoint configuration JSON (defaults to $CARBON_CONFIG).
    #[arg(long, value_name = "JSON")]
    pub config: Option<PathBuf>,

    /// Request path.
    #[arg(long, default_value = "/")]
    pub path: String,

    /// Upstream response time in seconds.
    #[arg(long, allow_hyphen_values = true)]
    pub upstream_time: Option<String>,

    /// Total request time in seconds.
    #[arg(long, allow_hyphen_values = true)]
    pub request_time: Option<String>,

    /// Request length in bytes.
    #[arg(long, allow_hyphen_values = true)]
    pub request_length: Option<String>,

    /// Response body bytes sent.
    #[arg(long, allow_hyphen_values = true)]
    pub body_bytes: Option<String>,

    /// Print a JSON object instead of header lines.
    #[arg(long)]
    pub json: bool,
}

/// Options for replaying an access log.
#[derive(Debug, Parser, Clone)]
pub struct ReplayArgs {
    /// Endpoint configuration JSON (defaults to $CARBON_CONFIG).
    #[arg(long, value_name = "JSON")]
    pub config: Option<PathBuf>,

    /// Access-log CSV (`uri` column required).
    #[arg(long, value_name = "CSV")]
    pub log: PathBuf,

    /// Export per-request metrics to CSV.
    #[arg(long)]
    pub export: Option<PathBuf>,
}

/// Options for checking a configuration.
#[derive(Debug, Parser, Clone)]
pub struct CheckArgs {
    /// Endpoint configuration JSON (defaults to $CARBON_CONFIG).
    #[arg(long, value_name = "JSON")]
    pub config: Option<PathBuf>,
}
