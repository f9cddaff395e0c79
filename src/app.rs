//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments and environment settings
//! - initializes logging
//! - loads the endpoint table once
//! - runs the requested command against it

use clap::Parser;

use crate::cli::{CheckArgs, Cli, Command, EvalArgs, LogLevel, ReplayArgs};
use crate::domain::RequestRecord;
use crate::error::AppError;
use crate::io::config::load_endpoint_table;
use crate::settings::Settings;

pub mod pipeline;

const DEFAULT_LOG_FILTER: &str = "warn";

/// Entry point for the `carbon` binary.
pub fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let settings = Settings::from_env();
    init_logging(cli.log_level, settings.log_level.as_deref());

    match cli.command {
        Command::Eval(args) => handle_eval(args, &settings),
        Command::Replay(args) => handle_replay(args, &settings),
        Command::Check(args) => handle_check(args, &settings),
    }
}

/// Precedence: `--log-level`, then `RUST_LOG`, then `CARBON_LOG`, then `warn`.
fn init_logging(flag: Option<LogLevel>, env_level: Option<&str>) {
    let mut builder = match flag {
        Some(level) => {
            let mut builder = env_logger::Builder::new();
            builder.parse_filters(level.as_filter());
            builder
        }
        None => {
            let fallback = env_level.unwrap_or(DEFAULT_LOG_FILTER);
            env_logger::Builder::from_env(env_logger::Env::default().filter_or("RUST_LOG", fallback))
        }
    };
    builder.format_timestamp(None).format_module_path(false).init();
}

fn handle_eval(args: EvalArgs, settings: &Settings) -> Result<(), AppError> {
    let config_path = settings.resolve_config_path(args.config.clone())?;
    let loaded = load_endpoint_table(&config_path)?;

    let record = request_record_from_args(&args);
    let (path, matched, metrics) = pipeline::evaluate_request(&loaded.table, &record);

    if args.json {
        println!("{}", crate::report::format_eval_json(&path, matched, &metrics)?);
    } else {
        println!("{}", crate::report::format_headers_text(&metrics));
    }
    Ok(())
}

fn handle_replay(args: ReplayArgs, settings: &Settings) -> Result<(), AppError> {
    let config_path = settings.resolve_config_path(args.config.clone())?;
    let loaded = load_endpoint_table(&config_path)?;
    let log = crate::io::ingest::load_access_log(&args.log)?;

    let rows = pipeline::replay(&loaded.table, &log.records);
    print!("{}", crate::report::format_replay(&log, &rows));

    if let Some(path) = &args.export {
        crate::io::export::write_metrics_csv(path, &rows)?;
    }
    Ok(())
}

fn handle_check(args: CheckArgs, settings: &Settings) -> Result<(), AppError> {
    let config_path = settings.resolve_config_path(args.config)?;
    let loaded = load_endpoint_table(&config_path)?;
    print!("{}", crate::report::format_config_summary(&loaded));
    Ok(())
}

pub fn request_record_from_args(args: &EvalArgs) -> RequestRecord {
    RequestRecord {
        uri: Some(args.path.clone()),
        upstream_response_time: args.upstream_time.clone(),
        request_time: args.request_time.clone(),
        request_length: args.request_length.clone(),
        body_bytes_sent: args.body_bytes.clone(),
    }
}
