// src/logging.rs

//! Logging setup for `rendwatch` using `tracing` + `tracing-subscriber`.
//!
//! Priority for determining the log level:
//! 1. `--silent` (errors only)
//! 2. `--log-level` CLI flag (if provided)
//! 3. `RENDWATCH_LOG` environment variable (e.g. "info", "debug")
//! 4. default to `info`
//!
//! Logs are sent to STDERR so that stdout can carry rendered output.

use anyhow::Result;
use tracing_subscriber::fmt;

use crate::cli::LogLevel;

/// Initialise global logging subscriber.
///
/// Safe to call once at startup.
pub fn init_logging(cli_level: Option<LogLevel>, silent: bool) -> Result<()> {
    let level = resolve_level(cli_level, silent, std::env::var("RENDWATCH_LOG").ok());

    fmt()
        .with_max_level(level)
        .with_target(false)
        .without_time()
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}

/// Pick the effective level from the CLI flags and the env var value.
pub fn resolve_level(
    cli_level: Option<LogLevel>,
    silent: bool,
    env_value: Option<String>,
) -> tracing::Level {
    if silent {
        return tracing::Level::ERROR;
    }
    match cli_level {
        Some(lvl) => level_from_log_level(lvl),
        None => env_value
            .and_then(|s| parse_level_str(&s))
            .unwrap_or(tracing::Level::INFO),
    }
}

fn level_from_log_level(lvl: LogLevel) -> tracing::Level {
    match lvl {
        LogLevel::Error => tracing::Level::ERROR,
        LogLevel::Warn => tracing::Level::WARN,
        LogLevel::Info => tracing::Level::INFO,
        LogLevel::Debug => tracing::Level::DEBUG,
        LogLevel::Trace => tracing::Level::TRACE,
    }
}

fn parse_level_str(s: &str) -> Option<tracing::Level> {
    match s.trim().to_lowercase().as_str() {
        "error" => Some(tracing::Level::ERROR),
        "warn" | "warning" => Some(tracing::Level::WARN),
        "info" => Some(tracing::Level::INFO),
        "debug" => Some(tracing::Level::DEBUG),
        "trace" => Some(tracing::Level::TRACE),
        _ => None,
    }
}
