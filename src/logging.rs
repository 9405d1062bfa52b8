// src/logging.rs

//! Logging for the `flowdag` binary and the engine's diagnostic events.
//!
//! The engine never installs a subscriber; it emits `tracing` events with a
//! `task` field and leaves collection to the embedding application. The
//! binary installs one via [`init_logging`], writing to stderr because
//! stdout carries the `[task] output` lines. Its level comes from
//! `--log-level`, else `FLOWDAG_LOG` (e.g. `FLOWDAG_LOG=debug flowdag`),
//! else `info`.
//!
//! Per-task dispatch, dependency resolution and completion go through
//! [`diag!`]: `info` for flows with `debug = true` (or `--debug`), `trace`
//! otherwise, so they stay out of default output.

use anyhow::Result;
use tracing_subscriber::fmt;

use crate::cli::LogLevel;

/// Install the binary's stderr subscriber. Fails if one is already set.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let level = match cli_level {
        Some(lvl) => level_from_log_level(lvl),
        None => std::env::var("FLOWDAG_LOG")
            .ok()
            .and_then(|s| parse_level_str(&s))
            .unwrap_or(tracing::Level::INFO),
    };

    fmt()
        .with_max_level(level)
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}"))?;

    Ok(())
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

pub fn parse_level_str(s: &str) -> Option<tracing::Level> {
    match s.trim().to_lowercase().as_str() {
        "error" => Some(tracing::Level::ERROR),
        "warn" | "warning" => Some(tracing::Level::WARN),
        "info" => Some(tracing::Level::INFO),
        "debug" => Some(tracing::Level::DEBUG),
        "trace" => Some(tracing::Level::TRACE),
        _ => None,
    }
}

/// Diagnostic event for a flow's dispatch/resolution/completion steps.
///
/// Emitted at `info` when the flow's `debug` option is set, else at `trace`.
macro_rules! diag {
    ($debug:expr, $($arg:tt)+) => {
        if $debug {
            ::tracing::info!($($arg)+);
        } else {
            ::tracing::trace!($($arg)+);
        }
    };
}

pub(crate) use diag;
