// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Command-line arguments for `flowdag`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "flowdag",
    version,
    about = "Run a flow of shell-command tasks once, respecting their dependencies.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the flow file (TOML). Defaults to `Flowdag.toml` in the
    /// current directory.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Per-task timeout in milliseconds; overrides `[flow].timeout`.
    #[arg(long, value_name = "MS")]
    pub timeout: Option<u64>,

    /// Log dispatch / resolution / completion of every task at info level;
    /// overrides `[flow].debug`.
    #[arg(long)]
    pub debug: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `FLOWDAG_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Parse + validate, print tasks and execution order, but don't run
    /// anything.
    #[arg(long)]
    pub dry_run: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
