// src/lib.rs

//! In-process task orchestration.
//!
//! Register named [`Task`]s with their dependencies on a [`Flow`], then
//! `run` it: every task is dispatched concurrently, starts once all of its
//! dependencies have succeeded, reads their outputs from the shared
//! [`Context`], and is bounded by the flow's timeout. The run returns the
//! full context, or an aggregate error listing every failed, timed-out or
//! skipped task.
//!
//! ```no_run
//! use flowdag::{Flow, Task};
//!
//! # async fn demo() -> flowdag::errors::Result<()> {
//! let mut flow = Flow::new("numbers");
//! flow.add_task(Task::from_fn("a", |_| Ok(1)))?
//!     .add_task(Task::from_fn("b", |ctx| Ok(*ctx.require("a")? + 1)).depends_on(["a"]))?;
//!
//! let ctx = flow.run().await?;
//! assert_eq!(ctx.get("b"), Some(&2));
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod context;
pub mod dag;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod task;
pub mod types;

use anyhow::Result;
use tracing::{debug, info};

pub use crate::context::{Context, ContextView};
pub use crate::engine::{Flow, RunReport, TaskName, TaskReport};
pub use crate::errors::{AggregateFlowFailure, FlowError, TaskFailure};
pub use crate::task::{Task, TaskExecutor, TaskFuture};
pub use crate::types::FlowOptions;

use crate::cli::CliArgs;
use crate::config::loader::{default_config_path, load_and_validate};
use crate::config::model::FlowFile;

/// High-level entry point used by `main.rs`.
///
/// Loads and validates the flow file, applies CLI overrides, and runs the
/// flow once (or prints it for `--dry-run`). Task outputs are printed to
/// stdout in execution order.
pub async fn run(args: CliArgs) -> Result<()> {
    let config_path = args.config.clone().unwrap_or_else(default_config_path);
    let mut cfg = load_and_validate(&config_path)?;

    if let Some(ms) = args.timeout {
        cfg.flow.options = cfg.flow.options.with_timeout_ms(ms);
    }
    if args.debug {
        cfg.flow.options = cfg.flow.options.with_debug(true);
    }

    if args.dry_run {
        print_dry_run(&cfg)?;
        return Ok(());
    }

    let flow = cfg.to_flow()?;
    let graph = flow.validate()?;
    let ctx = flow.run().await?;

    info!(flow = %flow.name(), tasks = ctx.len(), "all tasks succeeded");

    for name in graph.execution_order().unwrap_or_default() {
        if let Some(output) = ctx.get(name) {
            println!("[{name}] {output}");
        }
    }

    Ok(())
}

/// Simple dry-run output: print options, tasks, deps and execution order.
fn print_dry_run(cfg: &FlowFile) -> Result<()> {
    let flow = cfg.to_flow()?;
    let graph = flow.validate()?;

    println!("flowdag dry-run");
    println!("  flow.name = {}", cfg.flow.name);
    println!("  flow.timeout = {}ms", cfg.flow.options.timeout.as_millis());
    println!("  flow.debug = {}", cfg.flow.options.debug);
    println!();

    println!("tasks ({}):", cfg.task.len());
    for (name, task) in cfg.task.iter() {
        println!("  - {name}");
        println!("      cmd: {}", task.cmd);
        if !task.after.is_empty() {
            println!("      after: {:?}", task.after);
        }
    }
    println!();

    println!("roots: {:?}", graph.roots());
    if let Some(order) = graph.execution_order() {
        println!("execution order: {}", order.join(" -> "));
    }

    debug!("dry-run complete (no execution)");
    Ok(())
}
