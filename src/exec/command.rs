// src/exec/command.rs

//! Shell-command executor.

use std::fmt;
use std::process::Stdio;

use anyhow::{Context as _, Result, bail};
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tokio::process::Command;
use tracing::{debug, info};

use crate::context::ContextView;
use crate::engine::TaskName;
use crate::task::{TaskExecutor, TaskFuture};

/// Prefix of the environment variables that carry dependency outputs.
pub const OUTPUT_ENV_PREFIX: &str = "FLOWDAG_OUT_";

/// Output of a finished shell command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub exit_code: i32,
}

impl fmt::Display for CommandOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.stdout.trim_end())
    }
}

/// Runs `cmd` through the platform shell.
///
/// - stdout becomes the task's output; stderr is logged at `debug`.
/// - The stdout of every dependency is exported to the child as
///   `FLOWDAG_OUT_<NAME>` (see [`output_env_var`]).
/// - A non-zero exit status is a task failure.
#[derive(Debug, Clone)]
pub struct CommandExecutor {
    task: TaskName,
    cmd: String,
    deps: Vec<TaskName>,
}

impl CommandExecutor {
    pub fn new(task: impl Into<TaskName>, cmd: impl Into<String>, deps: Vec<TaskName>) -> Self {
        Self {
            task: task.into(),
            cmd: cmd.into(),
            deps,
        }
    }
}

impl TaskExecutor<CommandOutput> for CommandExecutor {
    fn execute(&self, ctx: ContextView<CommandOutput>) -> TaskFuture<CommandOutput> {
        let env: Vec<(String, String)> = self
            .deps
            .iter()
            .filter_map(|dep| {
                ctx.get(dep)
                    .map(|out| (output_env_var(dep), out.stdout.trim_end().to_string()))
            })
            .collect();

        let task = self.task.clone();
        let cmd = self.cmd.clone();

        Box::pin(async move { run_command(&task, &cmd, env).await })
    }
}

/// Environment variable name for the output of `task`:
/// upper-cased, every non-alphanumeric character replaced by `_`.
pub fn output_env_var(task: &str) -> String {
    let suffix: String = task
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect();
    format!("{OUTPUT_ENV_PREFIX}{suffix}")
}

async fn run_command(task: &str, cmd_line: &str, env: Vec<(String, String)>) -> Result<CommandOutput> {
    info!(task = %task, cmd = %cmd_line, "starting task process");

    // Build a shell command appropriate for the platform.
    let mut cmd = if cfg!(windows) {
        let mut c = Command::new("cmd");
        c.arg("/C").arg(cmd_line);
        c
    } else {
        let mut c = Command::new("sh");
        c.arg("-c").arg(cmd_line);
        c
    };

    cmd.envs(env)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = cmd
        .spawn()
        .with_context(|| format!("spawning process for task '{task}'"))?;

    // Always consume stderr so buffers don't fill; log at debug.
    if let Some(stderr) = child.stderr.take() {
        let task_name = task.to_string();
        tokio::spawn(async move {
            let reader = BufReader::new(stderr);
            let mut lines = reader.lines();

            while let Ok(Some(line)) = lines.next_line().await {
                debug!(task = %task_name, "stderr: {}", line);
            }
        });
    }

    let mut stdout = String::new();
    if let Some(mut out) = child.stdout.take() {
        out.read_to_string(&mut stdout)
            .await
            .with_context(|| format!("reading stdout of task '{task}'"))?;
    }

    let status = child
        .wait()
        .await
        .with_context(|| format!("waiting for process of task '{task}'"))?;

    let exit_code = status.code().unwrap_or(-1);
    info!(
        task = %task,
        exit_code,
        success = status.success(),
        "task process exited"
    );

    if !status.success() {
        bail!("command `{cmd_line}` exited with status {exit_code}");
    }

    Ok(CommandOutput { stdout, exit_code })
}
