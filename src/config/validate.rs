// src/config/validate.rs

use std::collections::BTreeMap;

use crate::config::model::{FlowFile, FlowSection, RawFlowFile, TaskConfig};
use crate::engine::Flow;
use crate::errors::{FlowError, Result};
use crate::exec::{CommandExecutor, CommandOutput};
use crate::task::Task;

impl TryFrom<RawFlowFile> for FlowFile {
    type Error = FlowError;

    fn try_from(raw: RawFlowFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(FlowFile::new_unchecked(raw.flow, raw.task))
    }
}

impl FlowFile {
    /// Build the runnable flow: one [`CommandExecutor`] task per
    /// `[task.<name>]` section.
    pub fn to_flow(&self) -> Result<Flow<CommandOutput>> {
        build_flow(&self.flow, &self.task)
    }
}

fn validate_raw_config(cfg: &RawFlowFile) -> Result<()> {
    ensure_has_tasks(cfg)?;
    validate_flow_section(cfg)?;
    validate_commands(cfg)?;
    validate_task_graph(cfg)?;
    Ok(())
}

fn ensure_has_tasks(cfg: &RawFlowFile) -> Result<()> {
    if cfg.task.is_empty() {
        return Err(FlowError::Config(
            "flow file must contain at least one [task.<name>] section".to_string(),
        ));
    }
    Ok(())
}

fn validate_flow_section(cfg: &RawFlowFile) -> Result<()> {
    if cfg.flow.options.timeout.is_zero() {
        return Err(FlowError::Config(
            "[flow].timeout must be >= 1 millisecond (got 0)".to_string(),
        ));
    }
    Ok(())
}

fn validate_commands(cfg: &RawFlowFile) -> Result<()> {
    for (name, task) in cfg.task.iter() {
        if task.cmd.trim().is_empty() {
            return Err(FlowError::Config(format!(
                "task '{name}' has an empty `cmd`"
            )));
        }
    }
    Ok(())
}

/// Unknown `after` entries and cycles are reported with the same errors a
/// programmatic flow would produce.
fn validate_task_graph(cfg: &RawFlowFile) -> Result<()> {
    build_flow(&cfg.flow, &cfg.task)?.validate()?;
    Ok(())
}

fn build_flow(
    section: &FlowSection,
    tasks: &BTreeMap<String, TaskConfig>,
) -> Result<Flow<CommandOutput>> {
    let mut flow = Flow::with_options(section.name.clone(), section.options);
    for (name, task) in tasks.iter() {
        let executor = CommandExecutor::new(name.clone(), task.cmd.clone(), task.after.clone());
        flow.add_task(Task::new(name.clone(), executor).depends_on(task.after.iter().cloned()))?;
    }
    Ok(flow)
}
