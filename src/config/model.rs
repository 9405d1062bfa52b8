// src/config/model.rs

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::types::FlowOptions;

/// Flow file as read from TOML, before validation.
///
/// ```toml
/// [flow]
/// name = "build"
/// timeout = 30000
/// debug = false
///
/// [task.fetch]
/// cmd = "echo fetched"
///
/// [task.build]
/// cmd = "echo building"
/// after = ["fetch"]
/// ```
///
/// All sections are optional and have reasonable defaults, but validation
/// requires at least one task.
#[derive(Debug, Clone, Deserialize)]
pub struct RawFlowFile {
    /// Flow name and execution options from `[flow]`.
    #[serde(default)]
    pub flow: FlowSection,

    /// All tasks from `[task.<name>]`, keyed by task name.
    #[serde(default)]
    pub task: BTreeMap<String, TaskConfig>,
}

/// `[flow]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct FlowSection {
    /// Used in logs and error messages only.
    #[serde(default = "default_flow_name")]
    pub name: String,

    /// `timeout` (milliseconds) and `debug`.
    #[serde(flatten)]
    pub options: FlowOptions,
}

fn default_flow_name() -> String {
    "flow".to_string()
}

impl Default for FlowSection {
    fn default() -> Self {
        Self {
            name: default_flow_name(),
            options: FlowOptions::default(),
        }
    }
}

/// `[task.<name>]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskConfig {
    /// The shell command to execute.
    pub cmd: String,

    /// Dependency list: this task waits for all tasks listed here.
    #[serde(default)]
    pub after: Vec<String>,
}

/// A validated flow file.
///
/// Only constructible through `TryFrom<RawFlowFile>` (see
/// [`crate::config::validate`]), so holders can rely on the task graph being
/// well-formed.
#[derive(Debug, Clone)]
pub struct FlowFile {
    pub flow: FlowSection,
    pub task: BTreeMap<String, TaskConfig>,
}

impl FlowFile {
    pub(crate) fn new_unchecked(flow: FlowSection, task: BTreeMap<String, TaskConfig>) -> Self {
        Self { flow, task }
    }
}
