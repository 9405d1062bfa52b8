#![allow(dead_code)]

use std::collections::BTreeMap;

use flowdag::config::{FlowFile, FlowSection, RawFlowFile, TaskConfig};

/// Builder for `FlowFile` to simplify test setup.
pub struct FlowFileBuilder {
    config: RawFlowFile,
}

impl FlowFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawFlowFile {
                flow: FlowSection::default(),
                task: BTreeMap::new(),
            },
        }
    }

    pub fn name(mut self, name: &str) -> Self {
        self.config.flow.name = name.to_string();
        self
    }

    pub fn timeout_ms(mut self, ms: u64) -> Self {
        self.config.flow.options = self.config.flow.options.with_timeout_ms(ms);
        self
    }

    pub fn debug(mut self, val: bool) -> Self {
        self.config.flow.options = self.config.flow.options.with_debug(val);
        self
    }

    pub fn with_task(mut self, name: &str, task: TaskConfig) -> Self {
        self.config.task.insert(name.to_string(), task);
        self
    }

    /// The unvalidated file, for exercising `TryFrom` failures.
    pub fn raw(self) -> RawFlowFile {
        self.config
    }

    pub fn build(self) -> FlowFile {
        FlowFile::try_from(self.config).expect("Failed to build valid flow file from builder")
    }
}

impl Default for FlowFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `TaskConfig`.
pub struct TaskConfigBuilder {
    task: TaskConfig,
}

impl TaskConfigBuilder {
    pub fn new(cmd: &str) -> Self {
        Self {
            task: TaskConfig {
                cmd: cmd.to_string(),
                after: vec![],
            },
        }
    }

    pub fn after(mut self, dep: &str) -> Self {
        self.task.after.push(dep.to_string());
        self
    }

    pub fn build(self) -> TaskConfig {
        self.task
    }
}
