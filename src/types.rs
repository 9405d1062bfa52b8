use std::time::Duration;

use serde::Deserialize;

/// Default per-task deadline, in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Execution options of a flow.
///
/// Deserialises from the `[flow]` table of a flow file, where `timeout` is
/// given in milliseconds:
///
/// ```toml
/// [flow]
/// timeout = 5000
/// debug = true
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct FlowOptions {
    /// Deadline for each task, measured from dispatch (so it covers the wait
    /// for dependencies as well as the task's own execution).
    #[serde(default = "default_timeout", deserialize_with = "deserialize_millis")]
    pub timeout: Duration,

    /// Emit dispatch / resolution / completion events at `info` instead of
    /// `trace`.
    #[serde(default)]
    pub debug: bool,
}

impl FlowOptions {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_timeout_ms(self, ms: u64) -> Self {
        self.with_timeout(Duration::from_millis(ms))
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}

impl Default for FlowOptions {
    fn default() -> Self {
        Self {
            timeout: default_timeout(),
            debug: false,
        }
    }
}

fn default_timeout() -> Duration {
    Duration::from_millis(DEFAULT_TIMEOUT_MS)
}

fn deserialize_millis<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let ms = u64::deserialize(deserializer)?;
    Ok(Duration::from_millis(ms))
}
