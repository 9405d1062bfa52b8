// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::model::{FlowFile, RawFlowFile};
use crate::errors::Result;

/// Load a flow file from a given path and return the raw `RawFlowFile`.
///
/// This only performs TOML deserialization; it does **not** perform semantic
/// validation (task graph correctness, etc.). Use [`load_and_validate`] for
/// that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawFlowFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;
    parse_str(&contents)
}

/// Parse flow-file TOML from a string.
pub fn parse_str(contents: &str) -> Result<RawFlowFile> {
    let config: RawFlowFile = toml::from_str(contents)?;
    Ok(config)
}

/// Load a flow file from path and validate it.
///
/// - Reads TOML.
/// - Applies defaults (handled by `serde` + `Default` impls).
/// - Checks for:
///   - at least one task, non-empty commands, a non-zero timeout,
///   - unknown `after` references,
///   - dependency cycles.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<FlowFile> {
    let path = path.as_ref();
    let raw_config = load_from_path(path)?;
    let config = FlowFile::try_from(raw_config)?;
    debug!(path = %path.display(), tasks = config.task.len(), "loaded flow file");
    Ok(config)
}

/// Default flow file location: `Flowdag.toml` in the current working
/// directory.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("Flowdag.toml")
}
