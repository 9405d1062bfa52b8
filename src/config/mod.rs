// src/config/mod.rs

//! Flow-file loading and validation.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a flow file from disk (`loader.rs`).
//! - Validate it and turn it into a runnable flow (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_config_path, load_and_validate, load_from_path, parse_str};
pub use model::{FlowFile, FlowSection, RawFlowFile, TaskConfig};
