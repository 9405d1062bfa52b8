// src/dag/mod.rs

//! Dependency graph representation and validation.
//!
//! - [`graph`] holds the name-keyed dependency graph of a flow.
//! - [`validate`] rejects unknown dependencies and cycles before a run
//!   dispatches anything.

pub mod graph;
pub mod validate;

pub use graph::DagGraph;
pub use validate::validate_graph;
