// src/dag/validate.rs

//! Structural validation of a task graph.
//!
//! Runs synchronously before dispatch. Checks, in order:
//! - every declared dependency names a registered task,
//! - the dependency relation has no cycle (self-dependency included).

use std::collections::HashMap;

use tracing::debug;

use crate::dag::graph::DagGraph;
use crate::errors::{FlowError, Result};

/// DFS colouring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    /// Not visited yet.
    White,
    /// On the current DFS path.
    Gray,
    /// Fully explored.
    Black,
}

pub fn validate_graph(graph: &DagGraph) -> Result<()> {
    validate_dependencies(graph)?;
    detect_cycles(graph)?;
    debug!(tasks = graph.len(), "task graph validated");
    Ok(())
}

fn validate_dependencies(graph: &DagGraph) -> Result<()> {
    for name in graph.tasks() {
        for dep in graph.dependencies_of(name) {
            if !graph.contains(dep) {
                return Err(FlowError::UnknownDependency {
                    task: name.to_string(),
                    dependency: dep.clone(),
                });
            }
        }
    }
    Ok(())
}

/// Iterative depth-first search over task -> dependencies.
///
/// Every task is coloured black exactly once, so the whole pass is
/// O(tasks + edges). Reaching a gray task means the current path loops back
/// on itself; the reported path runs from that task round to it again.
fn detect_cycles(graph: &DagGraph) -> Result<()> {
    let mut marks: HashMap<&str, Mark> = graph.tasks().map(|t| (t, Mark::White)).collect();

    for root in graph.tasks() {
        if marks[root] != Mark::White {
            continue;
        }

        // (task, index of the next dependency to look at)
        let mut stack: Vec<(&str, usize)> = vec![(root, 0)];
        marks.insert(root, Mark::Gray);

        while let Some(top) = stack.last_mut() {
            let (node, next) = *top;
            let deps = graph.dependencies_of(node);

            if next == deps.len() {
                marks.insert(node, Mark::Black);
                stack.pop();
                continue;
            }
            top.1 += 1;

            let dep = deps[next].as_str();
            match marks.get(dep).copied() {
                Some(Mark::White) => {
                    marks.insert(dep, Mark::Gray);
                    stack.push((dep, 0));
                }
                Some(Mark::Gray) => {
                    let start = stack
                        .iter()
                        .position(|(n, _)| *n == dep)
                        .unwrap_or(0);
                    let mut path: Vec<String> =
                        stack[start..].iter().map(|(n, _)| n.to_string()).collect();
                    path.push(dep.to_string());
                    return Err(FlowError::CircularDependency {
                        task: dep.to_string(),
                        path,
                    });
                }
                // Black, or unknown (already rejected by validate_dependencies).
                Some(Mark::Black) | None => {}
            }
        }
    }

    Ok(())
}
