// src/dag/graph.rs

use std::collections::HashMap;

use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;

use crate::engine::TaskName;
use crate::task::Task;

/// Internal node structure: stores immediate deps and dependents.
#[derive(Debug, Clone)]
struct DagNode {
    /// Position of the task in registration order.
    index: usize,
    /// Direct dependencies: tasks that must succeed before this one can run.
    deps: Vec<TaskName>,
    /// Direct dependents: tasks that depend on this one.
    dependents: Vec<TaskName>,
}

/// In-memory dependency graph keyed by task name.
///
/// Construction never fails: unknown dependency names are kept as declared
/// so that [`crate::dag::validate`] can report them. Dependents are only
/// recorded for registered tasks.
#[derive(Debug, Clone)]
pub struct DagGraph {
    nodes: HashMap<TaskName, DagNode>,
    /// Task names in registration order.
    order: Vec<TaskName>,
}

impl DagGraph {
    /// Build the graph from a flow's task list.
    pub fn from_tasks<T>(tasks: &[Task<T>]) -> Self {
        Self::from_edges(
            tasks
                .iter()
                .map(|t| (t.name().to_string(), t.dependencies().to_vec())),
        )
    }

    /// Build the graph from `(task, deps)` pairs, in registration order.
    pub fn from_edges<I>(edges: I) -> Self
    where
        I: IntoIterator<Item = (TaskName, Vec<TaskName>)>,
    {
        let mut nodes: HashMap<TaskName, DagNode> = HashMap::new();
        let mut order = Vec::new();

        // First pass: create nodes with their dependency lists.
        for (name, deps) in edges {
            if nodes.contains_key(&name) {
                continue;
            }
            nodes.insert(
                name.clone(),
                DagNode {
                    index: order.len(),
                    deps,
                    dependents: Vec::new(),
                },
            );
            order.push(name);
        }

        // Second pass: populate dependents based on deps.
        for task_name in order.iter() {
            let deps = nodes
                .get(task_name)
                .map(|n| n.deps.clone())
                .unwrap_or_default();

            for dep in deps {
                if let Some(dep_node) = nodes.get_mut(&dep) {
                    dep_node.dependents.push(task_name.clone());
                }
            }
        }

        Self { nodes, order }
    }

    /// All task names, in registration order.
    pub fn tasks(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.nodes.contains_key(name)
    }

    /// Immediate dependencies of a task.
    pub fn dependencies_of(&self, name: &str) -> &[TaskName] {
        self.nodes
            .get(name)
            .map(|n| n.deps.as_slice())
            .unwrap_or(&[])
    }

    /// Immediate dependents of a task (tasks that list this one as a dependency).
    pub fn dependents_of(&self, name: &str) -> &[TaskName] {
        self.nodes
            .get(name)
            .map(|n| n.dependents.as_slice())
            .unwrap_or(&[])
    }

    /// Tasks without dependencies, in registration order.
    pub fn roots(&self) -> Vec<&str> {
        self.tasks()
            .filter(|name| self.dependencies_of(name).is_empty())
            .collect()
    }

    /// A topological order (dependencies first), or `None` if the graph has a
    /// cycle. Deterministic for a given registration order.
    ///
    /// Unknown dependency names are ignored here; run
    /// [`crate::dag::validate_graph`] first for a precise error.
    pub fn execution_order(&self) -> Option<Vec<&str>> {
        // Edge direction: dep -> task.
        let mut graph: DiGraphMap<usize, ()> = DiGraphMap::new();

        for name in self.order.iter() {
            graph.add_node(self.nodes[name].index);
        }

        for name in self.order.iter() {
            let node = &self.nodes[name];
            for dep in node.deps.iter() {
                if let Some(dep_node) = self.nodes.get(dep) {
                    graph.add_edge(dep_node.index, node.index, ());
                }
            }
        }

        toposort(&graph, None)
            .ok()
            .map(|sorted| sorted.into_iter().map(|i| self.order[i].as_str()).collect())
    }
}
