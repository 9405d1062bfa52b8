// tests/flow_validation.rs

mod common;
use crate::common::{ExecutionLog, flow_of, init_tracing, ok_task, with_timeout};

use flowdag::dag::{DagGraph, validate_graph};
use flowdag::{Flow, FlowError, Task};

fn edges(pairs: &[(&str, &[&str])]) -> DagGraph {
    DagGraph::from_edges(pairs.iter().map(|(name, deps)| {
        (name.to_string(), deps.iter().map(|d| d.to_string()).collect())
    }))
}

#[tokio::test]
async fn two_task_cycle_is_rejected_before_anything_runs() {
    init_tracing();

    let log = ExecutionLog::new();
    let flow = flow_of(
        "cycle",
        vec![ok_task("X", &["Y"], &log), ok_task("Y", &["X"], &log)],
    );

    let result = with_timeout(flow.run()).await;

    match result {
        Err(FlowError::CircularDependency { task, path }) => {
            assert!(task == "X" || task == "Y", "unexpected task {task}");
            assert_eq!(path.first(), path.last(), "path should close the cycle: {path:?}");
            assert!(path.iter().any(|p| p == "X") && path.iter().any(|p| p == "Y"));
        }
        Err(e) => panic!("Expected CircularDependency error, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
    assert!(log.started().is_empty(), "no executor may run for a cyclic flow");
}

#[tokio::test]
async fn self_dependency_is_a_cycle() {
    init_tracing();

    let log = ExecutionLog::new();
    let flow = flow_of("self", vec![ok_task("loop", &["loop"], &log)]);

    let err = with_timeout(flow.run()).await.expect_err("self-dependency must fail");

    assert!(err.is_structural());
    match err {
        FlowError::CircularDependency { task, path } => {
            assert_eq!(task, "loop");
            assert_eq!(path, vec!["loop".to_string(), "loop".to_string()]);
        }
        e => panic!("Expected CircularDependency error, got: {:?}", e),
    }
    assert!(!log.was_invoked("loop"));
}

#[tokio::test]
async fn unknown_dependency_names_the_missing_task() {
    init_tracing();

    let log = ExecutionLog::new();
    let flow = flow_of(
        "unknown",
        vec![ok_task("present", &[], &log), ok_task("needy", &["ghost"], &log)],
    );

    let err = with_timeout(flow.run()).await.expect_err("unknown dependency must fail");

    match &err {
        FlowError::UnknownDependency { task, dependency } => {
            assert_eq!(task, "needy");
            assert_eq!(dependency, "ghost");
        }
        e => panic!("Expected UnknownDependency error, got: {:?}", e),
    }
    assert!(err.to_string().contains("ghost"));
    assert!(log.started().is_empty());
}

#[test]
fn duplicate_task_name_is_rejected_on_registration() {
    let mut flow: Flow<u8> = Flow::new("dupes");
    flow.add_task(Task::from_fn("same", |_| Ok(1))).unwrap();

    let err = flow
        .add_task(Task::from_fn("same", |_| Ok(2)))
        .map(|_| ())
        .expect_err("duplicate must fail");

    match err {
        FlowError::DuplicateTaskName(name) => assert_eq!(name, "same"),
        e => panic!("Expected DuplicateTaskName error, got: {:?}", e),
    }
    assert_eq!(flow.tasks().len(), 1);
}

#[test]
fn empty_task_name_is_rejected() {
    let mut flow: Flow<u8> = Flow::new("unnamed");
    let err = flow
        .add_task(Task::from_fn("", |_| Ok(1)))
        .map(|_| ())
        .expect_err("empty name must fail");

    assert!(matches!(err, FlowError::EmptyTaskName));
    assert!(flow.tasks().is_empty());
}

#[test]
fn repeated_dependencies_are_collapsed() {
    let task: Task<u8> = Task::from_fn("t", |_| Ok(0)).depends_on(["a", "b", "a"]);
    assert_eq!(task.dependencies(), ["a".to_string(), "b".to_string()]);
}

#[test]
fn validate_reports_longer_cycles_with_their_path() {
    let graph = edges(&[
        ("entry", &[]),
        ("a", &["entry", "c"]),
        ("b", &["a"]),
        ("c", &["b"]),
    ]);

    match validate_graph(&graph) {
        Err(FlowError::CircularDependency { path, .. }) => {
            assert_eq!(path.len(), 4, "three-node cycle plus closing node: {path:?}");
            assert_eq!(path.first(), path.last());
            assert!(!path.iter().any(|p| p == "entry"), "entry is not on the cycle");
        }
        other => panic!("Expected CircularDependency error, got: {:?}", other),
    }
    assert!(graph.execution_order().is_none());
}

#[test]
fn execution_order_respects_dependencies() {
    let graph = edges(&[
        ("deploy", &["test", "build"]),
        ("test", &["build"]),
        ("build", &["fetch"]),
        ("fetch", &[]),
        ("docs", &[]),
    ]);

    validate_graph(&graph).unwrap();

    let order = graph.execution_order().expect("acyclic graph has an order");
    assert_eq!(order.len(), 5);
    let pos = |name: &str| order.iter().position(|n| *n == name).unwrap();
    assert!(pos("fetch") < pos("build"));
    assert!(pos("build") < pos("test"));
    assert!(pos("test") < pos("deploy"));

    let mut roots = graph.roots();
    roots.sort();
    assert_eq!(roots, vec!["docs", "fetch"]);
    assert_eq!(graph.dependents_of("build"), ["deploy".to_string(), "test".to_string()]);
    assert_eq!(graph.dependencies_of("deploy"), ["test".to_string(), "build".to_string()]);
}

#[test]
fn validate_on_flow_returns_graph_without_running() {
    let log = ExecutionLog::new();
    let flow = flow_of(
        "dry",
        vec![ok_task("a", &[], &log), ok_task("b", &["a"], &log)],
    );

    let graph = flow.validate().unwrap();

    assert_eq!(graph.len(), 2);
    assert!(graph.contains("b"));
    assert_eq!(graph.tasks().collect::<Vec<_>>(), vec!["a", "b"]);
    assert!(log.started().is_empty());
}
