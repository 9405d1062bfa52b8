// tests/config_loading.rs

use std::io::Write;
use std::time::Duration;

use tempfile::NamedTempFile;

use flowdag::config::{load_and_validate, parse_str, FlowFile};
use flowdag::errors::FlowError;
use flowdag_test_utils::builders::{FlowFileBuilder, TaskConfigBuilder};

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{contents}").unwrap();
    file
}

#[test]
fn test_full_flow_file_is_parsed() {
    let file = write_config(
        r#"
[flow]
name = "build"
timeout = 1500
debug = true

[task.fetch]
cmd = "echo fetched"

[task.build]
cmd = "echo building"
after = ["fetch"]
"#,
    );

    let cfg = load_and_validate(file.path()).unwrap();

    assert_eq!(cfg.flow.name, "build");
    assert_eq!(cfg.flow.options.timeout, Duration::from_millis(1500));
    assert!(cfg.flow.options.debug);
    assert_eq!(cfg.task.len(), 2);
    assert_eq!(cfg.task["build"].after, vec!["fetch".to_string()]);

    let flow = cfg.to_flow().unwrap();
    assert_eq!(flow.name(), "build");
    assert_eq!(flow.task("build").unwrap().dependencies(), ["fetch".to_string()]);
}

#[test]
fn test_flow_section_defaults() {
    let raw = parse_str(
        r#"
[task.only]
cmd = "true"
"#,
    )
    .unwrap();

    let cfg = FlowFile::try_from(raw).unwrap();
    assert_eq!(cfg.flow.name, "flow");
    assert_eq!(cfg.flow.options.timeout, Duration::from_millis(30_000));
    assert!(!cfg.flow.options.debug);
}

#[test]
fn test_dag_cycle_returns_structured_error() {
    let file = write_config(
        r#"
[task.A]
cmd = "echo A"
after = ["B"]

[task.B]
cmd = "echo B"
after = ["A"]
"#,
    );

    match load_and_validate(file.path()) {
        Err(FlowError::CircularDependency { path, .. }) => {
            assert!(path.iter().any(|p| p == "A"));
            assert!(path.iter().any(|p| p == "B"));
        }
        Err(e) => panic!("Expected CircularDependency error, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn test_unknown_dependency_is_reported() {
    let file = write_config(
        r#"
[task.A]
cmd = "echo A"
after = ["missing"]
"#,
    );

    match load_and_validate(file.path()) {
        Err(FlowError::UnknownDependency { task, dependency }) => {
            assert_eq!(task, "A");
            assert_eq!(dependency, "missing");
        }
        Err(e) => panic!("Expected UnknownDependency error, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn test_config_without_tasks_is_rejected() {
    let err = FlowFile::try_from(FlowFileBuilder::new().raw()).unwrap_err();
    match err {
        FlowError::Config(msg) => assert!(msg.contains("at least one")),
        e => panic!("Expected Config error, got: {:?}", e),
    }
}

#[test]
fn test_zero_timeout_is_rejected() {
    let raw = FlowFileBuilder::new()
        .timeout_ms(0)
        .with_task("a", TaskConfigBuilder::new("true").build())
        .raw();

    match FlowFile::try_from(raw) {
        Err(FlowError::Config(msg)) => assert!(msg.contains("timeout")),
        other => panic!("Expected Config error, got: {:?}", other),
    }
}

#[test]
fn test_blank_command_is_rejected() {
    let raw = FlowFileBuilder::new()
        .with_task("blank", TaskConfigBuilder::new("   ").build())
        .raw();

    match FlowFile::try_from(raw) {
        Err(FlowError::Config(msg)) => assert!(msg.contains("blank")),
        other => panic!("Expected Config error, got: {:?}", other),
    }
}

#[test]
fn test_invalid_toml_is_a_parse_error() {
    let file = write_config("[task.a\ncmd = ");
    assert!(matches!(load_and_validate(file.path()), Err(FlowError::Toml(_))));
}

#[test]
fn test_missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = load_and_validate(dir.path().join("Flowdag.toml"));
    assert!(matches!(result, Err(FlowError::Io(_))));
}

#[test]
fn test_builder_produces_runnable_flow() {
    let cfg = FlowFileBuilder::new()
        .name("built")
        .timeout_ms(250)
        .debug(true)
        .with_task("a", TaskConfigBuilder::new("echo a").build())
        .with_task("b", TaskConfigBuilder::new("echo b").after("a").build())
        .build();

    let flow = cfg.to_flow().unwrap();
    assert_eq!(flow.options().timeout, Duration::from_millis(250));
    assert!(flow.options().debug);

    let graph = flow.validate().unwrap();
    assert_eq!(graph.execution_order().unwrap(), vec!["a", "b"]);
}
